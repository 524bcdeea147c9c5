//! User data model.
//!
//! A user is either a student or an alumnus. The variant-specific fields live
//! in [`UserProfile`], a tagged union keyed on the JSON `type` discriminant.
//! Responses never expose a [`User`] directly: every read goes through
//! [`UserView::from`], the role projection that hides alumni contact details
//! unless the alumnus opted in with `shareProfile`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ObjectId;
use super::search::{contains_ignore_case, normalise_search};

/// Validation errors raised while building or patching users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The caller-supplied identifier was blank.
    #[error("_id must be a non-empty string.")]
    EmptyId,
    /// Neither the payload nor the stored record names a user type.
    #[error("type is required.")]
    MissingType,
    /// A field required by the target variant is absent.
    #[error("{field} is required for {user_type} users.")]
    MissingField {
        field: &'static str,
        user_type: UserType,
    },
    /// A field that belongs to the other variant was supplied.
    #[error("{field} is not allowed for {user_type} users.")]
    FieldNotAllowed {
        field: &'static str,
        user_type: UserType,
    },
}

/// Raised when a discriminant string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// Caller-chosen opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`], trimming surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use tracker_backend::domain::UserId;
    ///
    /// let id = UserId::new(" auth0|ada ").expect("valid id");
    /// assert_eq!(id.as_str(), "auth0|ada");
    /// assert!(UserId::new("   ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = id.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of the user tagged union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Student,
    Alumni,
}

impl UserType {
    /// Every variant in declaration order.
    pub const ALL: [Self; 2] = [Self::Student, Self::Alumni];

    /// Canonical wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Alumni => "ALUMNI",
        }
    }
}

/// Academic year of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassLevel {
    Freshmen,
    Sophomore,
    Junior,
    Senior,
    Other,
}

impl ClassLevel {
    /// Every variant in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Freshmen,
        Self::Sophomore,
        Self::Junior,
        Self::Senior,
        Self::Other,
    ];

    /// Canonical wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Freshmen => "FRESHMEN",
            Self::Sophomore => "SOPHOMORE",
            Self::Junior => "JUNIOR",
            Self::Senior => "SENIOR",
            Self::Other => "OTHER",
        }
    }
}

macro_rules! wire_enum_traits {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            /// Parse the wire form, ignoring ASCII case.
            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(raw.trim()))
                    .ok_or_else(|| UnknownVariant(raw.to_owned()))
            }
        }
    };
}

wire_enum_traits!(UserType);
wire_enum_traits!(ClassLevel);

/// Variant-specific user data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProfile {
    Student {
        major: String,
        class_level: ClassLevel,
    },
    Alumni {
        company: ObjectId,
        share_profile: bool,
    },
}

impl UserProfile {
    /// Discriminant of this profile.
    pub fn user_type(&self) -> UserType {
        match self {
            Self::Student { .. } => UserType::Student,
            Self::Alumni { .. } => UserType::Alumni,
        }
    }
}

/// Loose profile fields as supplied by a request.
///
/// [`ProfileFields::resolve`] turns them into a [`UserProfile`], falling back
/// to the stored profile for anything the request leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileFields {
    pub user_type: Option<UserType>,
    pub major: Option<String>,
    pub class_level: Option<ClassLevel>,
    pub company: Option<ObjectId>,
    pub share_profile: Option<bool>,
}

impl ProfileFields {
    /// Whether no profile field was supplied.
    pub fn is_empty(&self) -> bool {
        self.user_type.is_none()
            && self.major.is_none()
            && self.class_level.is_none()
            && self.company.is_none()
            && self.share_profile.is_none()
    }

    /// Build the target profile, reusing values from `current` when the
    /// variant is unchanged.
    ///
    /// # Examples
    /// ```
    /// use tracker_backend::domain::{ProfileFields, UserProfile, UserType};
    ///
    /// let fields = ProfileFields {
    ///     user_type: Some(UserType::Alumni),
    ///     company: Some("65a1f0c2e4b0a1b2c3d4e5f6".parse().expect("valid id")),
    ///     ..ProfileFields::default()
    /// };
    /// let profile = fields.resolve(None).expect("alumni profile");
    /// assert!(matches!(profile, UserProfile::Alumni { share_profile: false, .. }));
    /// ```
    pub fn resolve(self, current: Option<&UserProfile>) -> Result<UserProfile, UserValidationError> {
        let user_type = self
            .user_type
            .or_else(|| current.map(UserProfile::user_type))
            .ok_or(UserValidationError::MissingType)?;

        match user_type {
            UserType::Student => {
                reject_field(self.company.is_some(), "company", user_type)?;
                reject_field(self.share_profile.is_some(), "shareProfile", user_type)?;
                let (stored_major, stored_level) = match current {
                    Some(UserProfile::Student { major, class_level }) => {
                        (Some(major.clone()), Some(*class_level))
                    }
                    _ => (None, None),
                };
                Ok(UserProfile::Student {
                    major: require_field(self.major.or(stored_major), "major", user_type)?,
                    class_level: require_field(
                        self.class_level.or(stored_level),
                        "classLevel",
                        user_type,
                    )?,
                })
            }
            UserType::Alumni => {
                reject_field(self.major.is_some(), "major", user_type)?;
                reject_field(self.class_level.is_some(), "classLevel", user_type)?;
                let (stored_company, stored_share) = match current {
                    Some(UserProfile::Alumni {
                        company,
                        share_profile,
                    }) => (Some(*company), Some(*share_profile)),
                    _ => (None, None),
                };
                Ok(UserProfile::Alumni {
                    company: require_field(self.company.or(stored_company), "company", user_type)?,
                    share_profile: self.share_profile.or(stored_share).unwrap_or(false),
                })
            }
        }
    }
}

fn reject_field(
    supplied: bool,
    field: &'static str,
    user_type: UserType,
) -> Result<(), UserValidationError> {
    if supplied {
        return Err(UserValidationError::FieldNotAllowed { field, user_type });
    }
    Ok(())
}

fn require_field<T>(
    value: Option<T>,
    field: &'static str,
    user_type: UserType,
) -> Result<T, UserValidationError> {
    value.ok_or(UserValidationError::MissingField { field, user_type })
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub linked_in: Option<String>,
    pub phone_number: Option<String>,
    pub profile: UserProfile,
}

/// Validated payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub linked_in: Option<String>,
    pub phone_number: Option<String>,
    pub profile: ProfileFields,
}

impl NewUser {
    /// Resolve the profile variant and build the stored record.
    pub fn into_user(self) -> Result<User, UserValidationError> {
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            linked_in: self.linked_in,
            phone_number: self.phone_number,
            profile: self.profile.resolve(None)?,
        })
    }
}

/// Partial user update; only supplied fields are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub linked_in: Option<String>,
    pub phone_number: Option<String>,
    pub profile: ProfileFields,
}

impl UserPatch {
    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.linked_in.is_none()
            && self.phone_number.is_none()
            && self.profile.is_empty()
    }
}

impl User {
    /// Discriminant of the stored profile.
    pub fn user_type(&self) -> UserType {
        self.profile.user_type()
    }

    /// Merge a patch into the record.
    ///
    /// A `type` change must leave the record with every field the new
    /// variant requires.
    pub fn apply_patch(mut self, patch: UserPatch) -> Result<Self, UserValidationError> {
        self.profile = patch.profile.resolve(Some(&self.profile))?;
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(linked_in) = patch.linked_in {
            self.linked_in = Some(linked_in);
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
        Ok(self)
    }

    /// Whether contact details may be shown to other users.
    pub fn shares_contact_details(&self) -> bool {
        match self.profile {
            UserProfile::Student { .. } => true,
            UserProfile::Alumni { share_profile, .. } => share_profile,
        }
    }
}

/// Role-projected user representation returned by every user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_level: Option<ClassLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_profile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        let mut view = Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            user_type: user.user_type(),
            major: None,
            class_level: None,
            company: None,
            share_profile: None,
            linked_in: None,
            phone_number: None,
        };

        match &user.profile {
            UserProfile::Student { major, class_level } => {
                view.major = Some(major.clone());
                view.class_level = Some(*class_level);
            }
            UserProfile::Alumni {
                company,
                share_profile,
            } => {
                view.company = Some(*company);
                view.share_profile = Some(*share_profile);
            }
        }

        if user.shares_contact_details() {
            view.linked_in.clone_from(&user.linked_in);
            view.phone_number.clone_from(&user.phone_number);
        }
        view
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Filter applied to user listings and their counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    /// Case-insensitive substring matched against `name`.
    pub name_contains: Option<String>,
    /// Restrict to alumni who opted in with `shareProfile`.
    pub open_alumni_only: bool,
}

impl UserFilter {
    /// Every user, optionally narrowed by name.
    pub fn all(query: Option<&str>) -> Self {
        Self {
            name_contains: normalise_search(query),
            open_alumni_only: false,
        }
    }

    /// Alumni with `shareProfile == true`, optionally narrowed by name.
    pub fn open_alumni(query: Option<&str>) -> Self {
        Self {
            name_contains: normalise_search(query),
            open_alumni_only: true,
        }
    }

    /// Evaluate the filter against a single record.
    pub fn matches(&self, user: &User) -> bool {
        let role_ok = !self.open_alumni_only
            || matches!(
                user.profile,
                UserProfile::Alumni {
                    share_profile: true,
                    ..
                }
            );
        let name_ok = self
            .name_contains
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&user.name, needle));
        role_ok && name_ok
    }
}
