//! Internship applications and their status progress.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::search::{contains_ignore_case, normalise_search};
use super::{ObjectId, UnknownVariant, UserId};

/// Recruiting stage recorded in a progress entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    #[serde(rename = "OA")]
    Oa,
    Phone,
    Final,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Every variant in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Applied,
        Self::Oa,
        Self::Phone,
        Self::Final,
        Self::Offer,
        Self::Rejected,
    ];

    /// Canonical wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Oa => "OA",
            Self::Phone => "PHONE",
            Self::Final => "FINAL",
            Self::Offer => "OFFER",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| UnknownVariant(raw.to_owned()))
    }
}

/// One dated step in an application's recruiting process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub status: ApplicationStatus,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Stored application document.
///
/// Unique per `(user_id, company_id, position)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: UserId,
    pub company_id: ObjectId,
    pub company_name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub process: Vec<ProgressEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Status of the most recent progress entry.
    ///
    /// Entries are compared by date; on ties the later entry in the list wins.
    pub fn current_status(&self) -> Option<ApplicationStatus> {
        self.process
            .iter()
            .enumerate()
            .max_by(|(left_index, left), (right_index, right)| {
                left.date
                    .cmp(&right.date)
                    .then_with(|| left_index.cmp(right_index))
            })
            .map(|(_, entry)| entry.status)
    }

    /// Whether the record carries the given natural key.
    pub fn has_natural_key(&self, user_id: &UserId, company_id: &ObjectId, position: &str) -> bool {
        &self.user_id == user_id && &self.company_id == company_id && self.position == position
    }

    /// Merge a patch into the record, refreshing `updated_at`.
    pub fn apply_patch(mut self, patch: ApplicationPatch, now: DateTime<Utc>) -> Self {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id;
        }
        if let Some(company_name) = patch.company_name {
            self.company_name = company_name;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(link) = patch.link {
            self.link = Some(link);
        }
        if let Some(process) = patch.process {
            self.process = process;
        }
        self.updated_at = now;
        self
    }
}

/// Validated payload for creating an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub user_id: UserId,
    pub company_id: ObjectId,
    pub company_name: String,
    pub position: String,
    pub link: Option<String>,
    pub process: Vec<ProgressEntry>,
}

impl NewApplication {
    /// Materialise the stored record with a fresh identifier.
    pub fn into_application(self, now: DateTime<Utc>) -> Application {
        Application {
            id: ObjectId::generate_at(now),
            user_id: self.user_id,
            company_id: self.company_id,
            company_name: self.company_name,
            position: self.position,
            link: self.link,
            process: self.process,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial application update; only supplied fields are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationPatch {
    pub user_id: Option<UserId>,
    pub company_id: Option<ObjectId>,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub link: Option<String>,
    pub process: Option<Vec<ProgressEntry>>,
}

impl ApplicationPatch {
    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.company_id.is_none()
            && self.company_name.is_none()
            && self.position.is_none()
            && self.link.is_none()
            && self.process.is_none()
    }

    /// Whether the patch touches any natural-key field.
    pub fn changes_natural_key(&self) -> bool {
        self.user_id.is_some() || self.company_id.is_some() || self.position.is_some()
    }
}

/// Ordering applied to application listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ApplicationSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Least recently created first.
    Oldest,
    /// Company name ascending.
    Company,
    /// Position ascending.
    Position,
}

impl ApplicationSort {
    /// Every variant with its query-string spelling.
    pub const ALL: [(Self, &'static str); 4] = [
        (Self::Newest, "newest"),
        (Self::Oldest, "oldest"),
        (Self::Company, "company"),
        (Self::Position, "position"),
    ];

    /// Compare two records under this ordering, tie-breaking on identifier.
    pub fn compare(self, left: &Application, right: &Application) -> Ordering {
        let primary = match self {
            Self::Newest => right.created_at.cmp(&left.created_at),
            Self::Oldest => left.created_at.cmp(&right.created_at),
            Self::Company => left
                .company_name
                .to_lowercase()
                .cmp(&right.company_name.to_lowercase()),
            Self::Position => left
                .position
                .to_lowercase()
                .cmp(&right.position.to_lowercase()),
        };
        primary.then_with(|| match self {
            Self::Newest => right.id.cmp(&left.id),
            _ => left.id.cmp(&right.id),
        })
    }
}

impl fmt::Display for ApplicationSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Self::ALL
            .into_iter()
            .find_map(|(sort, name)| (sort == *self).then_some(name))
            .unwrap_or("newest");
        f.write_str(name)
    }
}

impl FromStr for ApplicationSort {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(raw.trim()))
            .map(|(sort, _)| sort)
            .ok_or_else(|| UnknownVariant(raw.to_owned()))
    }
}

impl TryFrom<String> for ApplicationSort {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Filter applied to application listings and their counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationFilter {
    /// Restrict to applications owned by this user.
    pub user_id: Option<UserId>,
    /// Case-insensitive substring matched against position or company name.
    pub text: Option<String>,
    /// Restrict to applications whose latest progress entry has this status.
    pub status: Option<ApplicationStatus>,
    /// Ordering of the returned page.
    pub sort: ApplicationSort,
}

impl ApplicationFilter {
    /// Applications owned by `user_id`, with optional search and status.
    pub fn for_user(
        user_id: UserId,
        query: Option<&str>,
        status: Option<ApplicationStatus>,
        sort: ApplicationSort,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            text: normalise_search(query),
            status,
            sort,
        }
    }

    /// Evaluate the filter against a single record.
    pub fn matches(&self, application: &Application) -> bool {
        let owner_ok = self
            .user_id
            .as_ref()
            .is_none_or(|user_id| &application.user_id == user_id);
        let text_ok = self.text.as_deref().is_none_or(|needle| {
            contains_ignore_case(&application.position, needle)
                || contains_ignore_case(&application.company_name, needle)
        });
        let status_ok = self
            .status
            .is_none_or(|status| application.current_status() == Some(status));
        owner_ok && text_ok && status_ok
    }
}
