//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Each row converts to and
//! from its domain aggregate; conversions from rows validate what the
//! database cannot express, such as enum spellings and the progress JSON.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Application, ClassLevel, Company, ObjectId, ProgressEntry, User, UserId, UserProfile,
    UserType,
};

use super::schema::{applications, companies, users};

/// Raised when a stored row cannot be turned back into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {reason}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    id: String,
    reason: String,
}

impl RowConversionError {
    fn new(table: &'static str, id: &str, reason: impl ToString) -> Self {
        Self {
            table,
            id: id.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Row of the `companies` table, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = companies)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Company> for CompanyRow {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.to_hex(),
            name: company.name.clone(),
            city: company.city.clone(),
            state: company.state.clone(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

impl TryFrom<CompanyRow> for Company {
    type Error = RowConversionError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse::<ObjectId>()
            .map_err(|err| RowConversionError::new("companies", &row.id, err))?;
        Ok(Self {
            id,
            name: row.name,
            city: row.city,
            state: row.state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row of the `users` table with the profile flattened into nullable
/// columns.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub user_type: String,
    pub linked_in: Option<String>,
    pub phone_number: Option<String>,
    pub major: Option<String>,
    pub class_level: Option<String>,
    pub company: Option<String>,
    pub share_profile: Option<bool>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        let mut row = Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            user_type: user.user_type().as_str().to_owned(),
            linked_in: user.linked_in.clone(),
            phone_number: user.phone_number.clone(),
            major: None,
            class_level: None,
            company: None,
            share_profile: None,
        };
        match &user.profile {
            UserProfile::Student { major, class_level } => {
                row.major = Some(major.clone());
                row.class_level = Some(class_level.as_str().to_owned());
            }
            UserProfile::Alumni {
                company,
                share_profile,
            } => {
                row.company = Some(company.to_hex());
                row.share_profile = Some(*share_profile);
            }
        }
        row
    }
}

impl TryFrom<UserRow> for User {
    type Error = RowConversionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| RowConversionError::new("users", &row.id, reason);
        let user_type = row
            .user_type
            .parse::<UserType>()
            .map_err(|err| invalid(&err.to_string()))?;
        let profile = match user_type {
            UserType::Student => UserProfile::Student {
                major: row.major.clone().ok_or_else(|| invalid("missing major"))?,
                class_level: row
                    .class_level
                    .as_deref()
                    .ok_or_else(|| invalid("missing class level"))?
                    .parse::<ClassLevel>()
                    .map_err(|err| invalid(&err.to_string()))?,
            },
            UserType::Alumni => UserProfile::Alumni {
                company: row
                    .company
                    .as_deref()
                    .ok_or_else(|| invalid("missing company"))?
                    .parse::<ObjectId>()
                    .map_err(|err| invalid(&err.to_string()))?,
                share_profile: row.share_profile.unwrap_or(false),
            },
        };
        let id = UserId::new(row.id.clone()).map_err(|err| invalid(&err.to_string()))?;
        Ok(Self {
            id,
            email: row.email,
            name: row.name,
            linked_in: row.linked_in,
            phone_number: row.phone_number,
            profile,
        })
    }
}

/// Row of the `applications` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = applications)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub company_name: String,
    pub position: String,
    pub link: Option<String>,
    pub process: serde_json::Value,
    pub current_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Application> for ApplicationRow {
    type Error = RowConversionError;

    fn try_from(application: &Application) -> Result<Self, Self::Error> {
        let id = application.id.to_hex();
        let process = serde_json::to_value(&application.process)
            .map_err(|err| RowConversionError::new("applications", &id, err))?;
        Ok(Self {
            user_id: application.user_id.to_string(),
            company_id: application.company_id.to_hex(),
            company_name: application.company_name.clone(),
            position: application.position.clone(),
            link: application.link.clone(),
            process,
            current_status: application
                .current_status()
                .map(|status| status.as_str().to_owned()),
            created_at: application.created_at,
            updated_at: application.updated_at,
            id,
        })
    }
}

impl TryFrom<ApplicationRow> for Application {
    type Error = RowConversionError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| RowConversionError::new("applications", &row.id, reason);
        let id = row
            .id
            .parse::<ObjectId>()
            .map_err(|err| invalid(err.to_string()))?;
        let company_id = row
            .company_id
            .parse::<ObjectId>()
            .map_err(|err| invalid(err.to_string()))?;
        let user_id = UserId::new(row.user_id.clone()).map_err(|err| invalid(err.to_string()))?;
        let process: Vec<ProgressEntry> =
            serde_json::from_value(row.process.clone()).map_err(|err| invalid(err.to_string()))?;
        Ok(Self {
            id,
            user_id,
            company_id,
            company_name: row.company_name,
            position: row.position,
            link: row.link,
            process,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
