//! Company records and the filters used to list them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectId;
use super::search::{contains_ignore_case, normalise_search};

/// Sentinel state value meaning "do not filter by state".
pub const ALL_STATES: &str = "all";

/// Stored company document.
///
/// `name` is unique under case-insensitive comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a company.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewCompany {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl NewCompany {
    /// Materialise the stored record with a fresh identifier.
    pub fn into_company(self, now: DateTime<Utc>) -> Company {
        Company {
            id: ObjectId::generate_at(now),
            name: self.name,
            city: self.city,
            state: self.state,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial company update; only supplied fields are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl CompanyPatch {
    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.city.is_none() && self.state.is_none()
    }
}

impl Company {
    /// Merge a patch into the record, refreshing `updated_at`.
    pub fn apply_patch(mut self, patch: CompanyPatch, now: DateTime<Utc>) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(city) = patch.city {
            self.city = Some(city);
        }
        if let Some(state) = patch.state {
            self.state = Some(state);
        }
        self.updated_at = now;
        self
    }

    /// Whether two names collide under the uniqueness rule.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Filter applied to company listings and their counts.
///
/// # Examples
/// ```
/// use tracker_backend::domain::CompanyFilter;
///
/// let filter = CompanyFilter::new(Some("  acme "), Some("ALL"));
/// assert_eq!(filter.name_contains.as_deref(), Some("acme"));
/// assert!(filter.state.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyFilter {
    /// Case-insensitive substring matched against `name`.
    pub name_contains: Option<String>,
    /// Case-insensitive state equality.
    pub state: Option<String>,
}

impl CompanyFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Empty search text and the `all` state sentinel disable their filters.
    pub fn new(query: Option<&str>, state: Option<&str>) -> Self {
        let state = normalise_search(state).filter(|value| !value.eq_ignore_ascii_case(ALL_STATES));
        Self {
            name_contains: normalise_search(query),
            state,
        }
    }

    /// Evaluate the filter against a single record.
    pub fn matches(&self, company: &Company) -> bool {
        let name_ok = self
            .name_contains
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&company.name, needle));
        let state_ok = self.state.as_deref().is_none_or(|expected| {
            company
                .state
                .as_deref()
                .is_some_and(|actual| actual.to_lowercase() == expected.to_lowercase())
        });
        name_ok && state_ok
    }
}
