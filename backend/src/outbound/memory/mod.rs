//! In-memory document store.
//!
//! Backs every repository port when no database URL is configured. All three
//! collections sit behind one `tokio` [`RwLock`]; list and count calls take a
//! read guard while writes take the write guard, so a uniqueness check and
//! the write it protects cannot interleave with another writer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagination::PageRequest;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, CompanyRepository, CompanyRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Application, ApplicationFilter, Company, CompanyFilter, ObjectId, User, UserFilter, UserId,
};

#[derive(Debug, Default)]
struct Documents {
    companies: BTreeMap<ObjectId, Company>,
    users: BTreeMap<UserId, User>,
    applications: BTreeMap<ObjectId, Application>,
}

/// Process-local store implementing the company, user and application
/// repositories.
///
/// # Examples
/// ```
/// use tracker_backend::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T: Clone>(matches: Vec<&T>, page: PageRequest) -> Vec<T> {
    let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    matches.into_iter().skip(skip).take(limit).cloned().collect()
}

fn count_of(matched: usize) -> u64 {
    u64::try_from(matched).unwrap_or(u64::MAX)
}

fn by_name_then_id<K: Ord>(left: (&str, &K), right: (&str, &K)) -> std::cmp::Ordering {
    left.0.cmp(right.0).then_with(|| left.1.cmp(right.1))
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn list(
        &self,
        filter: &CompanyFilter,
        page: PageRequest,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let documents = self.documents.read().await;
        let mut matches: Vec<&Company> = documents
            .companies
            .values()
            .filter(|company| filter.matches(company))
            .collect();
        matches.sort_by(|left, right| {
            by_name_then_id((left.name.as_str(), &left.id), (right.name.as_str(), &right.id))
        });
        Ok(page_of(matches, page))
    }

    async fn count(&self, filter: &CompanyFilter) -> Result<u64, CompanyRepositoryError> {
        let documents = self.documents.read().await;
        let matched = documents
            .companies
            .values()
            .filter(|company| filter.matches(company))
            .count();
        Ok(count_of(matched))
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Company>, CompanyRepositoryError> {
        Ok(self.documents.read().await.companies.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, CompanyRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .companies
            .values()
            .find(|company| company.name_matches(name))
            .cloned())
    }

    async fn insert(&self, company: &Company) -> Result<(), CompanyRepositoryError> {
        let mut documents = self.documents.write().await;
        let taken = documents.companies.contains_key(&company.id)
            || documents
                .companies
                .values()
                .any(|existing| existing.name_matches(&company.name));
        if taken {
            return Err(CompanyRepositoryError::conflict(format!(
                "company name {} already stored",
                company.name
            )));
        }
        documents.companies.insert(company.id, company.clone());
        debug!(id = %company.id, "company stored in memory");
        Ok(())
    }

    async fn update(&self, company: &Company) -> Result<bool, CompanyRepositoryError> {
        let mut documents = self.documents.write().await;
        if !documents.companies.contains_key(&company.id) {
            return Ok(false);
        }
        let clash = documents
            .companies
            .values()
            .any(|existing| existing.id != company.id && existing.name_matches(&company.name));
        if clash {
            return Err(CompanyRepositoryError::conflict(format!(
                "company name {} already stored",
                company.name
            )));
        }
        documents.companies.insert(company.id, company.clone());
        Ok(true)
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Company>, CompanyRepositoryError> {
        Ok(self.documents.write().await.companies.remove(id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let documents = self.documents.read().await;
        let mut matches: Vec<&User> = documents
            .users
            .values()
            .filter(|user| filter.matches(user))
            .collect();
        matches.sort_by(|left, right| {
            by_name_then_id((left.name.as_str(), &left.id), (right.name.as_str(), &right.id))
        });
        Ok(page_of(matches, page))
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let documents = self.documents.read().await;
        let matched = documents
            .users
            .values()
            .filter(|user| filter.matches(user))
            .count();
        Ok(count_of(matched))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.documents.read().await.users.get(id).cloned())
    }

    async fn find_by_id_or_email(
        &self,
        id: &UserId,
        email: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let documents = self.documents.read().await;
        Ok(documents
            .users
            .values()
            .find(|user| &user.id == id || user.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut documents = self.documents.write().await;
        let taken = documents.users.contains_key(&user.id)
            || documents
                .users
                .values()
                .any(|existing| existing.email == user.email);
        if taken {
            return Err(UserPersistenceError::conflict(format!(
                "user {} or e-mail already stored",
                user.id
            )));
        }
        documents.users.insert(user.id.clone(), user.clone());
        debug!(id = %user.id, "user stored in memory");
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut documents = self.documents.write().await;
        match documents.users.get_mut(&user.id) {
            Some(slot) => {
                slot.clone_from(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.documents.write().await.users.remove(id))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let documents = self.documents.read().await;
        let mut matches: Vec<&Application> = documents
            .applications
            .values()
            .filter(|application| filter.matches(application))
            .collect();
        matches.sort_by(|left, right| filter.sort.compare(left, right));
        Ok(page_of(matches, page))
    }

    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, ApplicationRepositoryError> {
        let documents = self.documents.read().await;
        let matched = documents
            .applications
            .values()
            .filter(|application| filter.matches(application))
            .count();
        Ok(count_of(matched))
    }

    async fn find_by_id(
        &self,
        id: &ObjectId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(self.documents.read().await.applications.get(id).cloned())
    }

    async fn find_by_natural_key(
        &self,
        user_id: &UserId,
        company_id: &ObjectId,
        position: &str,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .applications
            .values()
            .find(|application| application.has_natural_key(user_id, company_id, position))
            .cloned())
    }

    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError> {
        let mut documents = self.documents.write().await;
        let taken = documents.applications.contains_key(&application.id)
            || documents.applications.values().any(|existing| {
                existing.has_natural_key(
                    &application.user_id,
                    &application.company_id,
                    &application.position,
                )
            });
        if taken {
            return Err(ApplicationRepositoryError::conflict(
                "application key already stored",
            ));
        }
        documents
            .applications
            .insert(application.id, application.clone());
        debug!(id = %application.id, "application stored in memory");
        Ok(())
    }

    async fn update(&self, application: &Application) -> Result<bool, ApplicationRepositoryError> {
        let mut documents = self.documents.write().await;
        if !documents.applications.contains_key(&application.id) {
            return Ok(false);
        }
        let clash = documents.applications.values().any(|existing| {
            existing.id != application.id
                && existing.has_natural_key(
                    &application.user_id,
                    &application.company_id,
                    &application.position,
                )
        });
        if clash {
            return Err(ApplicationRepositoryError::conflict(
                "application key already stored",
            ));
        }
        documents
            .applications
            .insert(application.id, application.clone());
        Ok(true)
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(self.documents.write().await.applications.remove(id))
    }
}

#[cfg(test)]
mod tests;
