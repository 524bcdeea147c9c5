//! Behaviour of the in-memory repositories.

use chrono::{DateTime, TimeZone, Utc};
use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::MemoryStore;
use crate::domain::ports::{ApplicationRepository, CompanyRepository, UserRepository};
use crate::domain::{
    ApplicationFilter, ApplicationSort, Company, CompanyFilter, NewApplication, NewCompany,
    ObjectId, ProfileFields, User, UserFilter, UserId, UserProfile,
};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn company(name: &str, state: Option<&str>, day: u32) -> Company {
    NewCompany {
        name: name.to_owned(),
        city: None,
        state: state.map(str::to_owned),
    }
    .into_company(at(day))
}

fn alumni(id: &str, name: &str, share_profile: bool) -> User {
    User {
        id: UserId::new(id).expect("valid id"),
        email: format!("{id}@example.com"),
        name: name.to_owned(),
        linked_in: None,
        phone_number: None,
        profile: UserProfile::Alumni {
            company: ObjectId::generate_at(at(1)),
            share_profile,
        },
    }
}

fn page(page: u64, per_page: u64) -> PageRequest {
    PageRequest::new(page, per_page).expect("valid page")
}

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new()
}

#[rstest]
#[tokio::test]
async fn companies_page_in_name_order(store: MemoryStore) {
    for (name, day) in [("Globex", 1), ("Acme", 2), ("Initech", 3)] {
        CompanyRepository::insert(&store, &company(name, Some("IL"), day))
            .await
            .expect("insert company");
    }
    let filter = CompanyFilter::new(None, Some("all"));

    let first = CompanyRepository::list(&store, &filter, page(0, 2))
        .await
        .expect("first page");
    let second = CompanyRepository::list(&store, &filter, page(1, 2))
        .await
        .expect("second page");
    let total = CompanyRepository::count(&store, &filter)
        .await
        .expect("count");

    let names: Vec<_> = first.iter().chain(&second).map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Acme", "Globex", "Initech"]);
    assert_eq!(total, 3);
}

#[rstest]
#[tokio::test]
async fn company_names_are_unique_ignoring_case(store: MemoryStore) {
    CompanyRepository::insert(&store, &company("Acme", None, 1))
        .await
        .expect("insert company");

    let duplicate = CompanyRepository::insert(&store, &company("ACME", None, 2)).await;
    assert!(duplicate.is_err());

    let found = store.find_by_name("acme").await.expect("lookup");
    assert_eq!(found.map(|c| c.name), Some("Acme".to_owned()));
}

#[rstest]
#[tokio::test]
async fn company_update_reports_missing_record(store: MemoryStore) {
    let ghost = company("Ghost", None, 1);
    let updated = CompanyRepository::update(&store, &ghost)
        .await
        .expect("update");
    assert!(!updated);
}

#[rstest]
#[tokio::test]
async fn deleting_returns_the_removed_company(store: MemoryStore) {
    let acme = company("Acme", None, 1);
    CompanyRepository::insert(&store, &acme)
        .await
        .expect("insert company");

    let removed = CompanyRepository::delete(&store, &acme.id)
        .await
        .expect("delete");
    assert_eq!(removed, Some(acme.clone()));
    let again = CompanyRepository::delete(&store, &acme.id)
        .await
        .expect("delete");
    assert_eq!(again, None);
}

#[rstest]
#[tokio::test]
async fn open_alumni_filter_hides_private_profiles(store: MemoryStore) {
    for user in [
        alumni("a-1", "Ada", true),
        alumni("a-2", "Alan", false),
        alumni("a-3", "Adele", true),
    ] {
        UserRepository::insert(&store, &user)
            .await
            .expect("insert user");
    }

    let filter = UserFilter::open_alumni(Some("ad"));
    let users = UserRepository::list(&store, &filter, page(0, 10))
        .await
        .expect("list users");
    let ids: Vec<_> = users.iter().map(|user| user.id.as_str()).collect();
    assert_eq!(ids, ["a-1", "a-3"]);
}

#[rstest]
#[tokio::test]
async fn users_are_unique_by_id_and_email(store: MemoryStore) {
    let ada = alumni("a-1", "Ada", true);
    UserRepository::insert(&store, &ada)
        .await
        .expect("insert user");

    let mut same_email = alumni("a-9", "Someone", false);
    same_email.email.clone_from(&ada.email);
    assert!(UserRepository::insert(&store, &same_email).await.is_err());

    let found = store
        .find_by_id_or_email(&UserId::new("nobody").expect("valid id"), &ada.email)
        .await
        .expect("lookup");
    assert_eq!(found.map(|user| user.id), Some(ada.id));
}

#[rstest]
#[tokio::test]
async fn user_update_persists_profile_changes(store: MemoryStore) {
    let ada = alumni("a-1", "Ada", false);
    UserRepository::insert(&store, &ada)
        .await
        .expect("insert user");

    let mut shared = ada.clone();
    shared.profile = ProfileFields {
        share_profile: Some(true),
        ..ProfileFields::default()
    }
    .resolve(Some(&ada.profile))
    .expect("resolve profile");
    assert!(UserRepository::update(&store, &shared).await.expect("update"));

    let stored = UserRepository::find_by_id(&store, &ada.id)
        .await
        .expect("lookup")
        .expect("user present");
    assert!(stored.shares_contact_details());
}

#[rstest]
#[tokio::test]
async fn applications_sort_and_enforce_natural_key(store: MemoryStore) {
    let owner = UserId::new("u-1").expect("valid id");
    let company_id = ObjectId::generate_at(at(1));
    for (position, company_name, day) in [
        ("Backend Intern", "Globex", 1),
        ("Data Intern", "Acme", 2),
    ] {
        let application = NewApplication {
            user_id: owner.clone(),
            company_id,
            company_name: company_name.to_owned(),
            position: position.to_owned(),
            link: None,
            process: Vec::new(),
        }
        .into_application(at(day));
        ApplicationRepository::insert(&store, &application)
            .await
            .expect("insert application");
    }

    let duplicate = NewApplication {
        user_id: owner.clone(),
        company_id,
        company_name: "Globex".to_owned(),
        position: "Backend Intern".to_owned(),
        link: None,
        process: Vec::new(),
    }
    .into_application(at(3));
    assert!(ApplicationRepository::insert(&store, &duplicate).await.is_err());

    for (sort, expected) in [
        (ApplicationSort::Newest, ["Data Intern", "Backend Intern"]),
        (ApplicationSort::Oldest, ["Backend Intern", "Data Intern"]),
        (ApplicationSort::Company, ["Data Intern", "Backend Intern"]),
    ] {
        let filter = ApplicationFilter::for_user(owner.clone(), None, None, sort);
        let listed = ApplicationRepository::list(&store, &filter, page(0, 10))
            .await
            .expect("list applications");
        let positions: Vec<_> = listed.iter().map(|a| a.position.as_str()).collect();
        assert_eq!(positions, expected, "sort {sort}");
    }
}
