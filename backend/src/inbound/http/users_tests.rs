//! Handler tests for the users endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use pagination::Paginated;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{
    ClassLevel, Error, ObjectId, User, UserId, UserProfile, UserType, UserView,
};
use crate::inbound::http::test_utils::{MockPorts, app_over, memory_state, test_app};

fn company_id() -> ObjectId {
    "65a1f0c2e4b0a1b2c3d4e5f6".parse().expect("valid company id")
}

fn private_alumni() -> User {
    User {
        id: UserId::new("a-1").expect("valid id"),
        email: "alan@example.com".to_owned(),
        name: "Alan Turing".to_owned(),
        linked_in: Some("https://linkedin.com/in/alan".to_owned()),
        phone_number: Some("555-0111".to_owned()),
        profile: UserProfile::Alumni {
            company: company_id(),
            share_profile: false,
        },
    }
}

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[actix_web::test]
async fn alumni_route_uses_open_alumni_filter() {
    let mut ports = MockPorts::default();
    ports
        .users_query
        .expect_list_users()
        .withf(|request| {
            request.filter.open_alumni_only
                && request.filter.name_contains.as_deref() == Some("ada")
                && request.page.per_page() == 5
        })
        .return_once(|request| Ok(Paginated::new(request.page, 0, Vec::new())));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/users/alumni?query=%20ada%20&perPage=5"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "page": 0, "perPage": 5, "total": 0, "data": [] }));
}

#[actix_web::test]
async fn all_users_route_does_not_filter_roles() {
    let mut ports = MockPorts::default();
    ports
        .users_query
        .expect_list_users()
        .withf(|request| !request.filter.open_alumni_only)
        .return_once(|request| {
            Ok(Paginated::new(
                request.page,
                1,
                vec![UserView::from(private_alumni())],
            ))
        });

    let (status, body) = send(ports, actix_test::TestRequest::get().uri("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"][0];
    assert_eq!(entry["type"], "ALUMNI");
    assert!(entry.get("linkedIn").is_none());
    assert!(entry.get("phoneNumber").is_none());
}

#[actix_web::test]
async fn register_normalises_enums_and_profile_fields() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_register_user()
        .withf(|user| {
            user.profile.user_type == Some(UserType::Student)
                && user.profile.class_level == Some(ClassLevel::Junior)
                && user.email == "grace@example.com"
        })
        .return_once(|user| {
            let record = user.into_user().expect("valid student");
            Ok(UserView::from(record))
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/api/users").set_json(json!({
            "_id": "s-1",
            "email": " grace@example.com ",
            "name": "Grace Hopper",
            "type": "student",
            "major": "Computer Science",
            "classLevel": "junior",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "STUDENT");
    assert_eq!(body["classLevel"], "JUNIOR");
}

#[rstest]
#[case(json!({ "_id": "s-1", "email": "nope", "name": "Grace", "type": "STUDENT" }), "email must be a valid email address.")]
#[case(json!({ "_id": "s-1", "email": "g@example.com", "name": "Grace" }), "type is required.")]
#[case(json!({ "_id": "s-1", "email": "g@example.com", "name": " G ", "type": "STUDENT" }), "name must be at least 2 characters.")]
#[case(json!({ "_id": "s-1", "email": "g@example.com", "name": "Grace", "type": "STAFF" }), "type must be one of STUDENT, ALUMNI.")]
#[case(json!({ "_id": " ", "email": "g@example.com", "name": "Grace", "type": "STUDENT" }), "_id must be a non-empty string.")]
#[case(json!({ "_id": "s-1", "email": "g@example.com", "name": "Grace", "type": "ALUMNI", "company": "acme" }), "Invalid company id. (Must be a Mongo ObjectID.)")]
#[actix_web::test]
async fn register_rejects_invalid_payloads(#[case] payload: Value, #[case] message: &str) {
    let mut ports = MockPorts::default();
    ports.users.expect_register_user().never();

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/api/users").set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], message);
}

#[actix_web::test]
async fn get_returns_projection() {
    let mut ports = MockPorts::default();
    ports
        .users_query
        .expect_get_user()
        .withf(|id| id.as_str() == "a-1")
        .return_once(|_| Ok(UserView::from(private_alumni())));

    let (status, body) = send(ports, actix_test::TestRequest::get().uri("/api/users/a-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shareProfile"], false);
    assert!(body.get("phoneNumber").is_none());
}

#[actix_web::test]
async fn patch_with_only_unknown_fields_reaches_service_as_empty() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_update_user()
        .withf(|_, patch| patch.is_empty())
        .return_once(|_, _| Err(Error::invalid_request("At least one field must be provided.")));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::patch()
            .uri("/api/users/a-1")
            .set_json(json!({ "favouriteColour": "green" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "At least one field must be provided.");
}

#[actix_web::test]
async fn delete_unknown_user_is_404() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_delete_user()
        .return_once(|_| Err(Error::not_found("User not found.")));

    let (status, body) =
        send(ports, actix_test::TestRequest::delete().uri("/api/users/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found.");
}

#[actix_web::test]
async fn incomplete_profile_is_rejected_before_the_duplicate_check() {
    let app = actix_test::init_service(app_over(memory_state())).await;
    let complete = json!({
        "_id": "s-1",
        "email": "sam@example.com",
        "name": "Sam",
        "type": "STUDENT",
        "major": "Physics",
        "classLevel": "JUNIOR",
    });
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(complete)
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let incomplete = json!({
        "_id": "s-1",
        "email": "other@example.com",
        "name": "Sam",
        "type": "STUDENT",
    });
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(incomplete)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("invalid_request"));
}
