use std::sync::Arc;

use actix_web::{
    App,
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use serde_json::{Value, json};

use crate::{
    configure_api,
    modules::{
        friend::service::FriendService,
        profile::{
            schema::{EmployerEntity, SchoolEntity},
            service::ProfileService,
        },
        user::service::UserService,
    },
    storage::MemoryStore,
};

const SECRET: &str = "test-secret";

/// Middleware rejections surface as service errors rather than responses,
/// so both paths are folded into a status and a JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let (status, bytes) = match test::try_call_service(&$app, $req).await {
            Ok(resp) => (resp.status(), test::read_body(resp).await),
            Err(err) => {
                let resp = err.error_response();
                (resp.status(), actix_web::body::to_bytes(resp.into_body()).await.unwrap())
            }
        };
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }};
}

macro_rules! init_app {
    () => {{
        let store = Arc::new(MemoryStore::with_catalog(
            vec![SchoolEntity { school_name: "Georgia Tech".into(), school_type: "University".into() }],
            vec![EmployerEntity { employer_name: "Initech".into() }],
        ));
        test::init_service(
            App::new()
                .app_data(web::Data::new(UserService::with_dependencies(
                    store.clone(),
                    SECRET,
                    3600,
                )))
                .app_data(web::Data::new(FriendService::with_dependencies(store.clone())))
                .app_data(web::Data::new(ProfileService::with_dependencies(store)))
                .configure(configure_api),
        )
        .await
    }};
}

macro_rules! register {
    ($app:expr, $email:expr, $first:expr) => {{
        let req = TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": $email,
                "password": "secret",
                "password_confirmation": "secret",
                "first_name": $first,
                "last_name": "Tester",
            }))
            .to_request();
        let (status, body) = call!($app, req);
        assert_eq!(status, StatusCode::CREATED);
        format!("Bearer {}", body["data"]["access_token"].as_str().unwrap())
    }};
}

#[actix_web::test]
async fn test_ping_is_public() {
    let app = init_app!();
    let (status, _) = call!(app, TestRequest::get().uri("/ping").to_request());
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_protected_route_requires_token() {
    let app = init_app!();

    let (status, _) = call!(app, TestRequest::get().uri("/friends").to_request());
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/friends")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[actix_web::test]
async fn test_register_twice_then_login() {
    let app = init_app!();
    let _foo = register!(app, "foo@mock.com", "Foo");

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "email": "foo@mock.com",
            "password": "other",
            "password_confirmation": "other",
            "first_name": "Foo",
            "last_name": "Again",
        }))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_EXISTS");

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "foo@mock.com", "password": "wrong" }))
        .to_request();
    let (status, _) = call!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "foo@mock.com", "password": "secret" }))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
}

#[actix_web::test]
async fn test_search_without_params_is_invalid() {
    let app = init_app!();
    let token = register!(app, "foo@mock.com", "Foo");

    let req = TestRequest::get()
        .uri("/users?email=&name=")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let req = TestRequest::get()
        .uri("/users?name=foo")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
}

#[actix_web::test]
async fn test_friend_request_flow() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");
    let bar = register!(app, "bar@mock.com", "Bar");

    let req = TestRequest::put()
        .uri("/friends/requests/bar@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({ "relationship": "classmate" }))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::OK);

    let req = TestRequest::put()
        .uri("/friends/requests/foo@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({}))
        .to_request();
    let (status, _) = call!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri("/friends/requests")
        .insert_header((header::AUTHORIZATION, bar.as_str()))
        .to_request();
    let (_, body) = call!(app, req);
    assert_eq!(body["data"]["request_from"][0]["email"], "foo@mock.com");
    assert_eq!(body["data"]["request_from"][0]["relationship"], "classmate");

    // accepting from the requester side targets the missing inverse row
    let req = TestRequest::post()
        .uri("/friends/requests/bar@mock.com/accept")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FAILED_PRECONDITION");

    let req = TestRequest::post()
        .uri("/friends/requests/foo@mock.com/accept")
        .insert_header((header::AUTHORIZATION, bar.as_str()))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::OK);

    let req = TestRequest::post()
        .uri("/friends/requests/foo@mock.com/accept")
        .insert_header((header::AUTHORIZATION, bar.as_str()))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_EXISTS");

    let req = TestRequest::get()
        .uri("/friends")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    let (_, body) = call!(app, req);
    assert_eq!(body["data"]["friends"][0]["friend_email"], "bar@mock.com");
    assert!(!body["data"]["friends"][0]["date_connected"].as_str().unwrap().is_empty());

    let req = TestRequest::put()
        .uri("/friends/requests/bar@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({ "relationship": "coworker" }))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_friend_request_to_unknown_user() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");

    let req = TestRequest::put()
        .uri("/friends/requests/ghost@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({}))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_cancel_request_returns_no_content() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");
    let _bar = register!(app, "bar@mock.com", "Bar");

    let req = TestRequest::put()
        .uri("/friends/requests/bar@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({}))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::OK);

    let req = TestRequest::delete()
        .uri("/friends/requests/bar@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::NO_CONTENT);

    let req = TestRequest::get()
        .uri("/friends/requests")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    let (_, body) = call!(app, req);
    assert_eq!(body["data"]["request_to"], json!([]));
}

#[actix_web::test]
async fn test_profile_update_and_fetch() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");

    let req = TestRequest::put()
        .uri("/users/profile")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({
            "sex": "F",
            "birthdate": "24/12/1999",
            "hometown": "Savannah",
            "interests": ["chess"],
            "education": [{ "school": "Georgia Tech", "year_graduated": 2020 }],
        }))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::OK);

    let req = TestRequest::get()
        .uri("/users/profile")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    let (_, body) = call!(app, req);
    assert_eq!(body["data"]["birthdate"], "24/12/1999");
    assert_eq!(body["data"]["education"][0]["school"], "Georgia Tech");
    assert_eq!(body["data"]["professional"], json!([]));

    let req = TestRequest::put()
        .uri("/users/profile")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({ "birthdate": "1999-12-24" }))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri("/schools")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    let (_, body) = call!(app, req);
    assert_eq!(body["data"]["schools"][0]["type"], "University");
}

#[actix_web::test]
async fn test_reject_removes_inbound_request() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");
    let bar = register!(app, "bar@mock.com", "Bar");

    let req = TestRequest::put()
        .uri("/friends/requests/bar@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({}))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::OK);

    // rejecting is keyed from the recipient's side
    let req = TestRequest::post()
        .uri("/friends/requests/foo@mock.com/reject")
        .insert_header((header::AUTHORIZATION, bar.as_str()))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::NO_CONTENT);

    for token in [&foo, &bar] {
        let req = TestRequest::get()
            .uri("/friends/requests")
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let (_, body) = call!(app, req);
        assert_eq!(body["data"]["request_to"], json!([]));
        assert_eq!(body["data"]["request_from"], json!([]));
    }

    let req = TestRequest::post()
        .uri("/friends/requests/foo@mock.com/accept")
        .insert_header((header::AUTHORIZATION, bar.as_str()))
        .to_request();
    assert_eq!(call!(app, req).0, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_route_returns_error_body() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");

    let req = TestRequest::get()
        .uri("/friends/requests/bar@mock.com")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("/friends/requests/bar@mock.com"));

    let (status, body) = call!(app, TestRequest::get().uri("/auth/nope").to_request());
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_overlong_profile_field_is_invalid() {
    let app = init_app!();
    let foo = register!(app, "foo@mock.com", "Foo");

    let req = TestRequest::put()
        .uri("/users/profile")
        .insert_header((header::AUTHORIZATION, foo.as_str()))
        .set_json(json!({ "hometown": "x".repeat(101) }))
        .to_request();
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}
