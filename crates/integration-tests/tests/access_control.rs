//! Authentication and role gating against a running server.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use venue_verge_core::Role;
use venue_verge_integration_tests::{TEST_PASSWORD, TestClient, redirects_to};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_health() {
    let client = TestClient::new();
    let response = client.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_anonymous_is_sent_to_login() {
    let client = TestClient::new();
    for path in ["/venue/form", "/reservations", "/reservations/cancelled"] {
        let response = client.get(path).await.unwrap();
        assert!(redirects_to(&response, "/user/login"), "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wrong_role_is_sent_to_unauthorized() {
    let customer = TestClient::new();
    customer
        .sign_up_and_log_in("Casey Customer", Role::Customer)
        .await
        .unwrap();
    let response = customer.get("/venue/form").await.unwrap();
    assert!(redirects_to(&response, "/unauthorized"));

    let owner = TestClient::new();
    owner.sign_up_and_log_in("Olive Owner", Role::Owner).await.unwrap();
    let response = owner.get("/reservations").await.unwrap();
    assert!(redirects_to(&response, "/unauthorized"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_signup_and_bad_login() {
    let client = TestClient::new();
    let email = client
        .sign_up_and_log_in("Casey Customer", Role::Customer)
        .await
        .unwrap();

    let other = TestClient::new();
    let response = other
        .submit(
            "/user/signup",
            "/user/signup",
            &[
                ("name", "Copy Cat"),
                ("email", &email.to_uppercase()),
                ("password", TEST_PASSWORD),
                ("role", "2"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("already exists"));

    let response = other
        .submit(
            "/user/login",
            "/user/login",
            &[("email", &email), ("password", "not-the-password")],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Email or Password is incorrect")
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_logout_ends_session() {
    let client = TestClient::new();
    client
        .sign_up_and_log_in("Casey Customer", Role::Customer)
        .await
        .unwrap();
    assert_eq!(
        client.get("/reservations").await.unwrap().status(),
        StatusCode::OK
    );

    let response = client.submit("/", "/user/logout", &[]).await.unwrap();
    assert!(redirects_to(&response, "/"));
    let home = client.page("/").await.unwrap();
    assert!(home.contains("You have logged out successfully!"));

    let response = client.get("/reservations").await.unwrap();
    assert!(redirects_to(&response, "/user/login"));
}
