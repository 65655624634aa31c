//! Integration tests for Venue Verge.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database, migrate, and run the server
//! vv-cli migrate
//! cargo run -p venue-verge-web &
//!
//! # Run integration tests against it
//! VV_TEST_BASE_URL=http://127.0.0.1:4000 cargo test -p venue-verge-integration-tests -- --ignored
//! ```
//!
//! Each test signs up fresh accounts with random emails, so runs do not
//! interfere with each other or with existing data.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{Client, Response, StatusCode, redirect};

use venue_verge_core::Role;

/// Environment variable pointing at the running server.
pub const BASE_URL_VAR: &str = "VV_TEST_BASE_URL";

/// Password used for every account the tests create.
pub const TEST_PASSWORD: &str = "integration-password";

static CSRF_INPUT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"name="csrf_token" value="([^"]+)""#).ok());

/// Pull the CSRF token out of a rendered form.
#[must_use]
pub fn extract_csrf_token(html: &str) -> Option<String> {
    CSRF_INPUT
        .as_ref()?
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

/// A browser-like client bound to one cookie jar.
///
/// Redirects are not followed so tests can assert on them.
pub struct TestClient {
    pub client: Client,
    pub base_url: String,
}

impl TestClient {
    /// Client for the server at `VV_TEST_BASE_URL` (default `http://127.0.0.1:4000`).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var(BASE_URL_VAR)
            .unwrap_or_else(|_| "http://127.0.0.1:4000".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");
        Self { client, base_url }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(path)).send().await
    }

    /// GET `path` and return the body.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request fails.
    pub async fn page(&self, path: &str) -> reqwest::Result<String> {
        self.get(path).await?.text().await
    }

    /// Submit a form to `path`, using the CSRF token rendered at `form_page`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if either request fails.
    pub async fn submit(
        &self,
        form_page: &str,
        path: &str,
        fields: &[(&str, &str)],
    ) -> reqwest::Result<Response> {
        let html = self.page(form_page).await?;
        let token = extract_csrf_token(&html).unwrap_or_default();

        let mut body: Vec<(&str, &str)> = fields.to_vec();
        body.push(("csrf_token", &token));
        self.client.post(self.url(path)).form(&body).send().await
    }

    /// Sign up a fresh account with a random email and log in as it.
    ///
    /// Returns the email used.
    ///
    /// # Errors
    ///
    /// Returns the transport error if any request fails.
    pub async fn sign_up_and_log_in(&self, name: &str, role: Role) -> reqwest::Result<String> {
        let email = format!("{}@example.com", uuid::Uuid::new_v4().simple());
        let role = role.code().to_string();

        self.submit(
            "/user/signup",
            "/user/signup",
            &[
                ("name", name),
                ("email", &email),
                ("password", TEST_PASSWORD),
                ("role", &role),
            ],
        )
        .await?;
        self.submit(
            "/user/login",
            "/user/login",
            &[("email", &email), ("password", TEST_PASSWORD)],
        )
        .await?;
        Ok(email)
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The `Location` header of a redirect, if any.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Whether the response is a 303 to `target`.
#[must_use]
pub fn redirects_to(response: &Response, target: &str) -> bool {
    response.status() == StatusCode::SEE_OTHER && location(response) == Some(target)
}
