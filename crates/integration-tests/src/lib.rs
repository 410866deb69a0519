//! Integration tests for the VIRA storefront.
//!
//! The tests drive the real router in-process with `tower::ServiceExt::oneshot`.
//! [`TestApp`] remembers the session cookie between requests, so a sequence
//! of calls behaves like one visitor's browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vira-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use vira_core::Catalog;
use vira_storefront::config::StorefrontConfig;
use vira_storefront::services::{OutfitSuggester, Suggestion, SuggestionError};
use vira_storefront::state::AppState;

/// The catalog shipped with the storefront.
pub const CATALOG_JSON: &str = include_str!("../../storefront/content/catalog.json");

/// Suggester returning a canned answer, or failing when given `None`.
#[derive(Debug, Clone, Default)]
pub struct StubSuggester {
    ids: Option<Vec<String>>,
}

impl StubSuggester {
    /// Always suggest `ids`.
    #[must_use]
    pub fn returning<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Always fail.
    #[must_use]
    pub const fn failing() -> Self {
        Self { ids: None }
    }
}

#[async_trait]
impl OutfitSuggester for StubSuggester {
    async fn suggest(
        &self,
        _occasion: &str,
        _catalog: &Catalog,
    ) -> Result<Suggestion, SuggestionError> {
        self.ids
            .clone()
            .map(|ids| Suggestion {
                selected_product_ids: ids,
                reasoning: "Testovací outfit.".to_string(),
            })
            .ok_or(SuggestionError::EmptyResponse)
    }
}

/// Configuration for tests: no delays, no external services.
///
/// # Panics
///
/// Panics if the hard-coded base URL fails to parse.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: url::Url::parse("http://localhost:3000").expect("valid base URL"),
        catalog_path: "../storefront/content/catalog.json".into(),
        login_delay: Duration::ZERO,
        checkout_delay: Duration::ZERO,
        session_capacity: 1_000,
        gemini: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// One visitor talking to an in-process storefront.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront whose suggestion service always fails.
    ///
    /// # Panics
    ///
    /// Panics if the bundled catalog is invalid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_suggester(StubSuggester::failing())
    }

    /// Storefront using `suggester` for outfit suggestions.
    ///
    /// # Panics
    ///
    /// Panics if the bundled catalog is invalid.
    #[must_use]
    pub fn with_suggester(suggester: impl OutfitSuggester + 'static) -> Self {
        let catalog = Catalog::from_json(CATALOG_JSON).expect("bundled catalog is valid");
        let state = AppState::new(test_config(), catalog, Arc::new(suggester));
        Self {
            router: vira_storefront::app(state),
            cookie: None,
        }
    }

    /// A second visitor sharing this storefront but not its session.
    #[must_use]
    pub fn other_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Send a request, remembering any session cookie the response sets.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, &[]).await
    }

    /// `POST path` with a JSON body.
    pub async fn post(&mut self, path: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    /// `POST path` with no body.
    pub async fn post_empty(&mut self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None, &[]).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
