//! In-process test harness for the storefront router.
//!
//! [`TestApp`] builds the real router (same middleware, same templates) with
//! simulated delays switched off. Each [`TestClient`] is one browser: it keeps
//! the session cookie between requests, and several clients can share one
//! app to exercise the customer, store and courier sides together.
//!
//! ```rust,ignore
//! let app = TestApp::new();
//! let mut customer = app.client();
//! let resp = customer.post_form("/cart/add", &[("shop_id", "1"), ("item_id", "101")]).await;
//! assert_eq!(resp.location(), Some("/shops/1"));
//! ```

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use localazy_storefront::config::{SimulatedDelays, StorefrontConfig};
use localazy_storefront::content::ContentStore;
use localazy_storefront::state::AppState;
use tower::ServiceExt;

/// The storefront crate's directory.
fn storefront_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront")
}

/// Configuration for tests: bundled content, no simulated latency.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        content_dir: storefront_dir().join("content"),
        static_dir: storefront_dir().join("static"),
        delays: SimulatedDelays::none(),
        ..StorefrontConfig::default()
    }
}

/// A storefront instance shared by any number of clients.
pub struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    /// Build the app from the bundled content.
    ///
    /// # Panics
    ///
    /// Panics if the bundled content fails to load.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Build the app with a custom configuration, e.g. non-zero delays.
    ///
    /// # Panics
    ///
    /// Panics if the configured content fails to load.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let content = ContentStore::load(&config.content_dir).expect("bundled content loads");
        let state = AppState::new(config, content);
        Self {
            router: localazy_storefront::app(state.clone()),
            state,
        }
    }

    /// A new browser with an empty session.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Shared state, for asserting on orders and inventory directly.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One browser session against a [`TestApp`].
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Another tab of the same browser: shares the session cookie as it is
    /// now, so both can send requests at the same time.
    #[must_use]
    pub fn same_session(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    /// `GET uri`.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// `POST uri` with a urlencoded form.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    /// `POST uri` with a multipart body.
    ///
    /// Text fields come first, then an optional file as
    /// `(field, filename, content type, bytes)`.
    pub async fn post_multipart(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> TestResponse {
        const BOUNDARY: &str = "localazy-test-boundary";

        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, filename, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::post(uri).header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ),
            Body::from(body),
        )
        .await
    }

    #[allow(clippy::expect_used)]
    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
