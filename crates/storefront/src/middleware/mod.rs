//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, etc.)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! Handlers reach the session through [`VisitorSession`] and the
//! [`RequireStore`] / [`RequireCourier`] extractors.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod visitor;

pub use auth::{RequireCourier, RequireStore, SignedIn};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use visitor::VisitorSession;
