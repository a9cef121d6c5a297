//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use localazy_core::UserKind;
use localazy_core::inventory::InventoryError;
use localazy_core::order::OrderError;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order book rejected the operation.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Store inventory rejected the operation.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Page needs a signed-in user of this kind.
    #[error("Sign in as {0} required")]
    AuthRequired(UserKind),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Order(err) => match err {
                OrderError::NotFound(_) => StatusCode::NOT_FOUND,
                OrderError::InvalidTransition { .. }
                | OrderError::AlreadyAssigned(_)
                | OrderError::AlreadyPlaced(_) => StatusCode::CONFLICT,
                OrderError::NotAssignee(_) => StatusCode::FORBIDDEN,
                OrderError::EmptyCart => StatusCode::BAD_REQUEST,
                OrderError::IdsExhausted => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Inventory(err) => match err {
                InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
                InventoryError::Invalid(_) => StatusCode::BAD_REQUEST,
            },
            Self::AuthRequired(_) => StatusCode::SEE_OTHER,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::AuthRequired(kind) = self {
            return Redirect::to(&auth_path(kind)).into_response();
        }

        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Order(err) => err.to_string(),
            Self::Inventory(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Login page for `kind`.
#[must_use]
pub fn auth_path(kind: UserKind) -> String {
    format!("/auth/{kind}")
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "101")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use localazy_core::{OrderId, OrderStatus, ProductId};

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("shop 9".to_string());
        assert_eq!(err.to_string(), "Not found: shop 9");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_auth_required_redirects_to_kind_login() {
        let response = AppError::AuthRequired(UserKind::Delivery).into_response();
        assert_eq!(
            response.headers().get(axum::http::header::LOCATION).map(|v| v.as_bytes()),
            Some(b"/auth/delivery".as_slice())
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        let id = OrderId::new(7);
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::NotFound(id).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                OrderError::InvalidTransition {
                    id,
                    from: OrderStatus::Delivered,
                    to: OrderStatus::Pending,
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(OrderError::AlreadyAssigned(id).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(OrderError::NotAssignee(id).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(OrderError::IdsExhausted.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(OrderError::EmptyCart.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(InventoryError::NotFound(ProductId::new(3)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::AuthRequired(UserKind::Store)),
            StatusCode::SEE_OTHER
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
