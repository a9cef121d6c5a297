//! Authentication route handlers.
//!
//! Login and signup are simulated: any well-formed submission signs the
//! visitor in as the requested user kind. Nothing is persisted beyond the
//! session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use localazy_core::UserKind;
use localazy_core::user::{LoginForm, SignupForm, User};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, auth_path, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::{Flash, Layout};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Which tab the auth page opens on.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

fn parse_kind(kind: &str) -> Result<UserKind> {
    kind.parse()
        .map_err(|_| AppError::NotFound(format!("user kind {kind}")))
}

// =============================================================================
// Templates
// =============================================================================

/// Login / signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/page.html")]
pub struct AuthTemplate {
    pub layout: Layout,
    /// `customer`, `store` or `delivery`.
    pub kind: &'static str,
    /// "Customer", "Store Owner" or "Delivery Partner".
    pub kind_label: &'static str,
    pub signup: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login or signup page for a user kind.
///
/// # Errors
///
/// Returns 404 for unknown kinds.
#[instrument(skip(visit))]
pub async fn page(
    visit: VisitorSession,
    Path(kind): Path<String>,
    Query(query): Query<AuthQuery>,
) -> Result<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    Ok(AuthTemplate {
        layout: visit.layout().await?,
        kind: kind.as_str(),
        kind_label: kind.default_display_name(),
        signup: query.mode.as_deref() == Some("signup"),
    })
}

/// Sign in as `kind`.
///
/// Validation failures return to the login tab with the problems flashed.
#[instrument(skip(state, visit, form))]
pub async fn login(
    State(state): State<AppState>,
    mut visit: VisitorSession,
    Path(kind): Path<String>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let kind = parse_kind(&kind)?;
    let email = match form.validate() {
        Ok(email) => email,
        Err(errors) => {
            visit.flash(Flash::error(errors.summary())).await?;
            return Ok(Redirect::to(&auth_path(kind)));
        }
    };

    let user = User::logged_in(state.next_user_id(), kind, email);
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, kind = %kind, "User logged in");

    visit.visitor.set_user(user);
    visit.save().await?;
    visit.flash(Flash::success("Login successful!")).await?;
    Ok(Redirect::to(kind.home_path()))
}

/// Create an account of `kind` and continue to its onboarding page.
#[instrument(skip(state, visit, form))]
pub async fn signup(
    State(state): State<AppState>,
    mut visit: VisitorSession,
    Path(kind): Path<String>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect> {
    let kind = parse_kind(&kind)?;
    let signup = match form.validate() {
        Ok(signup) => signup,
        Err(errors) => {
            visit.flash(Flash::error(errors.summary())).await?;
            return Ok(Redirect::to(&format!("{}?mode=signup", auth_path(kind))));
        }
    };

    let user = User::signed_up(state.next_user_id(), kind, signup);
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, kind = %kind, "User signed up");

    visit.visitor.set_user(user);
    visit.save().await?;
    visit.flash(Flash::success("Signup successful!")).await?;
    Ok(Redirect::to(kind.onboarding_path()))
}

/// Sign out. The cart and location stay with the session.
#[instrument(skip(visit))]
pub async fn logout(mut visit: VisitorSession) -> Result<Redirect> {
    if let Some(user) = visit.visitor.clear_user() {
        tracing::info!(user_id = %user.id, "User logged out");
    }
    clear_sentry_user();
    visit.save().await?;
    visit.flash(Flash::info("You have been signed out")).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_accepts_known_kinds() {
        assert!(matches!(parse_kind("store"), Ok(UserKind::Store)));
        assert!(matches!(parse_kind("customer"), Ok(UserKind::Customer)));
        assert!(matches!(parse_kind("user"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_kind("admin"), Err(AppError::NotFound(_))));
    }
}
