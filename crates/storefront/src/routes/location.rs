//! Location picker route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use localazy_core::location::{self, DETECTED_LOCATION};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::{Flash, Layout};
use crate::state::AppState;

/// Where to go once a location is set.
const NEXT_PAGE: &str = "/shops";

/// Search query for known locations.
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub q: String,
}

/// Location picker template.
#[derive(Template, WebTemplate)]
#[template(path = "location.html")]
pub struct LocationTemplate {
    pub layout: Layout,
    pub query: String,
    pub suggestions: Vec<&'static str>,
}

/// Display the location picker.
#[instrument(skip(visit))]
pub async fn show(
    visit: VisitorSession,
    Query(query): Query<LocationQuery>,
) -> Result<impl IntoResponse> {
    Ok(LocationTemplate {
        layout: visit.layout().await?,
        suggestions: location::search(&query.q),
        query: query.q,
    })
}

/// Set location form data.
#[derive(Debug, Deserialize)]
pub struct SetLocationForm {
    pub location: String,
}

/// Set the visitor's location.
///
/// A blank location is rejected and the picker is shown again.
#[instrument(skip(visit, form))]
pub async fn set(mut visit: VisitorSession, Form(form): Form<SetLocationForm>) -> Result<Redirect> {
    if !visit.visitor.set_location(&form.location) {
        visit.flash(Flash::error("Please choose a location")).await?;
        return Ok(Redirect::to("/location"));
    }
    visit.save().await?;
    visit
        .flash(Flash::success(format!("Location set to {}", visit.visitor.location())))
        .await?;
    Ok(Redirect::to(NEXT_PAGE))
}

/// Pretend to geolocate the visitor.
#[instrument(skip(state, visit))]
pub async fn detect(State(state): State<AppState>, mut visit: VisitorSession) -> Result<Redirect> {
    tokio::time::sleep(state.config().delays.detect_location).await;

    visit.visitor.set_location(DETECTED_LOCATION);
    visit.save().await?;
    visit.flash(Flash::success("Location detected")).await?;
    Ok(Redirect::to(NEXT_PAGE))
}
