//! Markdown content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::Layout;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

async fn serve_content_page(
    state: &AppState,
    visit: &VisitorSession,
    slug: &str,
) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        layout: visit.layout().await?,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Display the About page.
///
/// # Errors
///
/// Returns 404 if the page isn't in the content directory.
#[instrument(skip(state, visit))]
pub async fn about(State(state): State<AppState>, visit: VisitorSession) -> Result<impl IntoResponse> {
    serve_content_page(&state, &visit, "about").await
}

/// Display the Help page.
///
/// # Errors
///
/// Returns 404 if the page isn't in the content directory.
#[instrument(skip(state, visit))]
pub async fn help(State(state): State<AppState>, visit: VisitorSession) -> Result<impl IntoResponse> {
    serve_content_page(&state, &visit, "help").await
}
