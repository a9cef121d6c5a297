//! Profile page for every kind of visitor.
//!
//! Anonymous visitors see the orders placed from their session; signed-in
//! users also get an edit form and kind-specific details.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use localazy_core::UserKind;
use localazy_core::order::Order;
use localazy_core::user::ProfileForm;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::{Flash, Layout, OrderView};
use crate::state::AppState;

/// Signed-in user details for the profile template.
pub struct ProfileView {
    /// `customer`, `store` or `delivery`.
    pub kind: &'static str,
    pub kind_label: &'static str,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dashboard_href: &'static str,
    pub setup_href: &'static str,
    pub profile_complete: bool,
    pub store_name: Option<String>,
    pub courier_address: Option<String>,
    pub courier_gender: Option<&'static str>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub profile: Option<ProfileView>,
    pub location: String,
    pub orders: Vec<OrderView>,
    pub orders_heading: &'static str,
}

/// Display the visitor's profile and order history.
///
/// Couriers see the orders assigned to them; everyone else sees the orders
/// placed from this session.
#[instrument(skip(state, visit))]
pub async fn show(State(state): State<AppState>, visit: VisitorSession) -> Result<impl IntoResponse> {
    let user = visit.visitor.user();
    let courier_id = user.filter(|u| u.kind == UserKind::Delivery).map(|u| u.id);

    let orders = {
        let book = state.orders().read().await;
        let mut orders: Vec<&Order> = match courier_id {
            Some(id) => book.assigned_to(id).collect(),
            None => book.by_ids(visit.visitor.order_ids()),
        };
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        OrderView::list(orders, courier_id)
    };

    let profile = user.map(|user| ProfileView {
        kind: user.kind.as_str(),
        kind_label: user.kind.default_display_name(),
        name: user.name.clone(),
        email: user.email.to_string(),
        phone: user.phone.clone().unwrap_or_default(),
        dashboard_href: user.kind.home_path(),
        setup_href: user.kind.onboarding_path(),
        profile_complete: user.is_profile_complete(),
        store_name: user.store.as_ref().map(|s| s.store_name.clone()),
        courier_address: user.courier.as_ref().map(|c| c.address.clone()),
        courier_gender: user.courier.as_ref().map(|c| c.gender.as_str()),
    });

    Ok(ProfileTemplate {
        orders_heading: if courier_id.is_some() {
            "My Deliveries"
        } else {
            "Order History"
        },
        profile,
        location: visit.visitor.location().to_string(),
        orders,
        layout: visit.layout().await?,
    })
}

/// Update the signed-in user's name and phone.
#[instrument(skip(visit, form))]
pub async fn update(mut visit: VisitorSession, Form(form): Form<ProfileForm>) -> Result<Redirect> {
    let Some(user) = visit.visitor.user_mut() else {
        visit
            .flash(Flash::error("Please log in to update your profile"))
            .await?;
        return Ok(Redirect::to("/profile"));
    };

    match form.validate() {
        Ok(update) => {
            user.update_profile(update);
            visit.save().await?;
            visit
                .flash(Flash::success("Profile updated successfully"))
                .await?;
        }
        Err(errors) => visit.flash(Flash::error(errors.summary())).await?,
    }
    Ok(Redirect::to("/profile"))
}
