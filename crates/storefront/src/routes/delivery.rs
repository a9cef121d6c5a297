//! Delivery partner onboarding and order handling.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use localazy_core::order::DeliveryPerson;
use localazy_core::user::CourierSetupForm;
use localazy_core::{OrderId, UserKind};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireCourier;
use crate::models::{Flash, Layout, OrderView};
use crate::state::AppState;

/// Largest accepted ID proof upload.
const MAX_ID_PROOF_SIZE: usize = 1024 * 1024;

/// Gender options on the setup form.
const GENDERS: [(&str, &str); 3] = [("male", "Male"), ("female", "Female"), ("other", "Other")];

// =============================================================================
// Setup
// =============================================================================

/// A gender radio button.
pub struct GenderChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Delivery partner setup template.
#[derive(Template, WebTemplate)]
#[template(path = "delivery/setup.html")]
pub struct SetupTemplate {
    pub layout: Layout,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub genders: Vec<GenderChoice>,
    pub has_id_proof: bool,
}

/// Display the delivery partner setup form.
#[instrument(skip(courier))]
pub async fn setup_page(courier: RequireCourier) -> Result<impl IntoResponse> {
    let user = &courier.user;
    let profile = user.courier.as_ref();
    let gender = profile.map_or("male", |p| p.gender.as_str());

    Ok(SetupTemplate {
        layout: courier.visit.layout().await?,
        name: user.name.clone(),
        phone: user.phone.clone().unwrap_or_default(),
        address: profile.map(|p| p.address.clone()).unwrap_or_default(),
        genders: GENDERS
            .iter()
            .map(|&(value, label)| GenderChoice {
                value,
                label,
                checked: value == gender,
            })
            .collect(),
        has_id_proof: profile.is_some(),
    })
}

/// Read the multipart setup form, turning the ID proof into a `data:` URL.
async fn read_setup_form(mut multipart: Multipart) -> Result<CourierSetupForm> {
    let mut form = CourierSetupForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "id_proof" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Read error: {e}")))?;
            if data.is_empty() {
                continue;
            }
            if data.len() > MAX_ID_PROOF_SIZE {
                return Err(AppError::BadRequest(format!(
                    "ID proof too large: {} bytes (max {MAX_ID_PROOF_SIZE})",
                    data.len()
                )));
            }
            if !content_type.starts_with("image/") {
                return Err(AppError::BadRequest(format!(
                    "Unsupported ID proof type: {content_type}"
                )));
            }
            form.id_proof = Some(format!(
                "data:{content_type};base64,{}",
                STANDARD.encode(&data)
            ));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Read error: {e}")))?;
        match name.as_str() {
            "name" => form.name = value,
            "gender" => form.gender = value,
            "phone" => form.phone = value,
            "address" => form.address = value,
            _ => {}
        }
    }

    Ok(form)
}

/// Complete delivery partner onboarding.
///
/// # Errors
///
/// Returns 400 for malformed uploads. Field validation problems are
/// flashed and the form is shown again.
#[instrument(skip(state, courier, multipart))]
pub async fn setup(
    State(state): State<AppState>,
    mut courier: RequireCourier,
    multipart: Multipart,
) -> Result<Redirect> {
    let mut form = read_setup_form(multipart).await?;
    // Keep the ID proof from an earlier setup when none is re-uploaded.
    if form.id_proof.is_none() {
        form.id_proof = courier.user.courier.as_ref().map(|p| p.id_proof.clone());
    }

    let setup = match form.validate() {
        Ok(setup) => setup,
        Err(errors) => {
            courier.visit.flash(Flash::error(errors.summary())).await?;
            return Ok(Redirect::to("/delivery/setup"));
        }
    };

    tokio::time::sleep(state.config().delays.profile_setup).await;

    courier
        .visit
        .require_mut(UserKind::Delivery)?
        .complete_courier_setup(setup);
    courier.visit.save().await?;
    tracing::info!(user_id = %courier.user.id, "Delivery partner setup complete");

    courier
        .visit
        .flash(Flash::success("Profile setup completed!"))
        .await?;
    Ok(Redirect::to("/delivery/orders"))
}

// =============================================================================
// Orders
// =============================================================================

/// Which list the orders page shows.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    #[serde(default)]
    pub tab: Option<String>,
}

/// Delivery orders template.
#[derive(Template, WebTemplate)]
#[template(path = "delivery/orders.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    /// `available` or `mine`.
    pub tab: &'static str,
    pub orders: Vec<OrderView>,
    pub available_count: usize,
    pub mine_count: usize,
    pub needs_setup: bool,
}

/// Orders waiting for a courier, or the courier's own deliveries.
#[instrument(skip(state, courier))]
pub async fn orders(
    State(state): State<AppState>,
    courier: RequireCourier,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let me = courier.user.id;
    let tab = match query.tab.as_deref() {
        Some("mine") => "mine",
        _ => "available",
    };

    let (orders, available_count, mine_count) = {
        let book = state.orders().read().await;
        let available: Vec<_> = book.available_for_couriers().collect();
        let mine: Vec<_> = book.assigned_to(me).collect();
        let shown = if tab == "mine" { &mine } else { &available };
        (
            OrderView::list(shown.iter().copied(), Some(me)),
            available.len(),
            mine.len(),
        )
    };

    Ok(OrdersTemplate {
        layout: courier.visit.layout().await?,
        tab,
        orders,
        available_count,
        mine_count,
        needs_setup: !courier.user.is_profile_complete(),
    })
}

/// Claim an order for delivery.
///
/// # Errors
///
/// Returns 404 for unknown orders and 409 when someone else claimed it or
/// it is already on its way.
#[instrument(skip(state, courier))]
pub async fn accept(
    State(state): State<AppState>,
    courier: RequireCourier,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    tokio::time::sleep(state.config().delays.courier_accept).await;

    let status = {
        let mut book = state.orders().write().await;
        book.courier_claim(id, DeliveryPerson::from(&courier.user))?
            .status
    };
    tracing::info!(order_id = %id, courier = %courier.user.id, status = status.as_str(), "Order claimed");

    courier
        .visit
        .flash(Flash::success(format!("You have accepted order {id}")))
        .await?;
    courier
        .visit
        .flash(Flash::info("Customer has been notified that you're on the way"))
        .await?;
    Ok(Redirect::to("/delivery/orders?tab=mine"))
}

/// Pick up a claimed order.
///
/// # Errors
///
/// Returns 403 unless the order is assigned to this courier.
#[instrument(skip(state, courier))]
pub async fn start(
    State(state): State<AppState>,
    courier: RequireCourier,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    state
        .orders()
        .write()
        .await
        .start_delivery(id, courier.user.id)?;
    tracing::info!(order_id = %id, "Delivery started");

    courier
        .visit
        .flash(Flash::success(format!("You've started delivery for order {id}")))
        .await?;
    Ok(Redirect::to("/delivery/orders?tab=mine"))
}

/// Hand an order over to the customer.
///
/// # Errors
///
/// Returns 403 unless the order is assigned to this courier, 409 unless it
/// is out for delivery.
#[instrument(skip(state, courier))]
pub async fn complete(
    State(state): State<AppState>,
    courier: RequireCourier,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    state
        .orders()
        .write()
        .await
        .complete_delivery(id, courier.user.id)?;
    tracing::info!(order_id = %id, "Order delivered");

    courier
        .visit
        .flash(Flash::success(format!("Order {id} has been delivered successfully")))
        .await?;
    Ok(Redirect::to("/delivery/orders?tab=mine"))
}
