//! Checkout: delivery details, simulated payment and order creation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use localazy_core::{OrderId, PaymentMethod};
use localazy_core::order::{CheckoutForm, CheckoutOptions, OrderError, delivery_fee_for};
use tracing::instrument;
use uuid::Uuid;

use super::cart::CartView;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::{Flash, Layout};
use crate::state::AppState;

/// A payment method radio button.
pub struct PaymentChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

fn payment_choices(selected: PaymentMethod) -> Vec<PaymentChoice> {
    [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Upi]
        .into_iter()
        .map(|method| PaymentChoice {
            value: method.as_str(),
            label: method.label(),
            checked: method == selected,
        })
        .collect()
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub payments: Vec<PaymentChoice>,
    /// Fresh per rendering; the order book accepts one order per key.
    pub checkout_key: String,
}

/// Display the checkout form, prefilled from the signed-in user and location.
///
/// An empty cart goes back to the cart page.
#[instrument(skip(state, visit))]
pub async fn show(State(state): State<AppState>, visit: VisitorSession) -> Result<Response> {
    if visit.visitor.cart().is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let user = visit.visitor.user();
    let address = if visit.visitor.has_location() {
        visit.visitor.location().to_string()
    } else {
        String::new()
    };

    Ok(CheckoutTemplate {
        cart: CartView::new(visit.visitor.cart(), &state),
        name: user.map(|u| u.name.clone()).unwrap_or_default(),
        phone: user.and_then(|u| u.phone.clone()).unwrap_or_default(),
        address,
        payments: payment_choices(PaymentMethod::default()),
        checkout_key: Uuid::new_v4().to_string(),
        layout: visit.layout().await?,
    }
    .into_response())
}

/// Place the order.
///
/// The cart leaves the session before the simulated payment starts, so a
/// second submit of the same cart finds it empty. The form's checkout key
/// guards the order book against submits that raced past that check.
/// Afterwards the visitor is re-read so cart changes made during the
/// payment are kept, and the order is recorded for their profile.
#[instrument(skip(state, visit, form))]
pub async fn place_order(
    State(state): State<AppState>,
    mut visit: VisitorSession,
    Form(form): Form<CheckoutForm>,
) -> Result<Redirect> {
    if visit.visitor.cart().is_empty() {
        visit.flash(Flash::error("Your cart is empty")).await?;
        return Ok(Redirect::to("/cart"));
    }

    let contact = match form.validate() {
        Ok(contact) => contact.with_fallbacks(visit.visitor.location()),
        Err(errors) => {
            visit.flash(Flash::error(errors.summary())).await?;
            return Ok(Redirect::to("/checkout"));
        }
    };

    let checkout_key = form.checkout_key();
    if let Some(key) = checkout_key.as_deref() {
        let placed = state.orders().read().await.by_checkout_key(key).map(|order| order.id);
        if let Some(order_id) = placed {
            return already_placed(&visit, order_id).await;
        }
    }

    let mut cart = std::mem::take(visit.visitor.cart_mut());
    visit.persist().await?;

    tokio::time::sleep(state.config().delays.payment).await;

    let options = CheckoutOptions {
        payment_method: form.payment_method,
        delivery_fee: delivery_fee_for(cart.subtotal(), state.config().delivery_fee),
        placed_at: Utc::now(),
        checkout_key,
    };

    let placed = {
        let mut orders = state.orders().write().await;
        orders.create_order(
            &mut cart,
            state.catalog(),
            contact,
            options,
            &mut rand::rng(),
        )
    };

    visit.reload().await?;

    let order_id = match placed {
        Ok(order_id) => order_id,
        // Another submit of this form ordered the same cart meanwhile.
        Err(OrderError::AlreadyPlaced(order_id)) => {
            return already_placed(&visit, order_id).await;
        }
        Err(err) => {
            // Hand the cart back unless the visitor started a new one.
            if visit.visitor.cart().is_empty() {
                *visit.visitor.cart_mut() = cart;
                visit.save().await?;
            }
            return Err(err.into());
        }
    };

    visit.visitor.record_order(order_id);
    visit.save().await?;

    tracing::info!(%order_id, payment = form.payment_method.as_str(), "Order placed");
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.to_string().as_str())]));

    visit.flash(Flash::success("Payment was successful!")).await?;
    visit
        .flash(Flash::success(format!("Order {order_id} placed successfully!")))
        .await?;
    Ok(Redirect::to("/profile"))
}

/// Answer a repeated submit of a checkout form that already placed `order_id`.
async fn already_placed(visit: &VisitorSession, order_id: OrderId) -> Result<Redirect> {
    tracing::info!(%order_id, "Repeated checkout submit ignored");
    visit
        .flash(Flash::info(format!("Order {order_id} has already been placed")))
        .await?;
    Ok(Redirect::to("/profile"))
}
