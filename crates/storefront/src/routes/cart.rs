//! Cart route handlers.
//!
//! The cart lives in the visitor's session and only holds items from one
//! shop at a time.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use localazy_core::cart::{AddOutcome, Cart};
use localazy_core::order::delivery_fee_for;
use localazy_core::{ItemId, ShopId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::{Flash, Layout};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: ItemId,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub shop_id: Option<ShopId>,
    pub shop_name: Option<String>,
    pub item_count: u32,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
}

impl CartView {
    /// Build the view, pricing delivery with the configured flat fee.
    #[must_use]
    pub fn new(cart: &Cart, state: &AppState) -> Self {
        let subtotal = cart.subtotal();
        let delivery_fee = delivery_fee_for(subtotal, state.config().delivery_fee);
        let shop_id = cart.shop_id();

        Self {
            lines: cart
                .items()
                .iter()
                .map(|line| CartLineView {
                    id: line.id,
                    name: line.name.clone(),
                    price: line.price.to_string(),
                    quantity: line.quantity,
                    line_total: line.line_total().to_string(),
                })
                .collect(),
            shop_id,
            shop_name: shop_id
                .and_then(|id| state.catalog().shop(id))
                .map(|shop| shop.name.clone()),
            item_count: cart.item_count(),
            subtotal: subtotal.to_string(),
            delivery_fee: delivery_fee.to_string(),
            total: (subtotal + delivery_fee).to_string(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(state, visit))]
pub async fn show(State(state): State<AppState>, visit: VisitorSession) -> Result<impl IntoResponse> {
    Ok(CartTemplate {
        cart: CartView::new(visit.visitor.cart(), &state),
        layout: visit.layout().await?,
    })
}

/// Get the cart item count badge.
#[instrument(skip(visit))]
pub async fn count(visit: VisitorSession) -> impl IntoResponse {
    CartCountTemplate {
        count: visit.visitor.cart().item_count(),
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub shop_id: ShopId,
    pub item_id: ItemId,
}

/// Add an item to the cart and return to its shop.
///
/// # Errors
///
/// Returns 404 if the shop or item is not in the catalog.
#[instrument(skip(state, visit))]
pub async fn add(
    State(state): State<AppState>,
    mut visit: VisitorSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let item = state
        .catalog()
        .item(form.shop_id, form.item_id)
        .ok_or_else(|| {
            AppError::NotFound(format!("item {} in shop {}", form.item_id, form.shop_id))
        })?;

    let outcome = visit.visitor.cart_mut().add(item, form.shop_id);
    visit.save().await?;

    if let AddOutcome::ReplacedShop { previous } = outcome {
        tracing::info!(%previous, shop_id = %form.shop_id, "Cart switched shops");
        visit
            .flash(Flash::info(
                "Your cart had items from another shop. It now holds this shop's items only.",
            ))
            .await?;
    }
    let item_id = form.item_id.to_string();
    add_breadcrumb("cart", "Added item", Some(&[("item_id", item_id.as_str())]));
    visit
        .flash(Flash::success(format!("Added {} to cart", item.name)))
        .await?;

    Ok(Redirect::to(&format!("/shops/{}", form.shop_id)))
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: ItemId,
    /// Zero or below removes the line.
    pub quantity: i64,
}

/// Set the quantity of a cart line.
#[instrument(skip(visit))]
pub async fn update(mut visit: VisitorSession, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    visit
        .visitor
        .cart_mut()
        .update_quantity(form.item_id, form.quantity);
    visit.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: ItemId,
}

/// Remove a cart line.
#[instrument(skip(visit))]
pub async fn remove(
    mut visit: VisitorSession,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    if let Some(line) = visit.visitor.cart_mut().remove(form.item_id) {
        visit.save().await?;
        visit
            .flash(Flash::info(format!("Removed {} from cart", line.name)))
            .await?;
    }
    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(visit))]
pub async fn clear(mut visit: VisitorSession) -> Result<Redirect> {
    visit.visitor.cart_mut().clear();
    visit.save().await?;
    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use localazy_core::catalog::{Catalog, Shop, ShopItem};
    use localazy_core::Price;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::content::ContentStore;

    fn state() -> AppState {
        let shop = Shop {
            id: ShopId::new(1),
            name: "Corner Grocery".to_string(),
            description: String::new(),
            image_url: String::new(),
            rating: 4.5,
            delivery_time: "20 min".to_string(),
            distance: "1 km".to_string(),
            items: vec![ShopItem {
                id: ItemId::new(101),
                name: "Milk".to_string(),
                price: Price::rupees(30),
                description: String::new(),
                category: "Dairy".to_string(),
                image_url: None,
            }],
        };
        AppState::new(
            StorefrontConfig::default(),
            ContentStore::with_catalog(Catalog::new(vec![shop])),
        )
    }

    #[test]
    fn test_cart_view_empty_has_no_delivery_fee() {
        let view = CartView::new(&Cart::new(), &state());
        assert!(view.is_empty());
        assert_eq!(view.delivery_fee, "₹0.00");
        assert_eq!(view.total, "₹0.00");
        assert!(view.shop_name.is_none());
    }

    #[test]
    fn test_cart_view_totals_include_delivery_fee() {
        let state = state();
        let mut cart = Cart::new();
        let milk = state.catalog().item(ShopId::new(1), ItemId::new(101)).unwrap();
        cart.add(milk, ShopId::new(1));
        cart.add(milk, ShopId::new(1));

        let view = CartView::new(&cart, &state);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "₹60.00");
        assert_eq!(view.delivery_fee, "₹40.00");
        assert_eq!(view.total, "₹100.00");
        assert_eq!(view.shop_name.as_deref(), Some("Corner Grocery"));
    }
}
