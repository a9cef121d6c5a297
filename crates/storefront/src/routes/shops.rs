//! Shop directory and shop detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use localazy_core::ShopId;
use localazy_core::catalog::{ALL_CATEGORIES, Shop, ShopItem};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::Layout;
use crate::state::AppState;

/// Search query for the shop directory.
#[derive(Debug, Default, Deserialize)]
pub struct ShopsQuery {
    #[serde(default)]
    pub q: String,
}

/// Shop directory template.
#[derive(Template, WebTemplate)]
#[template(path = "shops/index.html")]
pub struct ShopsTemplate {
    pub layout: Layout,
    pub query: String,
    pub shops: Vec<Shop>,
}

/// List shops near the visitor, filtered by name or description.
#[instrument(skip(state, visit))]
pub async fn index(
    State(state): State<AppState>,
    visit: VisitorSession,
    Query(query): Query<ShopsQuery>,
) -> Result<impl IntoResponse> {
    let shops = state
        .catalog()
        .search_shops(&query.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(ShopsTemplate {
        layout: visit.layout().await?,
        query: query.q,
        shops,
    })
}

/// Item filters on the shop page.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "all_categories")]
    pub category: String,
}

fn all_categories() -> String {
    ALL_CATEGORIES.to_string()
}

/// A category tab on the shop page.
pub struct CategoryTab {
    pub name: String,
    pub label: String,
    pub active: bool,
}

/// An item on the shop page with the quantity already in the cart.
pub struct ItemRow {
    pub item: ShopItem,
    pub in_cart: u32,
}

/// Shop detail template.
#[derive(Template, WebTemplate)]
#[template(path = "shops/show.html")]
pub struct ShopTemplate {
    pub layout: Layout,
    pub shop: Shop,
    pub query: String,
    pub category: String,
    pub tabs: Vec<CategoryTab>,
    pub items: Vec<ItemRow>,
}

/// Display one shop with its items.
///
/// # Errors
///
/// Returns 404 for unknown shops.
#[instrument(skip(state, visit))]
pub async fn show(
    State(state): State<AppState>,
    visit: VisitorSession,
    Path(id): Path<ShopId>,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse> {
    let shop = state
        .catalog()
        .shop(id)
        .ok_or_else(|| AppError::NotFound(format!("shop {id}")))?;

    let cart = visit.visitor.cart();
    let items = shop
        .filter_items(&query.q, &query.category)
        .into_iter()
        .map(|item| ItemRow {
            in_cart: cart
                .items()
                .iter()
                .find(|line| line.shop_id == shop.id && line.id == item.id)
                .map_or(0, |line| line.quantity),
            item: item.clone(),
        })
        .collect();

    let tabs = std::iter::once(ALL_CATEGORIES)
        .chain(shop.categories())
        .map(|name| CategoryTab {
            label: if name == ALL_CATEGORIES {
                "All".to_string()
            } else {
                name.to_string()
            },
            active: name == query.category,
            name: name.to_string(),
        })
        .collect();

    Ok(ShopTemplate {
        layout: visit.layout().await?,
        shop: shop.clone(),
        query: query.q,
        category: query.category,
        tabs,
        items,
    })
}
