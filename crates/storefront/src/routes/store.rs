//! Store owner setup and dashboard.
//!
//! The dashboard has four views selected by `?view=`: an overview with
//! stock counts, product management, an add-product form and the order
//! queue. Product selection for bulk delete is kept in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use localazy_core::inventory::{InventoryError, NewProductForm, Product, Selection};
use localazy_core::user::{StoreProfile, StoreSetupForm};
use localazy_core::{OrderId, OrderStatus, ProductId, ShopId, UserKind};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireStore;
use crate::models::{Flash, Layout, OrderView, session_keys};
use crate::state::AppState;

const DEFAULT_STORE_NAME: &str = "My Amazing Store";
const DEFAULT_TAGLINE: &str = "The best products in town!";
const DEFAULT_DESCRIPTION: &str = "We offer high-quality products at affordable prices.";

// =============================================================================
// Session Helpers
// =============================================================================

async fn get_selection(session: &Session) -> Result<Selection> {
    Ok(session
        .get::<Selection>(session_keys::PRODUCT_SELECTION)
        .await?
        .unwrap_or_default())
}

async fn set_selection(session: &Session, selection: &Selection) -> Result<()> {
    session
        .insert(session_keys::PRODUCT_SELECTION, selection)
        .await?;
    Ok(())
}

// =============================================================================
// Setup
// =============================================================================

/// Store setup template.
#[derive(Template, WebTemplate)]
#[template(path = "store/setup.html")]
pub struct SetupTemplate {
    pub layout: Layout,
    pub store_name: String,
    pub email: String,
    pub contact: String,
    pub tagline: String,
    pub description: String,
}

/// Display the store setup form, prefilled from any earlier setup.
#[instrument(skip(owner))]
pub async fn setup_page(owner: RequireStore) -> Result<impl IntoResponse> {
    let user = &owner.user;
    let store = user.store.as_ref();

    Ok(SetupTemplate {
        layout: owner.visit.layout().await?,
        store_name: store.map(|s| s.store_name.clone()).unwrap_or_default(),
        email: store.map_or_else(|| user.email.to_string(), |s| s.email.to_string()),
        contact: store
            .map(|s| s.contact.clone())
            .or_else(|| user.phone.clone())
            .unwrap_or_default(),
        tagline: store.map(|s| s.tagline.clone()).unwrap_or_default(),
        description: store.map(|s| s.description.clone()).unwrap_or_default(),
    })
}

/// Save the store profile.
#[instrument(skip(state, owner, form))]
pub async fn setup(
    State(state): State<AppState>,
    mut owner: RequireStore,
    Form(form): Form<StoreSetupForm>,
) -> Result<Redirect> {
    let profile = match form.validate() {
        Ok(profile) => profile,
        Err(errors) => {
            owner.visit.flash(Flash::error(errors.summary())).await?;
            return Ok(Redirect::to("/store/setup"));
        }
    };

    tokio::time::sleep(state.config().delays.profile_setup).await;

    owner
        .visit
        .require_mut(UserKind::Store)?
        .complete_store_setup(profile);
    owner.visit.save().await?;
    tracing::info!(user_id = %owner.user.id, "Store setup complete");

    owner
        .visit
        .flash(Flash::success(
            "Store setup complete! Your store has been successfully registered.",
        ))
        .await?;
    Ok(Redirect::to("/store/dashboard"))
}

// =============================================================================
// Dashboard
// =============================================================================

/// Dashboard query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub q: String,
    /// Orders view: restrict to one shop. Blank means all shops.
    #[serde(default)]
    pub shop: Option<String>,
}

impl DashboardQuery {
    fn shop_id(&self) -> Option<ShopId> {
        self.shop.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Store header shown above every dashboard view.
pub struct StoreHeader {
    pub name: String,
    pub tagline: String,
    pub description: String,
}

impl StoreHeader {
    fn new(profile: Option<&StoreProfile>) -> Self {
        fn or_default(value: Option<&String>, fallback: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .map_or_else(|| fallback.to_string(), Clone::clone)
        }

        Self {
            name: or_default(profile.map(|p| &p.store_name), DEFAULT_STORE_NAME),
            tagline: or_default(profile.map(|p| &p.tagline), DEFAULT_TAGLINE),
            description: or_default(profile.map(|p| &p.description), DEFAULT_DESCRIPTION),
        }
    }
}

/// A product row on the manage view.
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub category: String,
    pub in_stock: bool,
    pub selected: bool,
}

impl ProductRow {
    fn new(product: &Product, selection: &Selection) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            in_stock: product.in_stock,
            selected: selection.contains(product.id),
        }
    }
}

/// A shop filter option on the orders view.
pub struct ShopOption {
    pub id: ShopId,
    pub name: String,
    pub selected: bool,
}

/// Store dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "store/dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub store: StoreHeader,
    pub needs_setup: bool,
    /// `overview`, `manage`, `add` or `orders`.
    pub view: &'static str,
    pub total_products: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub query: String,
    pub products: Vec<ProductRow>,
    pub selected_count: usize,
    pub all_selected: bool,
    pub shops: Vec<ShopOption>,
    pub orders: Vec<OrderView>,
    pub pending_orders: usize,
}

fn dashboard_view(view: Option<&str>) -> &'static str {
    match view {
        Some("manage") => "manage",
        Some("add") => "add",
        Some("orders") => "orders",
        _ => "overview",
    }
}

/// Display the store dashboard.
#[instrument(skip(state, owner))]
pub async fn dashboard(
    State(state): State<AppState>,
    owner: RequireStore,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse> {
    let view = dashboard_view(query.view.as_deref());
    let shop_filter = query.shop_id();
    let selection = get_selection(owner.visit.session()).await?;

    let (total_products, in_stock, out_of_stock, products) = {
        let inventory = state.inventory().read().await;
        let visible = inventory.search(&query.q);
        (
            inventory.products().len(),
            inventory.in_stock_count(),
            inventory.out_of_stock_count(),
            visible
                .iter()
                .map(|product| ProductRow::new(product, &selection))
                .collect::<Vec<_>>(),
        )
    };

    let (orders, pending_orders) = {
        let book = state.orders().read().await;
        let shown = match shop_filter {
            Some(shop) => book.for_shop(shop),
            None => book.all().iter().rev().collect(),
        };
        let pending = book
            .all()
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .count();
        (OrderView::list(shown, None), pending)
    };

    let shops = state
        .catalog()
        .shops()
        .iter()
        .map(|shop| ShopOption {
            id: shop.id,
            name: shop.name.clone(),
            selected: shop_filter == Some(shop.id),
        })
        .collect();

    Ok(DashboardTemplate {
        store: StoreHeader::new(owner.user.store.as_ref()),
        needs_setup: !owner.user.is_profile_complete(),
        view,
        total_products,
        in_stock,
        out_of_stock,
        all_selected: !products.is_empty() && products.iter().all(|p| p.selected),
        selected_count: selection.len(),
        products,
        query: query.q,
        shops,
        orders,
        pending_orders,
        layout: owner.visit.layout().await?,
    })
}

// =============================================================================
// Products
// =============================================================================

/// Add a product from the add view.
///
/// Validation problems are flashed and the add view is shown again.
#[instrument(skip(state, owner, form))]
pub async fn add_product(
    State(state): State<AppState>,
    owner: RequireStore,
    Form(form): Form<NewProductForm>,
) -> Result<Redirect> {
    let added = {
        let mut inventory = state.inventory().write().await;
        inventory.add(&form).map(|product| product.name.clone())
    };

    match added {
        Ok(name) => {
            tracing::info!(product = %name, "Product added");
            owner
                .visit
                .flash(Flash::success(format!("{name} has been added to your store")))
                .await?;
            Ok(Redirect::to("/store/dashboard?view=manage"))
        }
        Err(InventoryError::Invalid(errors)) => {
            owner.visit.flash(Flash::error(errors.summary())).await?;
            Ok(Redirect::to("/store/dashboard?view=add"))
        }
        Err(err) => Err(err.into()),
    }
}

/// Flip a product between in stock and out of stock.
///
/// # Errors
///
/// Returns 404 for unknown products.
#[instrument(skip(state, owner))]
pub async fn toggle_stock(
    State(state): State<AppState>,
    owner: RequireStore,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let (name, in_stock) = {
        let mut inventory = state.inventory().write().await;
        let product = inventory.toggle_stock(id)?;
        (product.name.clone(), product.in_stock)
    };

    let status = if in_stock { "in stock" } else { "out of stock" };
    owner
        .visit
        .flash(Flash::info(format!("{name} is now {status}")))
        .await?;
    Ok(Redirect::to("/store/dashboard?view=manage"))
}

/// Toggle one product in the bulk selection.
#[instrument(skip(owner))]
pub async fn select(owner: RequireStore, Path(id): Path<ProductId>) -> Result<Redirect> {
    let session = owner.visit.session();
    let mut selection = get_selection(session).await?;
    selection.toggle(id);
    set_selection(session, &selection).await?;
    Ok(Redirect::to("/store/dashboard?view=manage"))
}

/// Search the manage view was showing when "select all" was pressed.
#[derive(Debug, Default, Deserialize)]
pub struct SelectAllForm {
    #[serde(default)]
    pub q: String,
}

/// Select every product matching the current search, or clear the
/// selection if they are all selected already.
#[instrument(skip(state, owner))]
pub async fn select_all(
    State(state): State<AppState>,
    owner: RequireStore,
    Form(form): Form<SelectAllForm>,
) -> Result<Redirect> {
    let session = owner.visit.session();
    let mut selection = get_selection(session).await?;
    {
        let inventory = state.inventory().read().await;
        selection.toggle_all(&inventory.search(&form.q));
    }
    set_selection(session, &selection).await?;
    Ok(Redirect::to("/store/dashboard?view=manage"))
}

/// Delete the selected products and clear the selection.
#[instrument(skip(state, owner))]
pub async fn delete_selected(State(state): State<AppState>, owner: RequireStore) -> Result<Redirect> {
    let session = owner.visit.session();
    let selection = get_selection(session).await?;
    if selection.is_empty() {
        owner
            .visit
            .flash(Flash::error("Select products to delete first"))
            .await?;
        return Ok(Redirect::to("/store/dashboard?view=manage"));
    }

    let removed = state.inventory().write().await.delete(selection.ids());
    set_selection(session, &Selection::new()).await?;
    tracing::info!(removed, "Products deleted");

    owner
        .visit
        .flash(Flash::success(format!("{removed} product(s) deleted")))
        .await?;
    Ok(Redirect::to("/store/dashboard?view=manage"))
}

// =============================================================================
// Orders
// =============================================================================

/// Accept a pending order.
///
/// # Errors
///
/// Returns 404 for unknown orders and 409 unless the order is pending.
#[instrument(skip(state, owner))]
pub async fn accept_order(
    State(state): State<AppState>,
    owner: RequireStore,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    state.orders().write().await.store_accept(id)?;
    tracing::info!(order_id = %id, "Store accepted order");

    owner
        .visit
        .flash(Flash::success(format!("Order {id} accepted")))
        .await?;
    Ok(Redirect::to("/store/dashboard?view=orders"))
}

/// Start preparing an order.
///
/// # Errors
///
/// Returns 404 for unknown orders and 409 once the order is past preparing.
#[instrument(skip(state, owner))]
pub async fn prepare_order(
    State(state): State<AppState>,
    owner: RequireStore,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    state.orders().write().await.store_prepare(id)?;
    tracing::info!(order_id = %id, "Store preparing order");

    owner
        .visit
        .flash(Flash::success(format!("Order {id} is being prepared")))
        .await?;
    Ok(Redirect::to("/store/dashboard?view=orders"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use localazy_core::Email;

    use super::*;

    #[test]
    fn test_dashboard_view_defaults_to_overview() {
        assert_eq!(dashboard_view(None), "overview");
        assert_eq!(dashboard_view(Some("orders")), "orders");
        assert_eq!(dashboard_view(Some("bogus")), "overview");
    }

    #[test]
    fn test_blank_shop_filter_means_all_shops() {
        let query = DashboardQuery {
            shop: Some(String::new()),
            ..DashboardQuery::default()
        };
        assert_eq!(query.shop_id(), None);

        let query = DashboardQuery {
            shop: Some("2".to_string()),
            ..DashboardQuery::default()
        };
        assert_eq!(query.shop_id(), Some(ShopId::new(2)));
    }

    #[test]
    fn test_store_header_falls_back_to_defaults() {
        let header = StoreHeader::new(None);
        assert_eq!(header.name, DEFAULT_STORE_NAME);
        assert_eq!(header.tagline, DEFAULT_TAGLINE);

        let profile = StoreProfile {
            store_name: "Lake Bakery".to_string(),
            email: Email::parse("lake@example.com").unwrap(),
            contact: "9876543210".to_string(),
            tagline: String::new(),
            description: "Sourdough daily".to_string(),
        };
        let header = StoreHeader::new(Some(&profile));
        assert_eq!(header.name, "Lake Bakery");
        assert_eq!(header.tagline, DEFAULT_TAGLINE);
        assert_eq!(header.description, "Sourdough daily");
    }
}
