//! Display data for templates.

use localazy_core::order::Order;
use localazy_core::visitor::Visitor;
use localazy_core::{OrderStatus, UserId};

use super::session::Flash;

/// Data every page needs for the header and flash area.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user_name: Option<String>,
    pub user_initial: String,
    /// `customer`, `store` or `delivery`, when signed in.
    pub user_kind: Option<&'static str>,
    pub dashboard_href: Option<&'static str>,
    pub location: String,
    pub cart_count: u32,
    pub flashes: Vec<Flash>,
}

impl Layout {
    #[must_use]
    pub fn new(visitor: &Visitor, flashes: Vec<Flash>) -> Self {
        let user = visitor.user();
        Self {
            user_name: user.map(|u| u.name.clone()),
            user_initial: user.map(localazy_core::user::User::initial).unwrap_or_default(),
            user_kind: user.map(|u| u.kind.as_str()),
            dashboard_href: user.map(|u| u.kind.home_path()),
            location: visitor.location().to_string(),
            cart_count: visitor.cart().item_count(),
            flashes,
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

/// An order as shown on profile pages and dashboards.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub shop_name: String,
    /// Machine status, used as a CSS modifier.
    pub status: &'static str,
    pub status_label: &'static str,
    pub items: Vec<OrderLineView>,
    pub item_count: u32,
    pub total: String,
    pub delivery_fee: String,
    pub amount_due: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub payment_method: &'static str,
    pub courier_name: Option<String>,
    pub placed_at: String,
    pub can_store_accept: bool,
    pub can_store_prepare: bool,
    pub can_claim: bool,
    pub can_start: bool,
    pub can_complete: bool,
}

impl OrderView {
    /// Build the view for `viewer`, who decides which courier actions apply.
    #[must_use]
    pub fn new(order: &Order, viewer: Option<UserId>) -> Self {
        let status = order.status;
        let mine = viewer.is_some() && order.courier_id() == viewer;

        Self {
            id: order.id.to_string(),
            shop_name: order.shop_name.clone(),
            status: status.as_str(),
            status_label: status.label(),
            items: order
                .items
                .iter()
                .map(|item| OrderLineView {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total().to_string(),
                })
                .collect(),
            item_count: order.item_count(),
            total: order.total.to_string(),
            delivery_fee: order.delivery_fee.to_string(),
            amount_due: order.amount_due().to_string(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_address: order.customer_address.clone(),
            payment_method: order.payment_method.label(),
            courier_name: order.delivery_person.as_ref().map(|p| p.name.clone()),
            placed_at: order.placed_at.format("%d %b %Y, %H:%M").to_string(),
            can_store_accept: status == OrderStatus::Pending,
            can_store_prepare: status.can_transition_to(OrderStatus::Preparing),
            can_claim: order.delivery_person.is_none()
                && status.rank() <= OrderStatus::Preparing.rank(),
            can_start: mine && status.can_transition_to(OrderStatus::OutForDelivery),
            can_complete: mine && status == OrderStatus::OutForDelivery,
        }
    }

    #[must_use]
    pub fn list<'a>(orders: impl IntoIterator<Item = &'a Order>, viewer: Option<UserId>) -> Vec<Self> {
        orders.into_iter().map(|order| Self::new(order, viewer)).collect()
    }
}
