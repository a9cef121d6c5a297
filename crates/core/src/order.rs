//! Orders and the order book shared by every dashboard.
//!
//! An order is a snapshot of a cart plus a delivery status. Stores and
//! couriers move the status forward; nothing ever moves it back.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::catalog::Catalog;
use crate::types::{OrderId, OrderStatus, PaymentMethod, Price, ShopId, UserId};
use crate::user::{MIN_ADDRESS_LEN, MIN_NAME_LEN, MIN_PHONE_LEN, User, ValidationErrors};

/// Shop name used when the cart's shop is not in the catalog.
pub const FALLBACK_SHOP_NAME: &str = "Store";
/// Customer name used when checkout leaves it blank.
pub const GUEST_NAME: &str = "Guest";
/// Customer phone used when checkout leaves it blank.
pub const PLACEHOLDER_PHONE: &str = "000-000-0000";

/// Random draws tried before scanning for the lowest free order number.
const RANDOM_ID_ATTEMPTS: usize = 64;

/// Errors from order book operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("order {0} has already been accepted by another delivery partner")]
    AlreadyAssigned(OrderId),

    #[error("order {0} is not assigned to you")]
    NotAssignee(OrderId),

    #[error("cart is empty")]
    EmptyCart,

    #[error("order {0} was already placed from this checkout")]
    AlreadyPlaced(OrderId),

    #[error("every order number is in use")]
    IdsExhausted,
}

/// The courier delivering an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPerson {
    pub id: UserId,
    pub name: String,
    pub gender: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub id_proof: Option<String>,
}

impl From<&User> for DeliveryPerson {
    fn from(user: &User) -> Self {
        let courier = user.courier.as_ref();
        Self {
            id: user.id,
            name: user.name.clone(),
            gender: courier.map(|c| c.gender.to_string()).unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            address: courier.map(|c| c.address.clone()).unwrap_or_default(),
            id_proof: courier.map(|c| c.id_proof.clone()),
        }
    }
}

/// Contact details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CustomerContact {
    /// Fill blank fields with the fallbacks used for anonymous checkouts.
    ///
    /// A blank address falls back to the visitor's current location.
    #[must_use]
    pub fn with_fallbacks(self, current_location: &str) -> Self {
        fn or(value: String, fallback: &str) -> String {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        }

        Self {
            name: or(self.name, GUEST_NAME),
            phone: or(self.phone, PLACEHOLDER_PHONE),
            address: or(self.address, current_location),
        }
    }
}

/// The checkout form.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Hidden field issued with the checkout page; one order per key.
    #[serde(default)]
    pub checkout_key: Option<String>,
}

impl CheckoutForm {
    /// The submitted checkout key, if it is not blank.
    #[must_use]
    pub fn checkout_key(&self) -> Option<String> {
        self.checkout_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// # Errors
    ///
    /// Returns every field that is too short to deliver to.
    pub fn validate(&self) -> Result<CustomerContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_min_len("name", &self.name, MIN_NAME_LEN, "Name is required");
        errors.check_min_len(
            "phone",
            &self.phone,
            MIN_PHONE_LEN,
            "Valid phone number is required",
        );
        errors.check_min_len(
            "address",
            &self.address,
            MIN_ADDRESS_LEN,
            "Complete address is required",
        );
        errors.finish(CustomerContact {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

/// Delivery fee for a cart subtotal: the flat fee, or nothing for an empty cart.
#[must_use]
pub fn delivery_fee_for(subtotal: Price, flat_fee: Price) -> Price {
    if subtotal.is_positive() { flat_fee } else { Price::ZERO }
}

/// Checkout options that are not part of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub payment_method: PaymentMethod,
    pub delivery_fee: Price,
    pub placed_at: DateTime<Utc>,
    pub checkout_key: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    /// Sum of price × quantity over `items`. Excludes the delivery fee.
    pub total: Price,
    pub status: OrderStatus,
    pub shop_id: ShopId,
    pub shop_name: String,
    pub customer_address: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_person: Option<DeliveryPerson>,
    pub delivery_fee: Price,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
    /// Key of the checkout form that placed this order.
    #[serde(default)]
    pub checkout_key: Option<String>,
}

impl Order {
    /// What the customer pays: item total plus delivery fee.
    #[must_use]
    pub fn amount_due(&self) -> Price {
        self.total + self.delivery_fee
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn courier_id(&self) -> Option<UserId> {
        self.delivery_person.as_ref().map(|person| person.id)
    }

    fn advance(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(to) {
            return Err(OrderError::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    fn ensure_assignee(&self, courier: UserId) -> Result<(), OrderError> {
        if self.courier_id() == Some(courier) {
            Ok(())
        } else {
            Err(OrderError::NotAssignee(self.id))
        }
    }
}

/// Every order placed since the process started.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Turn the cart into a pending order and empty the cart.
    ///
    /// # Errors
    ///
    /// Changes nothing and returns [`OrderError::AlreadyPlaced`] when an
    /// order with the same checkout key exists, [`OrderError::EmptyCart`]
    /// for an empty cart, and [`OrderError::IdsExhausted`] when every
    /// order number is taken.
    pub fn create_order(
        &mut self,
        cart: &mut Cart,
        catalog: &Catalog,
        contact: CustomerContact,
        options: CheckoutOptions,
        rng: &mut impl Rng,
    ) -> Result<OrderId, OrderError> {
        if let Some(existing) = options
            .checkout_key
            .as_deref()
            .and_then(|key| self.by_checkout_key(key))
        {
            return Err(OrderError::AlreadyPlaced(existing.id));
        }
        let shop_id = cart.shop_id().ok_or(OrderError::EmptyCart)?;
        let id = self.fresh_id(rng).ok_or(OrderError::IdsExhausted)?;
        let shop_name = catalog
            .shop(shop_id)
            .map_or_else(|| FALLBACK_SHOP_NAME.to_string(), |shop| shop.name.clone());
        let total = cart.subtotal();

        self.orders.push(Order {
            id,
            items: cart.take_items(),
            total,
            status: OrderStatus::Pending,
            shop_id,
            shop_name,
            customer_address: contact.address,
            customer_name: contact.name,
            customer_phone: contact.phone,
            delivery_person: None,
            delivery_fee: options.delivery_fee,
            payment_method: options.payment_method,
            placed_at: options.placed_at,
            checkout_key: options.checkout_key,
        });
        Ok(id)
    }

    /// Pick an `ORD<n>` id not used by any existing order.
    ///
    /// Random draws first; once they keep colliding, the lowest free number.
    /// `None` when all of them are taken.
    fn fresh_id(&self, rng: &mut impl Rng) -> Option<OrderId> {
        let has_room = u32::try_from(self.orders.len()).is_ok_and(|n| n < OrderId::MAX_NUMBER);
        if !has_room {
            return None;
        }

        for _ in 0..RANDOM_ID_ATTEMPTS {
            let id = OrderId::new(rng.random_range(0..OrderId::MAX_NUMBER));
            if self.get(id).is_none() {
                return Some(id);
            }
        }

        let used: HashSet<OrderId> = self.orders.iter().map(|order| order.id).collect();
        (0..OrderId::MAX_NUMBER)
            .map(OrderId::new)
            .find(|id| !used.contains(id))
    }

    /// Move an order to `status`, optionally attaching a courier.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for unknown ids and
    /// [`OrderError::InvalidTransition`] unless `status` is strictly after
    /// the current one.
    pub fn update_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        delivery_person: Option<DeliveryPerson>,
    ) -> Result<&Order, OrderError> {
        let order = self.get_mut(id)?;
        order.advance(status)?;
        if let Some(person) = delivery_person {
            order.delivery_person = Some(person);
        }
        Ok(order)
    }

    /// The store confirms a pending order.
    ///
    /// # Errors
    ///
    /// Fails if the order is unknown or no longer pending.
    pub fn store_accept(&mut self, id: OrderId) -> Result<&Order, OrderError> {
        self.update_status(id, OrderStatus::Accepted, None)
    }

    /// The store starts preparing an order.
    ///
    /// # Errors
    ///
    /// Fails if the order is unknown or already preparing or beyond.
    pub fn store_prepare(&mut self, id: OrderId) -> Result<&Order, OrderError> {
        self.update_status(id, OrderStatus::Preparing, None)
    }

    /// A courier takes an order.
    ///
    /// Pending orders become accepted; accepted or preparing orders keep
    /// their status. Claiming again as the same courier is harmless.
    ///
    /// # Errors
    ///
    /// Fails if the order is unknown, already on its way, or claimed by a
    /// different courier.
    pub fn courier_claim(
        &mut self,
        id: OrderId,
        courier: DeliveryPerson,
    ) -> Result<&Order, OrderError> {
        let order = self.get_mut(id)?;
        match order.courier_id() {
            Some(existing) if existing != courier.id => {
                return Err(OrderError::AlreadyAssigned(id));
            }
            _ => {}
        }
        if order.status.rank() > OrderStatus::Preparing.rank() {
            return Err(OrderError::InvalidTransition {
                id,
                from: order.status,
                to: OrderStatus::Accepted,
            });
        }
        if order.status == OrderStatus::Pending {
            order.advance(OrderStatus::Accepted)?;
        }
        order.delivery_person = Some(courier);
        Ok(order)
    }

    /// The assigned courier picks the order up.
    ///
    /// # Errors
    ///
    /// Fails if the order is unknown, assigned to someone else, or already
    /// out for delivery.
    pub fn start_delivery(&mut self, id: OrderId, courier: UserId) -> Result<&Order, OrderError> {
        let order = self.get_mut(id)?;
        order.ensure_assignee(courier)?;
        order.advance(OrderStatus::OutForDelivery)?;
        Ok(order)
    }

    /// The assigned courier hands the order over.
    ///
    /// # Errors
    ///
    /// Fails if the order is unknown, assigned to someone else, or not out
    /// for delivery.
    pub fn complete_delivery(
        &mut self,
        id: OrderId,
        courier: UserId,
    ) -> Result<&Order, OrderError> {
        let order = self.get_mut(id)?;
        order.ensure_assignee(courier)?;
        if order.status != OrderStatus::OutForDelivery {
            return Err(OrderError::InvalidTransition {
                id,
                from: order.status,
                to: OrderStatus::Delivered,
            });
        }
        order.advance(OrderStatus::Delivered)?;
        Ok(order)
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// The order placed from the checkout form with `key`.
    #[must_use]
    pub fn by_checkout_key(&self, key: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.checkout_key.as_deref() == Some(key))
    }

    fn get_mut(&mut self, id: OrderId) -> Result<&mut Order, OrderError> {
        self.orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderError::NotFound(id))
    }

    #[must_use]
    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders a courier can still claim: pending or preparing, unassigned.
    pub fn available_for_couriers(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| {
            matches!(order.status, OrderStatus::Pending | OrderStatus::Preparing)
                && order.delivery_person.is_none()
        })
    }

    /// Orders claimed by `courier`, in any status.
    pub fn assigned_to(&self, courier: UserId) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(move |order| order.courier_id() == Some(courier))
    }

    /// Orders placed with `shop_id`, newest first.
    #[must_use]
    pub fn for_shop(&self, shop_id: ShopId) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .iter()
            .filter(|order| order.shop_id == shop_id)
            .collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        orders
    }

    /// Orders whose id is in `ids`, in the order of `ids`.
    #[must_use]
    pub fn by_ids(&self, ids: &[OrderId]) -> Vec<&Order> {
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }
}
