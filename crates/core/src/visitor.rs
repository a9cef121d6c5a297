//! Per-visitor state: who is signed in, where they are, what is in the cart.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::location::DEFAULT_LOCATION;
use crate::types::OrderId;
use crate::user::User;

/// Everything the app remembers about one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    #[serde(default)]
    user: Option<User>,
    location: String,
    #[serde(default)]
    cart: Cart,
    /// Orders placed from this session, oldest first.
    #[serde(default)]
    order_ids: Vec<OrderId>,
}

impl Default for Visitor {
    fn default() -> Self {
        Self {
            user: None,
            location: DEFAULT_LOCATION.to_string(),
            cart: Cart::new(),
            order_ids: Vec::new(),
        }
    }
}

impl Visitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub const fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Sign out. The cart and location are kept.
    pub fn clear_user(&mut self) -> Option<User> {
        self.user.take()
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether the visitor picked a location yet.
    #[must_use]
    pub fn has_location(&self) -> bool {
        self.location != DEFAULT_LOCATION
    }

    /// Set the delivery location. Blank input is ignored.
    pub fn set_location(&mut self, location: &str) -> bool {
        let location = location.trim();
        if location.is_empty() {
            return false;
        }
        self.location = location.to_string();
        true
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn record_order(&mut self, id: OrderId) {
        self.order_ids.push(id);
    }

    #[must_use]
    pub fn order_ids(&self) -> &[OrderId] {
        &self.order_ids
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::item;
    use crate::types::{Email, ShopId, UserId, UserKind};

    #[test]
    fn test_new_visitor_defaults() {
        let visitor = Visitor::new();
        assert_eq!(visitor.location(), "Set your location");
        assert!(!visitor.has_location());
        assert!(visitor.user().is_none());
        assert!(visitor.cart().is_empty());
    }

    #[test]
    fn test_set_location_ignores_blank() {
        let mut visitor = Visitor::new();
        assert!(!visitor.set_location("   "));
        assert!(visitor.set_location(" Business Bay, 5th Block, City "));
        assert_eq!(visitor.location(), "Business Bay, 5th Block, City");
        assert!(visitor.has_location());
    }

    #[test]
    fn test_logout_keeps_cart() {
        let mut visitor = Visitor::new();
        let email = Email::parse("store@example.com").unwrap();
        visitor.set_user(User::logged_in(UserId::new(1), UserKind::Store, email));
        visitor
            .cart_mut()
            .add(&item(101, "Fresh Apples", 120, "Fruits"), ShopId::new(1));

        let user = visitor.clear_user().unwrap();
        assert_eq!(user.name, "Store Owner");
        assert!(visitor.user().is_none());
        assert_eq!(visitor.cart().item_count(), 1);
    }

    #[test]
    fn test_session_round_trip() {
        let mut visitor = Visitor::new();
        visitor.set_location("University Campus, City");
        visitor.record_order(OrderId::new(42));

        let json = serde_json::to_value(&visitor).unwrap();
        let back: Visitor = serde_json::from_value(json).unwrap();
        assert_eq!(back, visitor);
        assert_eq!(back.order_ids(), &[OrderId::new(42)]);
    }
}
