//! Shopping cart with the single-shop policy.
//!
//! A cart only ever holds items from one shop. Adding an item from a
//! different shop throws the previous contents away.

use serde::{Deserialize, Serialize};

use crate::catalog::ShopItem;
use crate::types::{ItemId, Price, ShopId};

/// Most units of one item a cart line may hold.
pub const MAX_QUANTITY: u32 = 999;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub shop_id: ShopId,
}

impl CartItem {
    fn new(item: &ShopItem, shop_id: ShopId) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
            shop_id,
        }
    }

    /// Price of this line (unit price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added,
    /// An existing line's quantity went up by one.
    Incremented,
    /// The cart held another shop's items; they were discarded.
    ReplacedShop { previous: ShopId },
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The shop every line belongs to, if the cart has any lines.
    #[must_use]
    pub fn shop_id(&self) -> Option<ShopId> {
        self.items.first().map(|item| item.shop_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add one unit of `item` sold by `shop_id`.
    ///
    /// A line already at [`MAX_QUANTITY`] stays there.
    pub fn add(&mut self, item: &ShopItem, shop_id: ShopId) -> AddOutcome {
        if let Some(previous) = self.shop_id().filter(|current| *current != shop_id) {
            self.items = vec![CartItem::new(item, shop_id)];
            return AddOutcome::ReplacedShop { previous };
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
            line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY);
            return AddOutcome::Incremented;
        }

        self.items.push(CartItem::new(item, shop_id));
        AddOutcome::Added
    }

    /// Remove a line. Returns the removed line, if it existed.
    pub fn remove(&mut self, item_id: ItemId) -> Option<CartItem> {
        let index = self.items.iter().position(|line| line.id == item_id)?;
        Some(self.items.remove(index))
    }

    /// Set the quantity of a line. Zero or negative quantities remove it;
    /// anything above [`MAX_QUANTITY`] is capped.
    ///
    /// Unknown item ids are ignored.
    pub fn update_quantity(&mut self, item_id: ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove(item_id);
            return;
        }
        let quantity = u32::try_from(quantity).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY));

        if let Some(line) = self.items.iter_mut().find(|line| line.id == item_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Take every line out of the cart, leaving it empty.
    pub fn take_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::item;

    const SHOP_A: ShopId = ShopId::new(1);
    const SHOP_B: ShopId = ShopId::new(2);

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = Cart::new();
        let outcome = cart.add(&item(101, "Fresh Apples", 120, "Fruits"), SHOP_A);

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.shop_id(), Some(SHOP_A));
    }

    #[test]
    fn test_add_same_item_increments() {
        let mut cart = Cart::new();
        let apples = item(101, "Fresh Apples", 120, "Fruits");
        cart.add(&apples, SHOP_A);
        let outcome = cart.add(&apples, SHOP_A);

        assert_eq!(outcome, AddOutcome::Incremented);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_from_other_shop_replaces_cart() {
        let mut cart = Cart::new();
        cart.add(&item(101, "Fresh Apples", 120, "Fruits"), SHOP_A);
        cart.add(&item(103, "Milk", 55, "Dairy"), SHOP_A);

        let outcome = cart.add(&item(201, "Paracetamol", 30, "Medicines"), SHOP_B);

        assert_eq!(outcome, AddOutcome::ReplacedShop { previous: SHOP_A });
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id, ItemId::new(201));
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.shop_id(), Some(SHOP_B));
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add(&item(101, "Fresh Apples", 120, "Fruits"), SHOP_A);
        cart.update_quantity(ItemId::new(101), 4);
        assert_eq!(cart.items()[0].quantity, 4);

        // unknown ids leave the cart alone
        cart.update_quantity(ItemId::new(999), 2);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = Cart::new();
        cart.add(&item(101, "Fresh Apples", 120, "Fruits"), SHOP_A);
        cart.add(&item(102, "Organic Bananas", 60, "Fruits"), SHOP_A);

        cart.update_quantity(ItemId::new(101), 0);
        assert_eq!(cart.items().len(), 1);

        cart.update_quantity(ItemId::new(102), -3);
        assert!(cart.is_empty());
        assert_eq!(cart.shop_id(), None);
    }

    #[test]
    fn test_quantity_is_capped() {
        let mut cart = Cart::new();
        let apples = item(101, "Fresh Apples", 120, "Fruits");
        cart.add(&apples, SHOP_A);

        cart.update_quantity(ItemId::new(101), 99_999_999_999);
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);

        let outcome = cart.add(&apples, SHOP_A);
        assert_eq!(outcome, AddOutcome::Incremented);
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);
        assert_eq!(cart.item_count(), MAX_QUANTITY);

        cart.update_quantity(ItemId::new(101), i64::from(MAX_QUANTITY) + 1);
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_subtotal_and_remove() {
        let mut cart = Cart::new();
        let apples = item(101, "Fresh Apples", 120, "Fruits");
        cart.add(&apples, SHOP_A);
        cart.add(&apples, SHOP_A);
        cart.add(&item(103, "Milk", 55, "Dairy"), SHOP_A);

        assert_eq!(cart.subtotal(), Price::rupees(295));

        let removed = cart.remove(ItemId::new(101)).unwrap();
        assert_eq!(removed.quantity, 2);
        assert_eq!(cart.subtotal(), Price::rupees(55));
        assert!(cart.remove(ItemId::new(101)).is_none());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }
}
