//! Shops and the items they sell.
//!
//! The catalog is sample content: it is deserialized once at startup and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Price, ShopId};

/// Category filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// An item a shop sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A neighbourhood shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub rating: f32,
    /// Free-form estimate, e.g. "25-30 min".
    pub delivery_time: String,
    /// Free-form distance, e.g. "1.2 km".
    pub distance: String,
    #[serde(default)]
    pub items: Vec<ShopItem>,
}

impl Shop {
    /// Look up one of this shop's items.
    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Unique item categories, in the order they first appear.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for item in &self.items {
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }
        categories
    }

    /// Items matching a search query and a category.
    ///
    /// The query matches item name or description, case-insensitively. A
    /// blank query or the [`ALL_CATEGORIES`] category disables that filter.
    #[must_use]
    pub fn filter_items(&self, query: &str, category: &str) -> Vec<&ShopItem> {
        self.items
            .iter()
            .filter(|item| matches_any(query, [&item.name, &item.description]))
            .filter(|item| category == ALL_CATEGORIES || item.category == category)
            .collect()
    }
}

/// All shops known to the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    shops: Vec<Shop>,
}

impl Catalog {
    #[must_use]
    pub const fn new(shops: Vec<Shop>) -> Self {
        Self { shops }
    }

    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    #[must_use]
    pub fn shop(&self, id: ShopId) -> Option<&Shop> {
        self.shops.iter().find(|shop| shop.id == id)
    }

    /// Look up an item by shop and item id.
    #[must_use]
    pub fn item(&self, shop_id: ShopId, item_id: ItemId) -> Option<&ShopItem> {
        self.shop(shop_id)?.item(item_id)
    }

    /// Shops whose name or description contains `query` (case-insensitive).
    #[must_use]
    pub fn search_shops(&self, query: &str) -> Vec<&Shop> {
        self.shops
            .iter()
            .filter(|shop| matches_any(query, [&shop.name, &shop.description]))
            .collect()
    }
}

/// Case-insensitive substring match against any of `fields`.
///
/// A blank query matches everything.
pub(crate) fn matches_any<'a>(query: &str, fields: impl IntoIterator<Item = &'a String>) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
        || fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(id: i32, name: &str, price: i64, category: &str) -> ShopItem {
        ShopItem {
            id: ItemId::new(id),
            name: name.to_string(),
            price: Price::rupees(price),
            description: format!("{name}, fresh today"),
            category: category.to_string(),
            image_url: None,
        }
    }

    pub fn shop(id: i32, name: &str, items: Vec<ShopItem>) -> Shop {
        Shop {
            id: ShopId::new(id),
            name: name.to_string(),
            description: format!("{name} in your neighbourhood"),
            image_url: String::new(),
            rating: 4.5,
            delivery_time: "20-25 min".to_string(),
            distance: "1.0 km".to_string(),
            items,
        }
    }

    pub fn catalog() -> Catalog {
        Catalog::new(vec![
            shop(
                1,
                "Fresh Grocery Store",
                vec![
                    item(101, "Fresh Apples", 120, "Fruits"),
                    item(102, "Organic Bananas", 60, "Fruits"),
                    item(103, "Milk", 55, "Dairy"),
                ],
            ),
            shop(
                2,
                "MediQuick Pharmacy",
                vec![
                    item(201, "Paracetamol", 30, "Medicines"),
                    item(202, "Hand Sanitizer", 75, "Hygiene"),
                ],
            ),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    #[test]
    fn test_lookup_item_by_shop() {
        let catalog = catalog();
        let item = catalog.item(ShopId::new(1), ItemId::new(103)).unwrap();
        assert_eq!(item.name, "Milk");
        assert!(catalog.item(ShopId::new(2), ItemId::new(103)).is_none());
        assert!(catalog.shop(ShopId::new(9)).is_none());
    }

    #[test]
    fn test_search_shops_case_insensitive() {
        let catalog = catalog();
        let hits = catalog.search_shops("PHARM");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ShopId::new(2));
        assert_eq!(catalog.search_shops("  ").len(), 2);
        assert!(catalog.search_shops("bakery").is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = catalog();
        let shop = catalog.shop(ShopId::new(1)).unwrap();
        assert_eq!(shop.categories(), vec!["Fruits", "Dairy"]);
    }

    #[test]
    fn test_filter_items_by_query_and_category() {
        let catalog = catalog();
        let shop = catalog.shop(ShopId::new(1)).unwrap();

        assert_eq!(shop.filter_items("", ALL_CATEGORIES).len(), 3);
        assert_eq!(shop.filter_items("", "Fruits").len(), 2);

        let names: Vec<_> = shop
            .filter_items("banana", "Fruits")
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["Organic Bananas"]);

        // description matches too
        assert_eq!(shop.filter_items("fresh today", "Dairy").len(), 1);
        assert!(shop.filter_items("banana", "Dairy").is_empty());
    }

    #[test]
    fn test_catalog_deserializes_string_prices() {
        let json = r#"{"shops":[{"id":3,"name":"Sweet Delight Bakery",
            "description":"Fresh baked goods","image_url":"x","rating":4.8,
            "delivery_time":"30-40 min","distance":"2.0 km",
            "items":[{"id":301,"name":"Chocolate Cake","price":"350",
            "description":"Rich chocolate cake","category":"Cakes"}]}]}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let item = catalog.item(ShopId::new(3), ItemId::new(301)).unwrap();
        assert_eq!(item.price, Price::rupees(350));
        assert_eq!(item.image_url, None);
    }
}
