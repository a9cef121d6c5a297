//! The store owner's product table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::matches_any;
use crate::types::{Price, ProductId};
use crate::user::ValidationErrors;

/// Errors from inventory operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// A product listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub in_stock: bool,
}

/// The "add product" form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProductForm {
    pub name: String,
    pub price: String,
    pub category: String,
    /// Checkbox: present means in stock.
    #[serde(default)]
    pub in_stock: Option<String>,
}

/// A validated new product, before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub category: String,
    pub in_stock: bool,
}

impl NewProductForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every failing field: blank name, blank category, or a price
    /// that does not parse or is not above zero.
    pub fn validate(&self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = self.name.trim();
        let category = self.category.trim();

        if name.is_empty() {
            errors.add("name", "Product name is required");
        }
        if category.is_empty() {
            errors.add("category", "Category is required");
        }
        let price = self.price.trim().parse::<Price>().ok().filter(Price::is_positive);
        if price.is_none() {
            errors.add("price", "Price must be greater than zero");
        }

        match price {
            Some(price) if errors.is_empty() => Ok(NewProduct {
                name: name.to_string(),
                price,
                category: category.to_string(),
                in_stock: self.in_stock.is_some(),
            }),
            _ => Err(errors),
        }
    }
}

/// All products of the demo store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    products: Vec<Product>,
}

impl Inventory {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The products the demo store starts with.
    #[must_use]
    pub fn sample() -> Self {
        let product = |id, name: &str, paise, category: &str, in_stock| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_paise(paise),
            category: category.to_string(),
            in_stock,
        };
        Self::new(vec![
            product(1, "Premium Coffee", 1299, "Beverages", true),
            product(2, "Organic Tea", 899, "Beverages", true),
            product(3, "Fresh Bread", 499, "Bakery", false),
        ])
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products whose name or category contains `query`, case-insensitively.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| matches_any(query, [&product.name, &product.category]))
            .collect()
    }

    /// Flip a product between in stock and out of stock.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] for unknown ids.
    pub fn toggle_stock(&mut self, id: ProductId) -> Result<&Product, InventoryError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(InventoryError::NotFound(id))?;
        product.in_stock = !product.in_stock;
        Ok(product)
    }

    /// Validate and append a product. Its id is one above the current maximum.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Invalid`] when the form does not validate.
    pub fn add(&mut self, form: &NewProductForm) -> Result<&Product, InventoryError> {
        let new = form.validate()?;
        let id = self
            .products
            .iter()
            .map(|product| product.id.as_i32())
            .max()
            .unwrap_or(0)
            + 1;
        let id = ProductId::new(id);
        self.products.push(Product {
            id,
            name: new.name,
            price: new.price,
            category: new.category,
            in_stock: new.in_stock,
        });
        self.products.last().ok_or(InventoryError::NotFound(id))
    }

    /// Remove every product in `ids`. Returns how many were removed.
    pub fn delete(&mut self, ids: &BTreeSet<ProductId>) -> usize {
        let before = self.products.len();
        self.products.retain(|product| !ids.contains(&product.id));
        before - self.products.len()
    }

    #[must_use]
    pub fn in_stock_count(&self) -> usize {
        self.products.iter().filter(|product| product.in_stock).count()
    }

    #[must_use]
    pub fn out_of_stock_count(&self) -> usize {
        self.products.len() - self.in_stock_count()
    }
}

/// Products ticked in the manage view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: BTreeSet<ProductId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn ids(&self) -> &BTreeSet<ProductId> {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn toggle(&mut self, id: ProductId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select every visible product, or clear the selection if all of them
    /// are already selected.
    pub fn toggle_all(&mut self, visible: &[&Product]) {
        let all_selected =
            !visible.is_empty() && visible.iter().all(|product| self.ids.contains(&product.id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|product| product.id).collect();
        }
    }
}

impl FromIterator<ProductId> for Selection {
    fn from_iter<T: IntoIterator<Item = ProductId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, category: &str) -> NewProductForm {
        NewProductForm {
            name: name.to_string(),
            price: price.to_string(),
            category: category.to_string(),
            in_stock: Some("on".to_string()),
        }
    }

    #[test]
    fn test_sample_counts() {
        let inventory = Inventory::sample();
        assert_eq!(inventory.products().len(), 3);
        assert_eq!(inventory.in_stock_count(), 2);
        assert_eq!(inventory.out_of_stock_count(), 1);
        assert_eq!(inventory.products()[0].price.to_string(), "₹12.99");
    }

    #[test]
    fn test_search_name_or_category() {
        let inventory = Inventory::sample();
        assert_eq!(inventory.search("beverages").len(), 2);
        assert_eq!(inventory.search("BREAD").len(), 1);
        assert_eq!(inventory.search("").len(), 3);
        assert!(inventory.search("cheese").is_empty());
    }

    #[test]
    fn test_toggle_stock() {
        let mut inventory = Inventory::sample();
        let product = inventory.toggle_stock(ProductId::new(3)).unwrap();
        assert!(product.in_stock);
        assert_eq!(inventory.in_stock_count(), 3);
        assert_eq!(
            inventory.toggle_stock(ProductId::new(99)).unwrap_err(),
            InventoryError::NotFound(ProductId::new(99))
        );
    }

    #[test]
    fn test_add_assigns_next_id() {
        let mut inventory = Inventory::sample();
        inventory.delete(&[ProductId::new(2)].into_iter().collect());

        let product = inventory.add(&form(" Green Tea ", "6.50", "Beverages")).unwrap();
        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.name, "Green Tea");
        assert!(product.in_stock);
    }

    #[test]
    fn test_add_rejects_invalid() {
        let mut inventory = Inventory::sample();
        let err = inventory.add(&form("", "0", " ")).unwrap_err();
        let InventoryError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.errors().len(), 3);
        assert!(errors.message_for("price").is_some());

        assert!(inventory.add(&form("Jam", "abc", "Spreads")).is_err());
        assert!(inventory.add(&form("Jam", "-2", "Spreads")).is_err());
        assert_eq!(inventory.products().len(), 3);
    }

    #[test]
    fn test_delete_selected() {
        let mut inventory = Inventory::sample();
        let selection: Selection = [ProductId::new(1), ProductId::new(3), ProductId::new(7)]
            .into_iter()
            .collect();
        assert_eq!(inventory.delete(selection.ids()), 2);
        assert_eq!(inventory.products().len(), 1);
        assert_eq!(inventory.products()[0].name, "Organic Tea");
    }

    #[test]
    fn test_selection_toggle_all_over_visible() {
        let inventory = Inventory::sample();
        let visible = inventory.search("beverages");
        let mut selection = Selection::new();

        selection.toggle(ProductId::new(1));
        selection.toggle_all(&visible);
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(ProductId::new(3)));

        selection.toggle_all(&visible);
        assert!(selection.is_empty());

        selection.toggle(ProductId::new(3));
        selection.toggle(ProductId::new(3));
        assert!(selection.is_empty());
    }
}
