//! Catalog aggregates: products, categories and orders.
//!
//! # Invariants
//! - `Product.category` is a raw integer and is not resolved to a `Category`.
//! - Nested products in `Category`/`Order` must be persisted before the
//!   owning aggregate is added to a repository.

use super::{EntityId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    /// Raw category key as supplied by the caller.
    pub category: i64,
}

impl Product {
    pub fn new(name: impl Into<String>, quantity: u32, price: f64, category: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            quantity,
            price,
            category,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// Named grouping of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub products: Vec<Product>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            description: description.into(),
            products: Vec::new(),
        }
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// An order is only its identity plus the products it references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub products: Vec<Product>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            products,
        }
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Order, Product};
    use crate::model::UNASSIGNED_ID;

    #[test]
    fn constructors_start_unassigned() {
        let product = Product::new("Widget", 10, 9.99, 1);
        assert_eq!(product.id, UNASSIGNED_ID);
        assert!(!product.is_persisted());
        assert!(!Category::new("tools", "hand tools").is_persisted());
        assert!(!Order::new().is_persisted());
    }

    #[test]
    fn add_product_keeps_insertion_order() {
        let mut order = Order::new();
        order.add_product(Product::new("a", 1, 1.0, 1));
        order.add_product(Product::new("b", 2, 2.0, 1));
        let names: Vec<_> = order.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn product_serializes_with_plain_field_names() {
        let product = Product {
            id: 3,
            ..Product::new("Widget", 10, 9.99, 1)
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Widget");
        assert_eq!(json["quantity"], 10);
        assert_eq!(json["price"], 9.99);
        assert_eq!(json["category"], 1);
    }
}
