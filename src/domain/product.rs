//! Products and their stock lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Price, Quantity, Size};

/// A sneaker model with its per-size stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub stock: Vec<Stock>,
}

impl Product {
    /// Units on hand across all stock lines
    pub fn units_on_hand(&self) -> i64 {
        self.stock.iter().map(|s| i64::from(s.quantity)).sum()
    }

    /// Case-insensitive substring match on the name
    pub fn name_matches(&self, search: &str) -> bool {
        self.name.to_lowercase().contains(&search.to_lowercase())
    }
}

/// One size/price line of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub stock_id: String,
    pub product_id: String,
    pub size: Decimal,
    pub quantity: i32,
    pub price: Decimal,
}

/// Validated product ready for insertion
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_id: String,
    pub name: String,
    pub price: Option<Price>,
    pub rating: Option<Decimal>,
    pub stock_quantity: Option<Quantity>,
    pub stock: Vec<NewStock>,
}

/// Validated stock line ready for insertion or upsert
#[derive(Debug, Clone)]
pub struct NewStock {
    pub stock_id: String,
    pub size: Size,
    pub quantity: Quantity,
    pub price: Price,
}

impl NewStock {
    /// Materialize as a stock record owned by `product_id`
    pub fn into_stock(self, product_id: &str) -> Stock {
        Stock {
            stock_id: self.stock_id,
            product_id: product_id.to_string(),
            size: self.size.value(),
            quantity: self.quantity.value(),
            price: self.price.value(),
        }
    }
}

impl NewProduct {
    /// Materialize as a product record
    pub fn into_product(self) -> Product {
        let product_id = self.product_id;
        let stock = self
            .stock
            .into_iter()
            .map(|line| line.into_stock(&product_id))
            .collect();
        Product {
            product_id,
            name: self.name,
            price: self.price.map(|p| p.value()),
            rating: self.rating,
            stock_quantity: self.stock_quantity.map(|q| q.value()),
            stock,
        }
    }
}

/// Validated partial update of a product's own fields
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub rating: Option<Decimal>,
    pub stock_quantity: Option<Quantity>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.rating.is_none()
            && self.stock_quantity.is_none()
    }

    /// Apply onto an existing record
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = Some(price.value());
        }
        if let Some(rating) = self.rating {
            product.rating = Some(rating);
        }
        if let Some(quantity) = self.stock_quantity {
            product.stock_quantity = Some(quantity.value());
        }
    }
}
