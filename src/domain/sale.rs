//! Sales and purchases
//!
//! Both reference a stock line; sales also reference the buying customer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Price, Quantity};

/// A recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub sale_id: String,
    pub stock_id: String,
    pub user_id: String,
    pub quantity: i32,
    pub sales_price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Validated sale ready for insertion
#[derive(Debug, Clone)]
pub struct NewSale {
    pub sale_id: String,
    pub stock_id: String,
    pub user_id: String,
    pub quantity: Quantity,
    pub sales_price: Price,
    pub timestamp: DateTime<Utc>,
}

impl NewSale {
    pub fn into_sale(self) -> Sale {
        Sale {
            sale_id: self.sale_id,
            stock_id: self.stock_id,
            user_id: self.user_id,
            quantity: self.quantity.value(),
            sales_price: self.sales_price.value(),
            timestamp: self.timestamp,
        }
    }
}

/// A restock purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub purchase_id: String,
    pub stock_id: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Validated purchase ready for insertion
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub purchase_id: String,
    pub stock_id: String,
    pub quantity: Quantity,
    pub unit_cost: Price,
    pub timestamp: DateTime<Utc>,
}

impl NewPurchase {
    pub fn total_cost(&self) -> Decimal {
        self.unit_cost.times(self.quantity)
    }

    pub fn into_purchase(self) -> Purchase {
        let total_cost = self.total_cost();
        Purchase {
            purchase_id: self.purchase_id,
            stock_id: self.stock_id,
            quantity: self.quantity.value(),
            unit_cost: self.unit_cost.value(),
            total_cost,
            timestamp: self.timestamp,
        }
    }
}
