//! Operating expenses

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Price;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub expense_id: String,
    pub category: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Validated expense ready for insertion
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub expense_id: String,
    pub category: String,
    pub amount: Price,
    pub timestamp: DateTime<Utc>,
}

impl NewExpense {
    pub fn into_expense(self) -> Expense {
        Expense {
            expense_id: self.expense_id,
            category: self.category,
            amount: self.amount.value(),
            timestamp: self.timestamp,
        }
    }
}
