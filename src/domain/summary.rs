//! Dashboard summary records
//!
//! Produced by an external aggregation job; read-only here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of most recent rows of each summary shown on the dashboard
pub const DASHBOARD_SUMMARY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub sale_summary_id: String,
    pub total_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percentage: Option<Decimal>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    pub purchase_summary_id: String,
    pub total_purchased: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percentage: Option<Decimal>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub expense_summary_id: String,
    pub total_expenses: Decimal,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseByCategorySummary {
    pub expense_by_category_summary_id: String,
    pub category: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

/// Everything the dashboard renders in one response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub sale_summary: Vec<SaleSummary>,
    pub purchase_summary: Vec<PurchaseSummary>,
    pub expense_summary: Vec<ExpenseSummary>,
    pub expense_by_category_summary: Vec<ExpenseByCategorySummary>,
}

/// Keep the `limit` newest records, newest first
pub fn latest<T, F>(mut records: Vec<T>, limit: usize, date: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    records.sort_by(|a, b| date(b).cmp(&date(a)));
    records.truncate(limit);
    records
}
