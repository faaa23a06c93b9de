//! Data-access layer
//!
//! Handlers reach persistence only through [`InventoryStore`]. The
//! PostgreSQL implementation is the production backend; the memory
//! implementation backs local runs and the test suite.

mod error;
mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Customer, CustomerChanges, DashboardMetrics, Expense, NewCustomer, NewExpense, NewProduct,
    NewPurchase, NewSale, NewStock, Product, ProductChanges, Purchase, Sale,
};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle used by the HTTP layer
pub type DynStore = Arc<dyn InventoryStore>;

/// Persistence contract for every resource the API exposes.
///
/// Each method is a single logical operation; multi-row writes inside one
/// call are atomic.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // Products

    /// Products whose name contains `search` (case-insensitive), ordered by
    /// lowercased name then id
    async fn list_products(&self, search: Option<&str>) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, product_id: &str) -> StoreResult<Product>;

    /// Insert a product together with its stock lines
    async fn create_product(&self, product: NewProduct) -> StoreResult<Product>;

    async fn update_product(
        &self,
        product_id: &str,
        changes: ProductChanges,
    ) -> StoreResult<Product>;

    /// Remove a product and its stock lines
    async fn delete_product(&self, product_id: &str) -> StoreResult<()>;

    /// Insert or update stock lines of a product, matched by `stock_id`
    async fn upsert_stock(&self, product_id: &str, lines: Vec<NewStock>) -> StoreResult<Product>;

    async fn delete_stock(&self, product_id: &str, stock_id: &str) -> StoreResult<Product>;

    // Customers

    /// Ordered by lowercased name then id
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    async fn get_customer(&self, user_id: &str) -> StoreResult<Customer>;

    async fn create_customer(&self, customer: NewCustomer) -> StoreResult<Customer>;

    async fn update_customer(
        &self,
        user_id: &str,
        changes: CustomerChanges,
    ) -> StoreResult<Customer>;

    async fn delete_customer(&self, user_id: &str) -> StoreResult<()>;

    // Sales & purchases

    /// Newest first
    async fn list_sales(&self) -> StoreResult<Vec<Sale>>;

    async fn create_sale(&self, sale: NewSale) -> StoreResult<Sale>;

    /// Newest first
    async fn list_purchases(&self) -> StoreResult<Vec<Purchase>>;

    async fn create_purchase(&self, purchase: NewPurchase) -> StoreResult<Purchase>;

    // Expenses

    /// Newest first
    async fn list_expenses(&self) -> StoreResult<Vec<Expense>>;

    async fn create_expense(&self, expense: NewExpense) -> StoreResult<Expense>;

    // Dashboard

    /// Most recent summary rows of each kind
    async fn dashboard_metrics(&self) -> StoreResult<DashboardMetrics>;
}
