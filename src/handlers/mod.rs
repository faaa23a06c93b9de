//! Request Handlers module
//!
//! One handler per resource. Each operation validates its command and
//! performs a single data-access call through the store.

mod commands;
mod customer_handler;
mod dashboard_handler;
mod expense_handler;
mod product_handler;
mod sale_handler;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use customer_handler::CustomerHandler;
pub use dashboard_handler::DashboardHandler;
pub use expense_handler::ExpenseHandler;
pub use product_handler::ProductHandler;
pub use sale_handler::{PurchaseHandler, SaleHandler};
