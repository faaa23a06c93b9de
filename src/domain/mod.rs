//! Domain module
//!
//! Records, validated inputs and value types.

pub mod context;
pub mod customer;
pub mod error;
pub mod expense;
pub mod id;
pub mod money;
pub mod product;
pub mod sale;
pub mod summary;

pub use context::OperationContext;
pub use customer::{Customer, CustomerChanges, NewCustomer};
pub use error::DomainError;
pub use expense::{Expense, NewExpense};
pub use money::{Price, Quantity, Size};
pub use product::{NewProduct, NewStock, Product, ProductChanges, Stock};
pub use sale::{NewPurchase, NewSale, Purchase, Sale};
pub use summary::{
    DashboardMetrics, ExpenseByCategorySummary, ExpenseSummary, PurchaseSummary, SaleSummary,
};
