//! Sneaker inventory backend
//!
//! Re-exports modules for the server binary, integration testing and
//! external use.

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod form;
pub mod handlers;
pub mod store;

mod error;

pub use api::AppState;
pub use app::{build_router, cors_layer};
pub use config::{Config, ConfigError, LogFormat, StorageBackend};
pub use domain::{
    Customer, DashboardMetrics, DomainError, Expense, OperationContext, Product, Purchase, Sale,
    Stock,
};
pub use error::{AppError, AppResult, ErrorKind, ErrorResponse};
pub use store::{DynStore, InventoryStore, MemoryStore, PgStore, StoreError};
