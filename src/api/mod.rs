//! API module
//!
//! HTTP endpoints, extractors and middleware.

pub mod extract;
pub mod middleware;
pub mod routes;

use crate::handlers::{
    CustomerHandler, DashboardHandler, ExpenseHandler, ProductHandler, PurchaseHandler,
    SaleHandler,
};
use crate::store::DynStore;

pub use routes::create_router;

/// State shared by every route
#[derive(Clone)]
pub struct AppState {
    store: DynStore,
}

impl AppState {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub fn products(&self) -> ProductHandler {
        ProductHandler::new(self.store.clone())
    }

    pub fn customers(&self) -> CustomerHandler {
        CustomerHandler::new(self.store.clone())
    }

    pub fn sales(&self) -> SaleHandler {
        SaleHandler::new(self.store.clone())
    }

    pub fn purchases(&self) -> PurchaseHandler {
        PurchaseHandler::new(self.store.clone())
    }

    pub fn expenses(&self) -> ExpenseHandler {
        ExpenseHandler::new(self.store.clone())
    }

    pub fn dashboard(&self) -> DashboardHandler {
        DashboardHandler::new(self.store.clone())
    }
}
