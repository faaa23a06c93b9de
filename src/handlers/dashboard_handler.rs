//! Dashboard Handler

use crate::domain::DashboardMetrics;
use crate::error::{AppError, AppResult};
use crate::store::DynStore;

/// Read-only handler for dashboard summaries
#[derive(Clone)]
pub struct DashboardHandler {
    store: DynStore,
}

impl DashboardHandler {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn metrics(&self) -> AppResult<DashboardMetrics> {
        self.store
            .dashboard_metrics()
            .await
            .map_err(AppError::store("Error retrieving dashboard metrics"))
    }
}
