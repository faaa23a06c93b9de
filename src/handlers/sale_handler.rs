//! Sale and Purchase Handlers
//!
//! Recording a sale or purchase never adjusts stock quantities; stock is
//! maintained through the product stock endpoints.

use crate::domain::{OperationContext, Purchase, Sale};
use crate::error::{AppError, AppResult};
use crate::store::DynStore;

use super::commands::{CreatePurchaseCommand, CreateSaleCommand};

/// Handler for sales
#[derive(Clone)]
pub struct SaleHandler {
    store: DynStore,
}

impl SaleHandler {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Sale>> {
        self.store
            .list_sales()
            .await
            .map_err(AppError::store("Error retrieving sales"))
    }

    pub async fn create(
        &self,
        command: CreateSaleCommand,
        context: &OperationContext,
    ) -> AppResult<Sale> {
        let new_sale = command.validate()?;

        let sale = self
            .store
            .create_sale(new_sale)
            .await
            .map_err(AppError::store("Error creating sale"))?;

        tracing::info!(
            sale_id = %sale.sale_id,
            stock_id = %sale.stock_id,
            user_id = %sale.user_id,
            quantity = sale.quantity,
            correlation_id = ?context.correlation_id,
            "Sale recorded"
        );

        Ok(sale)
    }
}

/// Handler for restock purchases
#[derive(Clone)]
pub struct PurchaseHandler {
    store: DynStore,
}

impl PurchaseHandler {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Purchase>> {
        self.store
            .list_purchases()
            .await
            .map_err(AppError::store("Error retrieving purchases"))
    }

    pub async fn create(
        &self,
        command: CreatePurchaseCommand,
        context: &OperationContext,
    ) -> AppResult<Purchase> {
        let new_purchase = command.validate()?;

        let purchase = self
            .store
            .create_purchase(new_purchase)
            .await
            .map_err(AppError::store("Error creating purchase"))?;

        tracing::info!(
            purchase_id = %purchase.purchase_id,
            stock_id = %purchase.stock_id,
            total_cost = %purchase.total_cost,
            correlation_id = ?context.correlation_id,
            "Purchase recorded"
        );

        Ok(purchase)
    }
}
