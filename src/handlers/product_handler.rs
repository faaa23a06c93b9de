//! Product Handler
//!
//! Validates product commands and performs one store operation each.

use crate::domain::{OperationContext, Product};
use crate::error::{AppError, AppResult};
use crate::store::DynStore;

use super::commands::{CreateProductCommand, UpdateProductCommand, UpdateStockCommand};

/// Handler for products and their stock lines
#[derive(Clone)]
pub struct ProductHandler {
    store: DynStore,
}

impl ProductHandler {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// List products, optionally filtered by a name fragment
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Product>> {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        self.store
            .list_products(search)
            .await
            .map_err(AppError::store("Error retrieving products"))
    }

    pub async fn get(&self, product_id: &str) -> AppResult<Product> {
        self.store
            .get_product(product_id)
            .await
            .map_err(AppError::store("Error retrieving product"))
    }

    pub async fn create(
        &self,
        command: CreateProductCommand,
        context: &OperationContext,
    ) -> AppResult<Product> {
        let new_product = command.validate()?;

        let product = self
            .store
            .create_product(new_product)
            .await
            .map_err(AppError::store("Error creating product"))?;

        tracing::info!(
            product_id = %product.product_id,
            stock_lines = product.stock.len(),
            correlation_id = ?context.correlation_id,
            "Product created"
        );

        Ok(product)
    }

    pub async fn update(
        &self,
        product_id: &str,
        command: UpdateProductCommand,
        context: &OperationContext,
    ) -> AppResult<Product> {
        let changes = command.validate()?;
        if changes.is_empty() {
            return self.get(product_id).await;
        }

        let product = self
            .store
            .update_product(product_id, changes)
            .await
            .map_err(AppError::store("Error updating product"))?;

        tracing::info!(
            product_id = %product_id,
            correlation_id = ?context.correlation_id,
            "Product updated"
        );

        Ok(product)
    }

    pub async fn delete(&self, product_id: &str, context: &OperationContext) -> AppResult<()> {
        self.store
            .delete_product(product_id)
            .await
            .map_err(AppError::store("Error deleting product"))?;

        tracing::info!(
            product_id = %product_id,
            correlation_id = ?context.correlation_id,
            "Product deleted"
        );

        Ok(())
    }

    /// Insert or update stock lines
    pub async fn update_stock(
        &self,
        product_id: &str,
        command: UpdateStockCommand,
        context: &OperationContext,
    ) -> AppResult<Product> {
        let lines = command.validate()?;
        let count = lines.len();

        let product = self
            .store
            .upsert_stock(product_id, lines)
            .await
            .map_err(AppError::store("Error updating product stock"))?;

        tracing::info!(
            product_id = %product_id,
            lines = count,
            correlation_id = ?context.correlation_id,
            "Product stock updated"
        );

        Ok(product)
    }

    pub async fn delete_stock(
        &self,
        product_id: &str,
        stock_id: &str,
        context: &OperationContext,
    ) -> AppResult<Product> {
        let product = self
            .store
            .delete_stock(product_id, stock_id)
            .await
            .map_err(AppError::store("Error deleting product stock"))?;

        tracing::info!(
            product_id = %product_id,
            stock_id = %stock_id,
            correlation_id = ?context.correlation_id,
            "Stock line deleted"
        );

        Ok(product)
    }
}
