//! Customer Handler

use crate::domain::{Customer, OperationContext};
use crate::error::{AppError, AppResult};
use crate::store::DynStore;

use super::commands::{CreateCustomerCommand, UpdateCustomerCommand};

/// Handler for customer records
#[derive(Clone)]
pub struct CustomerHandler {
    store: DynStore,
}

impl CustomerHandler {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        self.store
            .list_customers()
            .await
            .map_err(AppError::store("Error retrieving customers"))
    }

    pub async fn get(&self, user_id: &str) -> AppResult<Customer> {
        self.store
            .get_customer(user_id)
            .await
            .map_err(AppError::store("Error retrieving customer"))
    }

    pub async fn create(
        &self,
        command: CreateCustomerCommand,
        context: &OperationContext,
    ) -> AppResult<Customer> {
        let new_customer = command.validate()?;

        let customer = self
            .store
            .create_customer(new_customer)
            .await
            .map_err(AppError::store("Error creating customer"))?;

        tracing::info!(
            user_id = %customer.user_id,
            correlation_id = ?context.correlation_id,
            "Customer created"
        );

        Ok(customer)
    }

    pub async fn update(
        &self,
        user_id: &str,
        command: UpdateCustomerCommand,
        context: &OperationContext,
    ) -> AppResult<Customer> {
        let changes = command.validate()?;
        if changes.is_empty() {
            return self.get(user_id).await;
        }

        let customer = self
            .store
            .update_customer(user_id, changes)
            .await
            .map_err(AppError::store("Error updating customer"))?;

        tracing::info!(
            user_id = %user_id,
            correlation_id = ?context.correlation_id,
            "Customer updated"
        );

        Ok(customer)
    }

    pub async fn delete(&self, user_id: &str, context: &OperationContext) -> AppResult<()> {
        self.store
            .delete_customer(user_id)
            .await
            .map_err(AppError::store("Error deleting customer"))?;

        tracing::info!(
            user_id = %user_id,
            correlation_id = ?context.correlation_id,
            "Customer deleted"
        );

        Ok(())
    }
}
