//! Expense Handler

use crate::domain::{Expense, OperationContext};
use crate::error::{AppError, AppResult};
use crate::store::DynStore;

use super::commands::CreateExpenseCommand;

/// Handler for operating expenses
#[derive(Clone)]
pub struct ExpenseHandler {
    store: DynStore,
}

impl ExpenseHandler {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Expense>> {
        self.store
            .list_expenses()
            .await
            .map_err(AppError::store("Error retrieving expenses"))
    }

    pub async fn create(
        &self,
        command: CreateExpenseCommand,
        context: &OperationContext,
    ) -> AppResult<Expense> {
        let new_expense = command.validate()?;

        let expense = self
            .store
            .create_expense(new_expense)
            .await
            .map_err(AppError::store("Error creating expense"))?;

        tracing::info!(
            expense_id = %expense.expense_id,
            category = %expense.category,
            amount = %expense.amount,
            correlation_id = ?context.correlation_id,
            "Expense recorded"
        );

        Ok(expense)
    }
}
