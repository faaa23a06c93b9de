//! Product draft
//!
//! Editable state of the "add product" form before submission.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::id::new_id;
use crate::handlers::{CreateProductCommand, StockLineInput};

use super::error::DraftError;

/// Editable field of a stock line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockField {
    Size,
    Quantity,
    Price,
}

impl StockField {
    pub fn name(&self) -> &'static str {
        match self {
            StockField::Size => "size",
            StockField::Quantity => "quantity",
            StockField::Price => "price",
        }
    }
}

/// One stock line being edited
#[derive(Debug, Clone, PartialEq)]
pub struct StockLineDraft {
    pub stock_id: String,
    pub size: Decimal,
    pub quantity: i32,
    pub price: Decimal,
}

impl StockLineDraft {
    /// Zeroed line with a fresh identifier
    pub fn blank() -> Self {
        Self {
            stock_id: new_id(),
            size: Decimal::ZERO,
            quantity: 0,
            price: Decimal::ZERO,
        }
    }
}

/// The form's draft product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub product_id: String,
    pub name: String,
    pub stock: Vec<StockLineDraft>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::blank()
    }
}

impl ProductDraft {
    /// Empty name and a single zeroed line, all with fresh identifiers
    pub fn blank() -> Self {
        Self {
            product_id: new_id(),
            name: String::new(),
            stock: vec![StockLineDraft::blank()],
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set one field of a line from user text.
    ///
    /// Input that does not parse leaves the draft unchanged.
    pub fn update_stock_line(
        &mut self,
        index: usize,
        field: StockField,
        input: &str,
    ) -> Result<(), DraftError> {
        let line = self
            .stock
            .get_mut(index)
            .ok_or(DraftError::NoSuchLine(index))?;

        let invalid = || DraftError::InvalidNumber {
            field: field.name(),
            input: input.to_string(),
        };
        let text = input.trim();

        match field {
            StockField::Size => line.size = Decimal::from_str(text).map_err(|_| invalid())?,
            StockField::Quantity => line.quantity = text.parse().map_err(|_| invalid())?,
            StockField::Price => line.price = Decimal::from_str(text).map_err(|_| invalid())?,
        }
        Ok(())
    }

    /// Append a zeroed line; returns its index
    pub fn add_stock_line(&mut self) -> usize {
        self.stock.push(StockLineDraft::blank());
        self.stock.len() - 1
    }

    /// Remove the line at `index`; out of range is a no-op
    pub fn remove_stock_line(&mut self, index: usize) {
        self.stock = std::mem::take(&mut self.stock)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, line)| line)
            .collect();
    }

    /// The first line is always kept
    pub fn is_removable(&self, index: usize) -> bool {
        index > 0 && index < self.stock.len()
    }

    /// Request body for this draft, without checks
    pub fn to_command(&self) -> CreateProductCommand {
        self.stock.iter().fold(
            CreateProductCommand::new(self.name.clone()).with_product_id(self.product_id.clone()),
            |command, line| {
                command.with_stock_line(
                    StockLineInput::new(line.size, line.quantity, line.price)
                        .with_stock_id(line.stock_id.clone()),
                )
            },
        )
    }

    /// Check the draft and build its request body
    pub fn validate(&self) -> Result<CreateProductCommand, DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        let command = self.to_command();
        command.clone().validate()?;
        Ok(command)
    }
}
