//! Command definitions
//!
//! Commands carry raw client input. `validate` turns a command into the
//! validated domain value the store accepts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::id::{optional_text, required_text, resolve_id, validate_id};
use crate::domain::money::{validate_rating, validate_total};
use crate::domain::{
    CustomerChanges, DomainError, NewCustomer, NewExpense, NewProduct, NewPurchase, NewSale,
    NewStock, Price, ProductChanges, Quantity, Size,
};

const MAX_NAME_LEN: usize = 200;
const MAX_FIELD_LEN: usize = 200;

// =========================================================================
// Products
// =========================================================================

/// One stock line as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLineInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_id: Option<String>,
    pub size: Decimal,
    pub quantity: i32,
    pub price: Decimal,
}

impl StockLineInput {
    pub fn new(size: Decimal, quantity: i32, price: Decimal) -> Self {
        Self {
            stock_id: None,
            size,
            quantity,
            price,
        }
    }

    pub fn with_stock_id(mut self, stock_id: impl Into<String>) -> Self {
        self.stock_id = Some(stock_id.into());
        self
    }

    fn validate(self) -> Result<NewStock, DomainError> {
        Ok(NewStock {
            stock_id: resolve_id("stockId", self.stock_id.as_deref())?,
            size: Size::new(self.size)?,
            quantity: Quantity::new("quantity", self.quantity)?,
            price: Price::new("price", self.price)?,
        })
    }
}

fn validate_lines(lines: Vec<StockLineInput>) -> Result<Vec<NewStock>, DomainError> {
    let lines = lines
        .into_iter()
        .map(StockLineInput::validate)
        .collect::<Result<Vec<_>, _>>()?;

    for (i, line) in lines.iter().enumerate() {
        if lines[..i].iter().any(|earlier| earlier.stock_id == line.stock_id) {
            return Err(DomainError::DuplicateStockId(line.stock_id.clone()));
        }
    }
    Ok(lines)
}

/// Command to create a product with its stock lines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub stock: Vec<StockLineInput>,
}

impl CreateProductCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            price: None,
            rating: None,
            stock_quantity: None,
            stock: Vec::new(),
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = Some(stock_quantity);
        self
    }

    pub fn with_stock_line(mut self, line: StockLineInput) -> Self {
        self.stock.push(line);
        self
    }

    pub fn validate(self) -> Result<NewProduct, DomainError> {
        Ok(NewProduct {
            product_id: resolve_id("productId", self.product_id.as_deref())?,
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            price: self.price.map(|p| Price::new("price", p)).transpose()?,
            rating: self.rating.map(validate_rating).transpose()?,
            stock_quantity: self
                .stock_quantity
                .map(|q| Quantity::new("stockQuantity", q))
                .transpose()?,
            stock: validate_lines(self.stock)?,
        })
    }
}

/// Command to change a product's own fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
}

impl UpdateProductCommand {
    pub fn validate(self) -> Result<ProductChanges, DomainError> {
        Ok(ProductChanges {
            name: self
                .name
                .map(|n| required_text("name", &n, MAX_NAME_LEN))
                .transpose()?,
            price: self.price.map(|p| Price::new("price", p)).transpose()?,
            rating: self.rating.map(validate_rating).transpose()?,
            stock_quantity: self
                .stock_quantity
                .map(|q| Quantity::new("stockQuantity", q))
                .transpose()?,
        })
    }
}

/// Command to insert or update stock lines of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStockCommand {
    pub stock: Vec<StockLineInput>,
}

impl UpdateStockCommand {
    pub fn validate(self) -> Result<Vec<NewStock>, DomainError> {
        validate_lines(self.stock)
    }
}

// =========================================================================
// Customers
// =========================================================================

/// Command to create a customer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl CreateCustomerCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(self) -> Result<NewCustomer, DomainError> {
        Ok(NewCustomer {
            user_id: resolve_id("userId", self.user_id.as_deref())?,
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            phone_number: optional_text("phoneNumber", &self.phone_number, MAX_FIELD_LEN)?,
            instagram: optional_text("instagram", &self.instagram, MAX_FIELD_LEN)?,
            street_address: optional_text("streetAddress", &self.street_address, MAX_FIELD_LEN)?,
            city: optional_text("city", &self.city, MAX_FIELD_LEN)?,
            state: optional_text("state", &self.state, MAX_FIELD_LEN)?,
            zip_code: optional_text("zipCode", &self.zip_code, MAX_FIELD_LEN)?,
        })
    }
}

/// Command to change customer fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl UpdateCustomerCommand {
    pub fn validate(self) -> Result<CustomerChanges, DomainError> {
        let text = |field: &'static str, value: Option<String>| {
            value
                .map(|v| optional_text(field, &v, MAX_FIELD_LEN))
                .transpose()
        };

        Ok(CustomerChanges {
            name: self
                .name
                .map(|n| required_text("name", &n, MAX_NAME_LEN))
                .transpose()?,
            phone_number: text("phoneNumber", self.phone_number)?,
            instagram: text("instagram", self.instagram)?,
            street_address: text("streetAddress", self.street_address)?,
            city: text("city", self.city)?,
            state: text("state", self.state)?,
            zip_code: text("zipCode", self.zip_code)?,
        })
    }
}

// =========================================================================
// Sales & purchases
// =========================================================================

/// Command to record a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
    pub stock_id: String,
    pub user_id: String,
    pub quantity: i32,
    pub sales_price: Decimal,
    /// Defaults to the time of recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateSaleCommand {
    pub fn new(
        stock_id: impl Into<String>,
        user_id: impl Into<String>,
        quantity: i32,
        sales_price: Decimal,
    ) -> Self {
        Self {
            sale_id: None,
            stock_id: stock_id.into(),
            user_id: user_id.into(),
            quantity,
            sales_price,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(self) -> Result<NewSale, DomainError> {
        Ok(NewSale {
            sale_id: resolve_id("saleId", self.sale_id.as_deref())?,
            stock_id: validate_id("stockId", &self.stock_id)?,
            user_id: validate_id("userId", &self.user_id)?,
            quantity: Quantity::positive("quantity", self.quantity)?,
            sales_price: Price::new("salesPrice", self.sales_price)?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

/// Command to record a restock purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<String>,
    pub stock_id: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreatePurchaseCommand {
    pub fn new(stock_id: impl Into<String>, quantity: i32, unit_cost: Decimal) -> Self {
        Self {
            purchase_id: None,
            stock_id: stock_id.into(),
            quantity,
            unit_cost,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(self) -> Result<NewPurchase, DomainError> {
        let purchase = NewPurchase {
            purchase_id: resolve_id("purchaseId", self.purchase_id.as_deref())?,
            stock_id: validate_id("stockId", &self.stock_id)?,
            quantity: Quantity::positive("quantity", self.quantity)?,
            unit_cost: Price::new("unitCost", self.unit_cost)?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        };
        validate_total("totalCost", purchase.total_cost())?;
        Ok(purchase)
    }
}

// =========================================================================
// Expenses
// =========================================================================

/// Command to record an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,
    pub category: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateExpenseCommand {
    pub fn new(category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            expense_id: None,
            category: category.into(),
            amount,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(self) -> Result<NewExpense, DomainError> {
        Ok(NewExpense {
            expense_id: resolve_id("expenseId", self.expense_id.as_deref())?,
            category: required_text("category", &self.category, MAX_FIELD_LEN)?,
            amount: Price::new("amount", self.amount)?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}
