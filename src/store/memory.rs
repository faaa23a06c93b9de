//! In-memory store
//!
//! Mirrors the PostgreSQL constraints (unique ids, foreign keys, restrict
//! on delete) and column scales so handlers behave the same against
//! either backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{InventoryStore, StoreError, StoreResult};
use crate::domain::summary::{latest, DASHBOARD_SUMMARY_LIMIT};
use crate::domain::{
    Customer, CustomerChanges, DashboardMetrics, Expense, NewCustomer, NewExpense, NewProduct,
    NewPurchase, NewSale, NewStock, Product, ProductChanges, Purchase, Sale,
};

/// Fractional digits of every NUMERIC column
const COLUMN_SCALE: u32 = 2;

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    customers: Vec<Customer>,
    sales: Vec<Sale>,
    purchases: Vec<Purchase>,
    expenses: Vec<Expense>,
    summaries: DashboardMetrics,
}

/// Decimal as a NUMERIC(_, 2) column hands it back
fn column(mut value: Decimal) -> Decimal {
    value.rescale(COLUMN_SCALE);
    value
}

fn store_scale(product: &mut Product) {
    product.price = product.price.map(column);
    product.rating = product.rating.map(column);
    for line in &mut product.stock {
        line.size = column(line.size);
        line.price = column(line.price);
    }
}

impl Tables {
    fn product(&self, product_id: &str) -> StoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| StoreError::not_found("product", product_id))
    }

    fn product_mut(&mut self, product_id: &str) -> StoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| StoreError::not_found("product", product_id))
    }

    fn customer_mut(&mut self, user_id: &str) -> StoreResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or_else(|| StoreError::not_found("customer", user_id))
    }

    /// Product owning the stock line, if any
    fn stock_owner(&self, stock_id: &str) -> Option<&str> {
        self.products
            .iter()
            .find(|p| p.stock.iter().any(|s| s.stock_id == stock_id))
            .map(|p| p.product_id.as_str())
    }

    fn stock_referenced(&self, stock_id: &str) -> bool {
        self.sales.iter().any(|s| s.stock_id == stock_id)
            || self.purchases.iter().any(|p| p.stock_id == stock_id)
    }
}

/// Store keeping every table in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load summary rows, as the external aggregation job would
    pub fn with_summaries(self, summaries: DashboardMetrics) -> Self {
        self.tables().summaries = summaries;
        self
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_products(&self, search: Option<&str>) -> StoreResult<Vec<Product>> {
        let tables = self.tables();
        let mut products: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| search.map_or(true, |term| p.name_matches(term)))
            .cloned()
            .collect();
        products.sort_by_cached_key(|p| (p.name.to_lowercase(), p.product_id.clone()));
        Ok(products)
    }

    async fn get_product(&self, product_id: &str) -> StoreResult<Product> {
        self.tables().product(product_id).cloned()
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tables = self.tables();

        if tables.product(&product.product_id).is_ok() {
            return Err(StoreError::already_exists("product", product.product_id));
        }
        if let Some(line) = product
            .stock
            .iter()
            .find(|line| tables.stock_owner(&line.stock_id).is_some())
        {
            return Err(StoreError::already_exists("stock", line.stock_id.clone()));
        }

        let mut product = product.into_product();
        store_scale(&mut product);
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        product_id: &str,
        changes: ProductChanges,
    ) -> StoreResult<Product> {
        let mut tables = self.tables();
        let product = tables.product_mut(product_id)?;
        changes.apply(product);
        store_scale(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, product_id: &str) -> StoreResult<()> {
        let mut tables = self.tables();
        let product = tables.product(product_id)?;

        if product
            .stock
            .iter()
            .any(|s| tables.stock_referenced(&s.stock_id))
        {
            return Err(StoreError::in_use("product", product_id));
        }

        tables.products.retain(|p| p.product_id != product_id);
        Ok(())
    }

    async fn upsert_stock(&self, product_id: &str, lines: Vec<NewStock>) -> StoreResult<Product> {
        let mut tables = self.tables();
        tables.product(product_id)?;

        // Validate every line before touching anything
        for line in &lines {
            if let Some(owner) = tables.stock_owner(&line.stock_id) {
                if owner != product_id {
                    return Err(StoreError::already_exists("stock", line.stock_id.clone()));
                }
            }
        }

        let product = tables.product_mut(product_id)?;
        for line in lines {
            let stock = line.into_stock(product_id);
            match product.stock.iter_mut().find(|s| s.stock_id == stock.stock_id) {
                Some(existing) => *existing = stock,
                None => product.stock.push(stock),
            }
        }
        store_scale(product);
        Ok(product.clone())
    }

    async fn delete_stock(&self, product_id: &str, stock_id: &str) -> StoreResult<Product> {
        let mut tables = self.tables();
        let product = tables.product(product_id)?;

        if !product.stock.iter().any(|s| s.stock_id == stock_id) {
            return Err(StoreError::not_found("stock", stock_id));
        }
        if tables.stock_referenced(stock_id) {
            return Err(StoreError::in_use("stock", stock_id));
        }

        let product = tables.product_mut(product_id)?;
        product.stock.retain(|s| s.stock_id != stock_id);
        Ok(product.clone())
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let mut customers = self.tables().customers.clone();
        customers.sort_by_cached_key(|c| (c.name.to_lowercase(), c.user_id.clone()));
        Ok(customers)
    }

    async fn get_customer(&self, user_id: &str) -> StoreResult<Customer> {
        self.tables()
            .customers
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("customer", user_id))
    }

    async fn create_customer(&self, customer: NewCustomer) -> StoreResult<Customer> {
        let mut tables = self.tables();
        if tables.customers.iter().any(|c| c.user_id == customer.user_id) {
            return Err(StoreError::already_exists("customer", customer.user_id));
        }
        let customer = customer.into_customer();
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        user_id: &str,
        changes: CustomerChanges,
    ) -> StoreResult<Customer> {
        let mut tables = self.tables();
        let customer = tables.customer_mut(user_id)?;
        changes.apply(customer);
        Ok(customer.clone())
    }

    async fn delete_customer(&self, user_id: &str) -> StoreResult<()> {
        let mut tables = self.tables();
        if !tables.customers.iter().any(|c| c.user_id == user_id) {
            return Err(StoreError::not_found("customer", user_id));
        }
        if tables.sales.iter().any(|s| s.user_id == user_id) {
            return Err(StoreError::in_use("customer", user_id));
        }
        tables.customers.retain(|c| c.user_id != user_id);
        Ok(())
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        let mut sales = self.tables().sales.clone();
        sales.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.sale_id.cmp(&b.sale_id))
        });
        Ok(sales)
    }

    async fn create_sale(&self, sale: NewSale) -> StoreResult<Sale> {
        let mut tables = self.tables();
        if tables.sales.iter().any(|s| s.sale_id == sale.sale_id) {
            return Err(StoreError::already_exists("sale", sale.sale_id));
        }
        if tables.stock_owner(&sale.stock_id).is_none() {
            return Err(StoreError::missing_reference("stock", sale.stock_id));
        }
        if !tables.customers.iter().any(|c| c.user_id == sale.user_id) {
            return Err(StoreError::missing_reference("customer", sale.user_id));
        }
        let mut sale = sale.into_sale();
        sale.sales_price = column(sale.sales_price);
        tables.sales.push(sale.clone());
        Ok(sale)
    }

    async fn list_purchases(&self) -> StoreResult<Vec<Purchase>> {
        let mut purchases = self.tables().purchases.clone();
        purchases.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.purchase_id.cmp(&b.purchase_id))
        });
        Ok(purchases)
    }

    async fn create_purchase(&self, purchase: NewPurchase) -> StoreResult<Purchase> {
        let mut tables = self.tables();
        if tables
            .purchases
            .iter()
            .any(|p| p.purchase_id == purchase.purchase_id)
        {
            return Err(StoreError::already_exists("purchase", purchase.purchase_id));
        }
        if tables.stock_owner(&purchase.stock_id).is_none() {
            return Err(StoreError::missing_reference("stock", purchase.stock_id));
        }
        let mut purchase = purchase.into_purchase();
        purchase.unit_cost = column(purchase.unit_cost);
        purchase.total_cost = column(purchase.total_cost);
        tables.purchases.push(purchase.clone());
        Ok(purchase)
    }

    async fn list_expenses(&self) -> StoreResult<Vec<Expense>> {
        let mut expenses = self.tables().expenses.clone();
        expenses.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.expense_id.cmp(&b.expense_id))
        });
        Ok(expenses)
    }

    async fn create_expense(&self, expense: NewExpense) -> StoreResult<Expense> {
        let mut tables = self.tables();
        if tables
            .expenses
            .iter()
            .any(|e| e.expense_id == expense.expense_id)
        {
            return Err(StoreError::already_exists("expense", expense.expense_id));
        }
        let mut expense = expense.into_expense();
        expense.amount = column(expense.amount);
        tables.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn dashboard_metrics(&self) -> StoreResult<DashboardMetrics> {
        let summaries = self.tables().summaries.clone();
        Ok(DashboardMetrics {
            sale_summary: latest(summaries.sale_summary, DASHBOARD_SUMMARY_LIMIT, |s| s.date),
            purchase_summary: latest(summaries.purchase_summary, DASHBOARD_SUMMARY_LIMIT, |s| {
                s.date
            }),
            expense_summary: latest(summaries.expense_summary, DASHBOARD_SUMMARY_LIMIT, |s| {
                s.date
            }),
            expense_by_category_summary: latest(
                summaries.expense_by_category_summary,
                DASHBOARD_SUMMARY_LIMIT,
                |s| s.date,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Price, Quantity, Size};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn line(stock_id: &str, size: rust_decimal::Decimal) -> NewStock {
        NewStock {
            stock_id: stock_id.to_string(),
            size: Size::new(size).unwrap(),
            quantity: Quantity::new("quantity", 4).unwrap(),
            price: Price::new("price", dec!(120)).unwrap(),
        }
    }

    fn new_product(product_id: &str, name: &str, stock: Vec<NewStock>) -> NewProduct {
        NewProduct {
            product_id: product_id.to_string(),
            name: name.to_string(),
            price: None,
            rating: None,
            stock_quantity: None,
            stock,
        }
    }

    fn new_customer(user_id: &str) -> NewCustomer {
        NewCustomer {
            user_id: user_id.to_string(),
            name: "Dana".to_string(),
            phone_number: "555-0100".to_string(),
            instagram: "@dana".to_string(),
            street_address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
        }
    }

    fn new_sale(sale_id: &str, stock_id: &str, user_id: &str) -> NewSale {
        NewSale {
            sale_id: sale_id.to_string(),
            stock_id: stock_id.to_string(),
            user_id: user_id.to_string(),
            quantity: Quantity::positive("quantity", 1).unwrap(),
            sales_price: Price::new("salesPrice", dec!(150)).unwrap(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_products_filters_and_sorts() {
        let store = MemoryStore::new();
        store.create_product(new_product("p2", "Dunk Low", vec![])).await.unwrap();
        store.create_product(new_product("p1", "Air Max", vec![])).await.unwrap();
        store.create_product(new_product("p3", "Air Force 1", vec![])).await.unwrap();

        let all = store.list_products(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Air Force 1", "Air Max", "Dunk Low"]);

        let air = store.list_products(Some("AIR")).await.unwrap();
        assert_eq!(air.len(), 2);
    }

    #[tokio::test]
    async fn test_names_sort_case_insensitively() {
        let store = MemoryStore::new();
        store.create_product(new_product("p1", "adidas Samba", vec![])).await.unwrap();
        store.create_product(new_product("p2", "Yeezy 350", vec![])).await.unwrap();
        store.create_product(new_product("p3", "Air Max", vec![])).await.unwrap();

        let all = store.list_products(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["adidas Samba", "Air Max", "Yeezy 350"]);
    }

    #[tokio::test]
    async fn test_decimals_carry_column_scale() {
        let store = MemoryStore::new();
        let product = store
            .create_product(new_product("p1", "Air Max", vec![line("s1", dec!(9))]))
            .await
            .unwrap();

        let stored = serde_json::to_value(&product.stock[0]).unwrap();
        assert_eq!(stored["size"], "9.00");
        assert_eq!(stored["price"], "120.00");
        assert_eq!(store.get_product("p1").await.unwrap(), product);
    }

    #[tokio::test]
    async fn test_expenses_newest_first() {
        let store = MemoryStore::new();
        let older = Utc::now() - chrono::Duration::days(1);
        for (id, timestamp) in [("e1", older), ("e2", Utc::now())] {
            store
                .create_expense(NewExpense {
                    expense_id: id.to_string(),
                    category: "Shipping".to_string(),
                    amount: Price::new("amount", dec!(12.5)).unwrap(),
                    timestamp,
                })
                .await
                .unwrap();
        }

        let ids: Vec<_> = store
            .list_expenses()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.expense_id)
            .collect();
        assert_eq!(ids, ["e2", "e1"]);
    }

    #[tokio::test]
    async fn test_duplicate_product_id_conflicts() {
        let store = MemoryStore::new();
        store.create_product(new_product("p1", "Air Max", vec![])).await.unwrap();

        let err = store
            .create_product(new_product("p1", "Other", vec![]))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_upsert_stock_updates_in_place_and_appends() {
        let store = MemoryStore::new();
        store
            .create_product(new_product(
                "p1",
                "Air Max",
                vec![line("s1", dec!(9)), line("s2", dec!(10))],
            ))
            .await
            .unwrap();

        let product = store
            .upsert_stock("p1", vec![line("s1", dec!(9.5)), line("s3", dec!(11))])
            .await
            .unwrap();

        let ids: Vec<_> = product.stock.iter().map(|s| s.stock_id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
        assert_eq!(product.stock[0].size, dec!(9.5));
    }

    #[tokio::test]
    async fn test_upsert_stock_rejects_foreign_line() {
        let store = MemoryStore::new();
        store
            .create_product(new_product("p1", "Air Max", vec![line("s1", dec!(9))]))
            .await
            .unwrap();
        store.create_product(new_product("p2", "Dunk", vec![])).await.unwrap();

        let err = store.upsert_stock("p2", vec![line("s1", dec!(9))]).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { entity: "stock", .. }));
    }

    #[tokio::test]
    async fn test_sale_requires_existing_references() {
        let store = MemoryStore::new();
        let err = store.create_sale(new_sale("sale1", "s1", "u1")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { entity: "stock", .. }));

        store
            .create_product(new_product("p1", "Air Max", vec![line("s1", dec!(9))]))
            .await
            .unwrap();
        let err = store.create_sale(new_sale("sale1", "s1", "u1")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { entity: "customer", .. }));
    }

    #[tokio::test]
    async fn test_referenced_records_cannot_be_deleted() {
        let store = MemoryStore::new();
        store
            .create_product(new_product("p1", "Air Max", vec![line("s1", dec!(9))]))
            .await
            .unwrap();
        store.create_customer(new_customer("u1")).await.unwrap();
        store.create_sale(new_sale("sale1", "s1", "u1")).await.unwrap();

        assert!(matches!(
            store.delete_product("p1").await,
            Err(StoreError::InUse { .. })
        ));
        assert!(matches!(
            store.delete_stock("p1", "s1").await,
            Err(StoreError::InUse { .. })
        ));
        assert!(matches!(
            store.delete_customer("u1").await,
            Err(StoreError::InUse { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_product("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
