//! PostgreSQL store
//!
//! Schema lives in `migrations/`. Foreign keys restrict deletion of
//! referenced stock and customers; stock lines cascade with their product.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::{InventoryStore, StoreError, StoreResult};
use crate::domain::summary::DASHBOARD_SUMMARY_LIMIT;
use crate::domain::{
    Customer, CustomerChanges, DashboardMetrics, Expense, ExpenseByCategorySummary, ExpenseSummary,
    NewCustomer, NewExpense, NewProduct, NewPurchase, NewSale, NewStock, Product, ProductChanges,
    Purchase, PurchaseSummary, Sale, SaleSummary, Stock,
};

/// Postgres error code for unique violations
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres error code for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

type ProductRow = (String, String, Option<Decimal>, Option<Decimal>, Option<i32>);

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach stock lines (in insertion order) to product rows
    async fn with_stock(&self, rows: Vec<ProductRow>) -> StoreResult<Vec<Product>> {
        let ids: Vec<String> = rows.iter().map(|row| row.0.clone()).collect();

        let stock: Vec<Stock> = sqlx::query_as(
            r#"
            SELECT stock_id, product_id, size, quantity, price
            FROM stock
            WHERE product_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_product: HashMap<String, Vec<Stock>> = HashMap::new();
        for line in stock {
            by_product.entry(line.product_id.clone()).or_default().push(line);
        }

        Ok(rows
            .into_iter()
            .map(|(product_id, name, price, rating, stock_quantity)| {
                let stock = by_product.remove(&product_id).unwrap_or_default();
                Product {
                    product_id,
                    name,
                    price,
                    rating,
                    stock_quantity,
                    stock,
                }
            })
            .collect())
    }

    async fn load_product(&self, product_id: &str) -> StoreResult<Product> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, name, price, rating, stock_quantity
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| StoreError::not_found("product", product_id))?;
        self.with_stock(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StoreError::not_found("product", product_id))
    }

    async fn insert_stock_line(
        tx: &mut Transaction<'_, Postgres>,
        product_id: &str,
        line: &NewStock,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stock (stock_id, product_id, size, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&line.stock_id)
        .bind(product_id)
        .bind(line.size.value())
        .bind(line.quantity.value())
        .bind(line.price.value())
        .execute(&mut **tx)
        .await
        .map_err(|e| on_unique(e, "stock", &line.stock_id))?;
        Ok(())
    }
}

/// Map a unique violation onto `AlreadyExists`
fn on_unique(err: sqlx::Error, entity: &'static str, id: &str) -> StoreError {
    if db_code(&err).as_deref() == Some(UNIQUE_VIOLATION) {
        return StoreError::already_exists(entity, id);
    }
    StoreError::Database(err)
}

/// Map a foreign key violation on delete onto `InUse`
fn on_restrict(err: sqlx::Error, entity: &'static str, id: &str) -> StoreError {
    if db_code(&err).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        return StoreError::in_use(entity, id);
    }
    StoreError::Database(err)
}

fn db_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn constraint_name(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

/// Escape LIKE wildcards so the search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn list_products(&self, search: Option<&str>) -> StoreResult<Vec<Product>> {
        let pattern = search.map(|term| format!("%{}%", escape_like(term)));

        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, name, price, rating, stock_quantity
            FROM products
            WHERE $1::text IS NULL OR name ILIKE $1
            ORDER BY lower(name) COLLATE "C", product_id COLLATE "C"
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        self.with_stock(rows).await
    }

    async fn get_product(&self, product_id: &str) -> StoreResult<Product> {
        self.load_product(product_id).await
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (product_id, name, price, rating, stock_quantity)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&product.product_id)
        .bind(&product.name)
        .bind(product.price.map(|p| p.value()))
        .bind(product.rating)
        .bind(product.stock_quantity.map(|q| q.value()))
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique(e, "product", &product.product_id))?;

        for line in &product.stock {
            Self::insert_stock_line(&mut tx, &product.product_id, line).await?;
        }

        tx.commit().await?;

        tracing::debug!(
            product_id = %product.product_id,
            lines = product.stock.len(),
            "Product inserted"
        );

        // Read back so decimals carry the column scale
        self.load_product(&product.product_id).await
    }

    async fn update_product(
        &self,
        product_id: &str,
        changes: ProductChanges,
    ) -> StoreResult<Product> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                rating = COALESCE($4, rating),
                stock_quantity = COALESCE($5, stock_quantity)
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .bind(changes.name)
        .bind(changes.price.map(|p| p.value()))
        .bind(changes.rating)
        .bind(changes.stock_quantity.map(|q| q.value()))
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::not_found("product", product_id));
        }

        self.load_product(product_id).await
    }

    async fn delete_product(&self, product_id: &str) -> StoreResult<()> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_restrict(e, "product", product_id))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::not_found("product", product_id));
        }
        Ok(())
    }

    async fn upsert_stock(&self, product_id: &str, lines: Vec<NewStock>) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<String> =
            sqlx::query_scalar("SELECT product_id FROM products WHERE product_id = $1 FOR UPDATE")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("product", product_id));
        }

        for line in &lines {
            // The WHERE clause stops a line owned by another product from being taken over
            let rows_affected = sqlx::query(
                r#"
                INSERT INTO stock (stock_id, product_id, size, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (stock_id) DO UPDATE
                SET size = EXCLUDED.size,
                    quantity = EXCLUDED.quantity,
                    price = EXCLUDED.price
                WHERE stock.product_id = EXCLUDED.product_id
                "#,
            )
            .bind(&line.stock_id)
            .bind(product_id)
            .bind(line.size.value())
            .bind(line.quantity.value())
            .bind(line.price.value())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                return Err(StoreError::already_exists("stock", line.stock_id.clone()));
            }
        }

        tx.commit().await?;
        self.load_product(product_id).await
    }

    async fn delete_stock(&self, product_id: &str, stock_id: &str) -> StoreResult<Product> {
        let rows_affected = sqlx::query("DELETE FROM stock WHERE stock_id = $1 AND product_id = $2")
            .bind(stock_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_restrict(e, "stock", stock_id))?
            .rows_affected();

        if rows_affected == 0 {
            // Distinguish an unknown product from an unknown line
            self.load_product(product_id).await?;
            return Err(StoreError::not_found("stock", stock_id));
        }

        self.load_product(product_id).await
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let customers = sqlx::query_as(
            r#"
            SELECT user_id, name, phone_number, instagram, street_address, city, state, zip_code
            FROM customers
            ORDER BY lower(name) COLLATE "C", user_id COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    async fn get_customer(&self, user_id: &str) -> StoreResult<Customer> {
        let customer: Option<Customer> = sqlx::query_as(
            r#"
            SELECT user_id, name, phone_number, instagram, street_address, city, state, zip_code
            FROM customers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        customer.ok_or_else(|| StoreError::not_found("customer", user_id))
    }

    async fn create_customer(&self, customer: NewCustomer) -> StoreResult<Customer> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO customers
                (user_id, name, phone_number, instagram, street_address, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING user_id, name, phone_number, instagram, street_address, city, state, zip_code
            "#,
        )
        .bind(&customer.user_id)
        .bind(&customer.name)
        .bind(&customer.phone_number)
        .bind(&customer.instagram)
        .bind(&customer.street_address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique(e, "customer", &customer.user_id))?;
        Ok(created)
    }

    async fn update_customer(
        &self,
        user_id: &str,
        changes: CustomerChanges,
    ) -> StoreResult<Customer> {
        let updated: Option<Customer> = sqlx::query_as(
            r#"
            UPDATE customers
            SET
                name = COALESCE($2, name),
                phone_number = COALESCE($3, phone_number),
                instagram = COALESCE($4, instagram),
                street_address = COALESCE($5, street_address),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                zip_code = COALESCE($8, zip_code)
            WHERE user_id = $1
            RETURNING user_id, name, phone_number, instagram, street_address, city, state, zip_code
            "#,
        )
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.phone_number)
        .bind(changes.instagram)
        .bind(changes.street_address)
        .bind(changes.city)
        .bind(changes.state)
        .bind(changes.zip_code)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| StoreError::not_found("customer", user_id))
    }

    async fn delete_customer(&self, user_id: &str) -> StoreResult<()> {
        let rows_affected = sqlx::query("DELETE FROM customers WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_restrict(e, "customer", user_id))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::not_found("customer", user_id));
        }
        Ok(())
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        let sales = sqlx::query_as(
            r#"
            SELECT sale_id, stock_id, user_id, quantity, sales_price, "timestamp"
            FROM sales
            ORDER BY "timestamp" DESC, sale_id COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    async fn create_sale(&self, sale: NewSale) -> StoreResult<Sale> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO sales (sale_id, stock_id, user_id, quantity, sales_price, "timestamp")
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING sale_id, stock_id, user_id, quantity, sales_price, "timestamp"
            "#,
        )
        .bind(&sale.sale_id)
        .bind(&sale.stock_id)
        .bind(&sale.user_id)
        .bind(sale.quantity.value())
        .bind(sale.sales_price.value())
        .bind(sale.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if db_code(&e).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                let customer_missing = constraint_name(&e)
                    .map_or(false, |name| name.contains("user_id"));
                return if customer_missing {
                    StoreError::missing_reference("customer", &sale.user_id)
                } else {
                    StoreError::missing_reference("stock", &sale.stock_id)
                };
            }
            on_unique(e, "sale", &sale.sale_id)
        })?;
        Ok(created)
    }

    async fn list_purchases(&self) -> StoreResult<Vec<Purchase>> {
        let purchases = sqlx::query_as(
            r#"
            SELECT purchase_id, stock_id, quantity, unit_cost, total_cost, "timestamp"
            FROM purchases
            ORDER BY "timestamp" DESC, purchase_id COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(purchases)
    }

    async fn create_purchase(&self, purchase: NewPurchase) -> StoreResult<Purchase> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO purchases
                (purchase_id, stock_id, quantity, unit_cost, total_cost, "timestamp")
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING purchase_id, stock_id, quantity, unit_cost, total_cost, "timestamp"
            "#,
        )
        .bind(&purchase.purchase_id)
        .bind(&purchase.stock_id)
        .bind(purchase.quantity.value())
        .bind(purchase.unit_cost.value())
        .bind(purchase.total_cost())
        .bind(purchase.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if db_code(&e).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                return StoreError::missing_reference("stock", &purchase.stock_id);
            }
            on_unique(e, "purchase", &purchase.purchase_id)
        })?;
        Ok(created)
    }

    async fn list_expenses(&self) -> StoreResult<Vec<Expense>> {
        let expenses = sqlx::query_as(
            r#"
            SELECT expense_id, category, amount, "timestamp"
            FROM expenses
            ORDER BY "timestamp" DESC, expense_id COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    async fn create_expense(&self, expense: NewExpense) -> StoreResult<Expense> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO expenses (expense_id, category, amount, "timestamp")
            VALUES ($1, $2, $3, $4)
            RETURNING expense_id, category, amount, "timestamp"
            "#,
        )
        .bind(&expense.expense_id)
        .bind(&expense.category)
        .bind(expense.amount.value())
        .bind(expense.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique(e, "expense", &expense.expense_id))?;
        Ok(created)
    }

    async fn dashboard_metrics(&self) -> StoreResult<DashboardMetrics> {
        let limit = DASHBOARD_SUMMARY_LIMIT as i64;

        let sale_summary: Vec<SaleSummary> = sqlx::query_as(
            r#"
            SELECT sale_summary_id, total_value, change_percentage, "date"
            FROM sales_summary
            ORDER BY "date" DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let purchase_summary: Vec<PurchaseSummary> = sqlx::query_as(
            r#"
            SELECT purchase_summary_id, total_purchased, change_percentage, "date"
            FROM purchase_summary
            ORDER BY "date" DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let expense_summary: Vec<ExpenseSummary> = sqlx::query_as(
            r#"
            SELECT expense_summary_id, total_expenses, "date"
            FROM expense_summary
            ORDER BY "date" DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let expense_by_category_summary: Vec<ExpenseByCategorySummary> = sqlx::query_as(
            r#"
            SELECT expense_by_category_summary_id, category, amount, "date"
            FROM expense_by_category
            ORDER BY "date" DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardMetrics {
            sale_summary,
            purchase_summary,
            expense_summary,
            expense_by_category_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("air max"), "air max");
        assert_eq!(escape_like("100%_real\\"), "100\\%\\_real\\\\");
    }
}
