//! API client
//!
//! Typed access to every endpoint with a tag-invalidated cache: query
//! results are cached per endpoint and arguments, and a successful
//! mutation drops every entry carrying one of its tags so the next read
//! goes back to the server.

mod cache;
pub mod endpoints;
mod error;
mod transport;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::routes::MessageResponse;
use crate::domain::{Customer, DashboardMetrics, Expense, Product, Purchase, Sale};
use crate::handlers::{
    CreateCustomerCommand, CreateExpenseCommand, CreateProductCommand, CreatePurchaseCommand,
    CreateSaleCommand, UpdateCustomerCommand, UpdateProductCommand, UpdateStockCommand,
};

pub use cache::{Generation, TagCache};
pub use endpoints::{Endpoint, HttpMethod, Tag};
pub use error::ClientError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

pub type ClientResult<T> = Result<T, ClientError>;

/// Typed client with response cache
pub struct ApiClient<T: Transport> {
    transport: T,
    cache: TagCache,
}

impl ApiClient<HttpTransport> {
    /// Client for the server at `base_url`
    pub fn connect(base_url: &str) -> ClientResult<Self> {
        Ok(Self::new(HttpTransport::new(base_url)?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: TagCache::new(),
        }
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        path: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        tracing::debug!(endpoint = endpoint.name, path = %path, "Sending request");

        let response = self
            .transport
            .send(ApiRequest {
                method: endpoint.method,
                path,
                query,
                body,
            })
            .await?;

        if !response.is_success() {
            return Err(ClientError::from_response(response.status, &response.body));
        }
        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn query<R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &[&str],
        query: Vec<(String, String)>,
    ) -> ClientResult<R> {
        let path = endpoint.path(params);
        let key = cache_key(endpoint, &path, &query);

        if let Some(value) = self.cache.get(&key) {
            tracing::debug!(endpoint = endpoint.name, "Cache hit");
            return Ok(serde_json::from_value(value)?);
        }

        let generation = self.cache.generation(endpoint.provides);
        let value = self.execute(endpoint, path, query, None).await?;
        let decoded = serde_json::from_value(value.clone())?;
        if !self.cache.insert(key, endpoint.provides, value, &generation) {
            tracing::debug!(endpoint = endpoint.name, "Invalidated while in flight, not cached");
        }
        Ok(decoded)
    }

    async fn mutate<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &[&str],
        body: Option<&B>,
    ) -> ClientResult<R> {
        let body = body.map(serde_json::to_value).transpose()?;
        let value = self
            .execute(endpoint, endpoint.path(params), Vec::new(), body)
            .await?;

        let dropped = self.cache.invalidate(endpoint.invalidates);
        tracing::debug!(endpoint = endpoint.name, dropped, "Invalidated cache entries");

        Ok(serde_json::from_value(value)?)
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub async fn get_dashboard_metrics(&self) -> ClientResult<DashboardMetrics> {
        self.query(&endpoints::GET_DASHBOARD_METRICS, &[], Vec::new())
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn get_products(&self, search: Option<&str>) -> ClientResult<Vec<Product>> {
        let query = match search {
            Some(s) => vec![("search".to_string(), s.to_string())],
            None => Vec::new(),
        };
        self.query(&endpoints::GET_PRODUCTS, &[], query).await
    }

    pub async fn create_product(&self, command: &CreateProductCommand) -> ClientResult<Product> {
        self.mutate(&endpoints::CREATE_PRODUCT, &[], Some(command))
            .await
    }

    pub async fn delete_product(&self, product_id: &str) -> ClientResult<MessageResponse> {
        self.mutate::<(), _>(&endpoints::DELETE_PRODUCT, &[product_id], None)
            .await
    }

    pub async fn update_product(
        &self,
        product_id: &str,
        command: &UpdateProductCommand,
    ) -> ClientResult<Product> {
        self.mutate(&endpoints::UPDATE_PRODUCT, &[product_id], Some(command))
            .await
    }

    pub async fn update_product_stock(
        &self,
        product_id: &str,
        command: &UpdateStockCommand,
    ) -> ClientResult<Product> {
        self.mutate(&endpoints::UPDATE_PRODUCT_STOCK, &[product_id], Some(command))
            .await
    }

    pub async fn delete_product_stock(
        &self,
        product_id: &str,
        stock_id: &str,
    ) -> ClientResult<Product> {
        self.mutate::<(), _>(
            &endpoints::DELETE_PRODUCT_STOCK,
            &[product_id, stock_id],
            None,
        )
        .await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub async fn get_customers(&self) -> ClientResult<Vec<Customer>> {
        self.query(&endpoints::GET_CUSTOMERS, &[], Vec::new()).await
    }

    pub async fn get_customer(&self, user_id: &str) -> ClientResult<Customer> {
        self.query(&endpoints::GET_CUSTOMER, &[user_id], Vec::new())
            .await
    }

    pub async fn create_customer(
        &self,
        command: &CreateCustomerCommand,
    ) -> ClientResult<Customer> {
        self.mutate(&endpoints::CREATE_CUSTOMER, &[], Some(command))
            .await
    }

    pub async fn delete_customer(&self, user_id: &str) -> ClientResult<MessageResponse> {
        self.mutate::<(), _>(&endpoints::DELETE_CUSTOMER, &[user_id], None)
            .await
    }

    pub async fn update_customer(
        &self,
        user_id: &str,
        command: &UpdateCustomerCommand,
    ) -> ClientResult<Customer> {
        self.mutate(&endpoints::UPDATE_CUSTOMER, &[user_id], Some(command))
            .await
    }

    // =========================================================================
    // Sales & purchases
    // =========================================================================

    pub async fn new_sale(&self, command: &CreateSaleCommand) -> ClientResult<Sale> {
        self.mutate(&endpoints::NEW_SALE, &[], Some(command)).await
    }

    pub async fn get_sales(&self) -> ClientResult<Vec<Sale>> {
        self.query(&endpoints::GET_SALES, &[], Vec::new()).await
    }

    pub async fn get_purchases(&self) -> ClientResult<Vec<Purchase>> {
        self.query(&endpoints::GET_PURCHASES, &[], Vec::new()).await
    }

    pub async fn new_purchase(&self, command: &CreatePurchaseCommand) -> ClientResult<Purchase> {
        self.mutate(&endpoints::NEW_PURCHASE, &[], Some(command))
            .await
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    pub async fn get_expenses(&self) -> ClientResult<Vec<Expense>> {
        self.query(&endpoints::GET_EXPENSES, &[], Vec::new()).await
    }

    pub async fn new_expense(&self, command: &CreateExpenseCommand) -> ClientResult<Expense> {
        self.mutate(&endpoints::NEW_EXPENSE, &[], Some(command))
            .await
    }
}

fn cache_key(endpoint: &Endpoint, path: &str, query: &[(String, String)]) -> String {
    let mut key = format!("{}:{}", endpoint.name, path);
    for (name, value) in query {
        key.push_str(&format!("&{name}={value}"));
    }
    key
}
