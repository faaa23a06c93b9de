//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Customer, DashboardMetrics, Expense, OperationContext, Product, Purchase, Sale,
};
use crate::error::AppError;
use crate::handlers::{
    CreateCustomerCommand, CreateExpenseCommand, CreateProductCommand, CreatePurchaseCommand,
    CreateSaleCommand, UpdateCustomerCommand, UpdateProductCommand, UpdateStockCommand,
};

use super::extract::{ApiJson, ApiQuery};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProductSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Confirmation body for deletions
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Dashboard
        .route("/dashboard", get(get_dashboard_metrics))
        // Products
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:product_id/stock", post(update_product_stock))
        .route(
            "/products/:product_id/stock/:stock_id",
            delete(delete_product_stock),
        )
        // Customers
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:user_id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        // Sales & purchases
        .route("/sales", get(list_sales).post(create_sale))
        .route("/purchases", get(list_purchases).post(create_purchase))
        // Expenses
        .route("/expenses", get(list_expenses).post(create_expense))
}

// =========================================================================
// GET /dashboard
// =========================================================================

async fn get_dashboard_metrics(
    State(state): State<AppState>,
) -> Result<Json<DashboardMetrics>, AppError> {
    Ok(Json(state.dashboard().metrics().await?))
}

// =========================================================================
// Products
// =========================================================================

/// List products, filtered by `?search=`
async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductSearchQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.products().list(query.search.as_deref()).await?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products().get(&product_id).await?))
}

async fn create_product(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    ApiJson(command): ApiJson<CreateProductCommand>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products().create(command, &context).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(product_id): Path<String>,
    ApiJson(command): ApiJson<UpdateProductCommand>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products()
        .update(&product_id, command, &context)
        .await?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(product_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.products().delete(&product_id, &context).await?;
    Ok(MessageResponse::new("Product deleted"))
}

/// Insert or update stock lines of a product
async fn update_product_stock(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(product_id): Path<String>,
    ApiJson(command): ApiJson<UpdateStockCommand>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products()
        .update_stock(&product_id, command, &context)
        .await?;
    Ok(Json(product))
}

async fn delete_product_stock(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path((product_id, stock_id)): Path<(String, String)>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products()
        .delete_stock(&product_id, &stock_id, &context)
        .await?;
    Ok(Json(product))
}

// =========================================================================
// Customers
// =========================================================================

async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers().list().await?))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers().get(&user_id).await?))
}

async fn create_customer(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    ApiJson(command): ApiJson<CreateCustomerCommand>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = state.customers().create(command, &context).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<String>,
    ApiJson(command): ApiJson<UpdateCustomerCommand>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .customers()
        .update(&user_id, command, &context)
        .await?;
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.customers().delete(&user_id, &context).await?;
    Ok(MessageResponse::new("Customer deleted"))
}

// =========================================================================
// Sales & purchases
// =========================================================================

async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<Sale>>, AppError> {
    Ok(Json(state.sales().list().await?))
}

async fn create_sale(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    ApiJson(command): ApiJson<CreateSaleCommand>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    let sale = state.sales().create(command, &context).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn list_purchases(State(state): State<AppState>) -> Result<Json<Vec<Purchase>>, AppError> {
    Ok(Json(state.purchases().list().await?))
}

async fn create_purchase(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    ApiJson(command): ApiJson<CreatePurchaseCommand>,
) -> Result<(StatusCode, Json<Purchase>), AppError> {
    let purchase = state.purchases().create(command, &context).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

// =========================================================================
// Expenses
// =========================================================================

async fn list_expenses(State(state): State<AppState>) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(state.expenses().list().await?))
}

async fn create_expense(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    ApiJson(command): ApiJson<CreateExpenseCommand>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = state.expenses().create(command, &context).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}
