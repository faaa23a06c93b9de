//! Client and form tests driven against the in-process router

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    Router,
};
use inventory_api::client::{ApiClient, ApiRequest, ApiResponse, ClientError, Transport};
use inventory_api::form::{AddProductForm, StockField};
use inventory_api::handlers::{
    CreateCustomerCommand, CreateExpenseCommand, CreateProductCommand, CreateSaleCommand,
    StockLineInput,
};
use rust_decimal_macros::dec;
use tokio_test::{assert_err, assert_ok};
use tower::util::ServiceExt;

mod common;

/// Transport that hands requests straight to the router
struct RouterTransport {
    app: Router,
}

#[async_trait]
impl Transport for RouterTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut url = reqwest::Url::parse("http://localhost").unwrap();
        url.set_path(&request.path);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(uri);
        let body = match request.body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json)?)
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).map_err(|e| ClientError::Transport(e.to_string()))?)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .to_vec();
        Ok(ApiResponse { status, body })
    }
}

fn client() -> ApiClient<RouterTransport> {
    ApiClient::new(RouterTransport {
        app: common::memory_app(),
    })
}

#[tokio::test]
async fn test_created_product_visible_without_manual_refresh() {
    let client = client();

    let before = assert_ok!(client.get_products(None).await);
    assert!(before.is_empty());

    let created = assert_ok!(
        client
            .create_product(&CreateProductCommand::new("Air Max 90"))
            .await
    );

    let after = assert_ok!(client.get_products(None).await);
    assert_eq!(after, vec![created]);

    let searched = assert_ok!(client.get_products(Some("AIR max")).await);
    assert_eq!(searched.len(), 1);
}

#[tokio::test]
async fn test_delete_missing_product_is_typed_error() {
    let client = client();

    let err = assert_err!(client.delete_product("missing").await);
    match err {
        ClientError::Api { status, code, .. } => {
            assert_eq!(status, 404);
            assert_eq!(code, "not_found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_sale_refreshes_dashboard_and_sales() {
    let client = client();
    assert_ok!(
        client
            .create_product(
                &CreateProductCommand::new("Samba").with_stock_line(
                    StockLineInput::new(dec!(8), 3, dec!(100))
                        .with_stock_id("s-1"),
                ),
            )
            .await
    );
    let customer = assert_ok!(
        client
            .create_customer(&CreateCustomerCommand::new("Dana"))
            .await
    );

    assert_ok!(client.get_dashboard_metrics().await);
    assert!(assert_ok!(client.get_sales().await).is_empty());

    let sale = assert_ok!(
        client
            .new_sale(&CreateSaleCommand::new("s-1", customer.user_id, 1, dec!(95)))
            .await
    );

    assert_eq!(assert_ok!(client.get_sales().await), vec![sale]);
}

#[tokio::test]
async fn test_ids_with_reserved_characters_stay_in_their_segment() {
    let client = client();
    assert_ok!(
        client
            .create_product(
                &CreateProductCommand::new("Dunk")
                    .with_product_id("p-1")
                    .with_stock_line(
                        StockLineInput::new(dec!(9), 1, dec!(110)).with_stock_id("s-1"),
                    ),
            )
            .await
    );
    let customer = assert_ok!(
        client
            .create_customer(&CreateCustomerCommand::new("Dana"))
            .await
    );

    // Unencoded, this would reach DELETE /products/p-1/stock/s-1
    let err = assert_err!(client.delete_product("p-1/stock/s-1").await);
    assert_eq!(err.status(), Some(404));
    let products = assert_ok!(client.get_products(None).await);
    assert_eq!(products[0].stock.len(), 1);

    // Unencoded, this would read the existing customer
    let lookup = format!("{}?x=1", customer.user_id);
    let err = assert_err!(client.get_customer(&lookup).await);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_new_expense_refreshes_expenses() {
    let client = client();
    assert!(assert_ok!(client.get_expenses().await).is_empty());

    let expense = assert_ok!(
        client
            .new_expense(&CreateExpenseCommand::new("Shipping", dec!(18.4)))
            .await
    );
    assert_eq!(expense.amount, dec!(18.40));

    assert_eq!(assert_ok!(client.get_expenses().await), vec![expense]);
}

#[tokio::test]
async fn test_form_submit_resets_with_fresh_ids() {
    let client = client();
    let mut form = AddProductForm::new();

    let draft = form.draft_mut();
    draft.set_name("Gazelle");
    assert_ok!(draft.update_stock_line(0, StockField::Size, "10"));
    assert_ok!(draft.update_stock_line(0, StockField::Quantity, "2"));
    assert_ok!(draft.update_stock_line(0, StockField::Price, "99.99"));
    draft.add_stock_line();

    let submitted = form.draft().clone();
    let product = assert_ok!(form.submit(&client).await);

    assert_eq!(product.product_id, submitted.product_id);
    assert_eq!(product.stock.len(), 2);
    assert_eq!(product.stock[0].stock_id, submitted.stock[0].stock_id);

    // Blank draft with new identifiers
    let fresh = form.draft();
    assert!(fresh.name.is_empty());
    assert_eq!(fresh.stock.len(), 1);
    assert_ne!(fresh.product_id, submitted.product_id);
    assert!(submitted
        .stock
        .iter()
        .all(|line| line.stock_id != fresh.stock[0].stock_id));

    let listed = assert_ok!(client.get_products(None).await);
    assert_eq!(listed, vec![product]);
}

#[tokio::test]
async fn test_form_resubmit_same_draft_conflicts_and_keeps_draft() {
    let client = client();
    let mut form = AddProductForm::new();
    form.draft_mut().set_name("Gazelle");
    let draft = form.draft().clone();

    assert_ok!(
        client
            .create_product(&assert_ok!(draft.validate()))
            .await
    );

    assert_err!(form.submit(&client).await);
    assert_eq!(form.draft(), &draft);
}
