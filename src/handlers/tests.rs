//! Handler tests
//!
//! Run against the memory store; the Postgres store is covered by
//! `tests/integration_postgres.rs`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use crate::domain::{DomainError, OperationContext};
    use crate::error::{AppError, ErrorKind};
    use crate::handlers::{
        CreateCustomerCommand, CreateExpenseCommand, CreateProductCommand, CreatePurchaseCommand,
        CreateSaleCommand, CustomerHandler, ExpenseHandler, ProductHandler, PurchaseHandler,
        SaleHandler, StockLineInput, UpdateProductCommand, UpdateStockCommand,
    };
    use crate::store::{DynStore, MemoryStore};

    fn store() -> DynStore {
        Arc::new(MemoryStore::new())
    }

    fn context() -> OperationContext {
        OperationContext::new().with_correlation_id(uuid::Uuid::new_v4())
    }

    // =========================================================================
    // Command validation
    // =========================================================================

    #[test]
    fn test_create_product_command_builder() {
        let cmd = CreateProductCommand::new("Air Max 90")
            .with_product_id("p-1")
            .with_price(dec!(129.99))
            .with_rating(dec!(4.5))
            .with_stock_quantity(12)
            .with_stock_line(StockLineInput::new(dec!(9.5), 3, dec!(129.99)));

        let product = cmd.validate().unwrap();
        assert_eq!(product.product_id, "p-1");
        assert_eq!(product.name, "Air Max 90");
        assert_eq!(product.stock.len(), 1);
        assert!(!product.stock[0].stock_id.is_empty());
    }

    #[test]
    fn test_create_product_rejects_blank_name() {
        let result = CreateProductCommand::new("   ").validate();
        assert!(matches!(result, Err(DomainError::EmptyField("name"))));
    }

    #[test]
    fn test_create_product_rejects_negative_stock() {
        let result = CreateProductCommand::new("Dunk")
            .with_stock_line(StockLineInput::new(dec!(10), -1, dec!(100)))
            .validate();
        assert!(matches!(
            result,
            Err(DomainError::Negative { field: "quantity", .. })
        ));

        let result = CreateProductCommand::new("Dunk")
            .with_stock_line(StockLineInput::new(dec!(10), 1, dec!(-100)))
            .validate();
        assert!(matches!(
            result,
            Err(DomainError::Negative { field: "price", .. })
        ));
    }

    #[test]
    fn test_duplicate_stock_ids_rejected() {
        let result = UpdateStockCommand {
            stock: vec![
                StockLineInput::new(dec!(9), 1, dec!(100)).with_stock_id("s-1"),
                StockLineInput::new(dec!(10), 1, dec!(100)).with_stock_id("s-1"),
            ],
        }
        .validate();
        assert!(matches!(result, Err(DomainError::DuplicateStockId(_))));
    }

    #[test]
    fn test_sale_requires_positive_quantity() {
        let result = CreateSaleCommand::new("s-1", "u-1", 0, dec!(150)).validate();
        assert!(matches!(result, Err(DomainError::NotPositive { .. })));
    }

    #[test]
    fn test_purchase_total_cost() {
        let purchase = CreatePurchaseCommand::new("s-1", 4, dec!(80.25))
            .validate()
            .unwrap();
        assert_eq!(purchase.total_cost(), dec!(321.00));
    }

    #[test]
    fn test_purchase_total_beyond_ledger_rejected() {
        let result = CreatePurchaseCommand::new("s-1", i32::MAX, dec!(1000000000)).validate();
        assert!(matches!(
            result,
            Err(DomainError::OutOfRange { field: "totalCost", .. })
        ));
    }

    #[test]
    fn test_rating_with_three_decimals_rejected() {
        let result = CreateProductCommand::new("Dunk")
            .with_rating(dec!(4.555))
            .validate();
        assert!(matches!(
            result,
            Err(DomainError::TooManyDecimals { field: "rating", .. })
        ));
    }

    #[test]
    fn test_blank_references_name_their_field() {
        let result = CreateSaleCommand::new(" ", "u-1", 1, dec!(10)).validate();
        assert!(matches!(result, Err(DomainError::EmptyField("stockId"))));

        let result = CreateSaleCommand::new("s-1", "", 1, dec!(10)).validate();
        assert!(matches!(result, Err(DomainError::EmptyField("userId"))));

        let result = CreatePurchaseCommand::new("", 1, dec!(10)).validate();
        assert!(matches!(result, Err(DomainError::EmptyField("stockId"))));
    }

    #[test]
    fn test_expense_requires_category() {
        let result = CreateExpenseCommand::new("  ", dec!(20)).validate();
        assert!(matches!(result, Err(DomainError::EmptyField("category"))));

        let result = CreateExpenseCommand::new("Rent", dec!(-1)).validate();
        assert!(matches!(result, Err(DomainError::Negative { field: "amount", .. })));
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[tokio::test]
    async fn test_created_product_echoes_fields_and_is_listed() {
        let handler = ProductHandler::new(store());

        let created = handler
            .create(
                CreateProductCommand::new("Air Max")
                    .with_product_id("p-1")
                    .with_price(dec!(140))
                    .with_stock_line(
                        StockLineInput::new(dec!(10.5), 2, dec!(140)).with_stock_id("s-1"),
                    ),
                &context(),
            )
            .await
            .unwrap();

        assert_eq!(created.product_id, "p-1");
        assert_eq!(created.name, "Air Max");
        assert_eq!(created.price, Some(dec!(140)));
        assert_eq!(created.stock[0].stock_id, "s-1");
        assert_eq!(created.stock[0].product_id, "p-1");
        assert_eq!(created.stock[0].size, dec!(10.5));

        let listed = handler.list(None).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_blank_means_all() {
        let handler = ProductHandler::new(store());
        let ctx = context();
        handler.create(CreateProductCommand::new("Air Max"), &ctx).await.unwrap();
        handler.create(CreateProductCommand::new("Samba"), &ctx).await.unwrap();

        let found = handler.list(Some("air")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Air Max");

        assert_eq!(handler.list(Some("  ")).await.unwrap().len(), 2);
        assert!(handler.list(Some("jordan")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let handler = ProductHandler::new(store());
        let err = handler.delete("missing", &context()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_record() {
        let handler = ProductHandler::new(store());
        let ctx = context();
        let created = handler
            .create(CreateProductCommand::new("Gazelle"), &ctx)
            .await
            .unwrap();

        let same = handler
            .update(&created.product_id, UpdateProductCommand::default(), &ctx)
            .await
            .unwrap();
        assert_eq!(same, created);

        let err = handler
            .update("missing", UpdateProductCommand::default(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_stock_line_lifecycle() {
        let handler = ProductHandler::new(store());
        let ctx = context();
        handler
            .create(CreateProductCommand::new("Dunk").with_product_id("p-1"), &ctx)
            .await
            .unwrap();

        let product = handler
            .update_stock(
                "p-1",
                UpdateStockCommand {
                    stock: vec![StockLineInput::new(dec!(9), 5, dec!(110)).with_stock_id("s-1")],
                },
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(product.units_on_hand(), 5);

        let product = handler.delete_stock("p-1", "s-1", &ctx).await.unwrap();
        assert!(product.stock.is_empty());

        let err = handler.delete_stock("p-1", "s-1", &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // =========================================================================
    // Sales, purchases, customers
    // =========================================================================

    #[tokio::test]
    async fn test_sale_with_unknown_stock_is_invalid_input() {
        let store = store();
        let customers = CustomerHandler::new(store.clone());
        let sales = SaleHandler::new(store);
        let ctx = context();

        let customer = customers
            .create(CreateCustomerCommand::new("Dana"), &ctx)
            .await
            .unwrap();

        let err = sales
            .create(
                CreateSaleCommand::new("no-such-stock", customer.user_id, 1, dec!(150)),
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(err, AppError::Store { .. }));
    }

    #[tokio::test]
    async fn test_sale_and_purchase_recorded() {
        let store = store();
        let products = ProductHandler::new(store.clone());
        let customers = CustomerHandler::new(store.clone());
        let sales = SaleHandler::new(store.clone());
        let purchases = PurchaseHandler::new(store);
        let ctx = context();

        products
            .create(
                CreateProductCommand::new("Samba").with_stock_line(
                    StockLineInput::new(dec!(8), 3, dec!(100)).with_stock_id("s-1"),
                ),
                &ctx,
            )
            .await
            .unwrap();
        let customer = customers
            .create(CreateCustomerCommand::new("Dana"), &ctx)
            .await
            .unwrap();

        let sale = sales
            .create(
                CreateSaleCommand::new("s-1", customer.user_id.clone(), 2, dec!(95)),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(sale.quantity, 2);
        assert_eq!(sales.list().await.unwrap(), vec![sale]);

        let purchase = purchases
            .create(CreatePurchaseCommand::new("s-1", 10, dec!(60)), &ctx)
            .await
            .unwrap();
        assert_eq!(purchase.total_cost, dec!(600));

        let err = customers.delete(&customer.user_id, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_oversized_purchase_is_invalid_input() {
        let purchases = PurchaseHandler::new(store());

        let err = purchases
            .create(
                CreatePurchaseCommand::new("s-1", i32::MAX, dec!(1000000000)),
                &context(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_sales_and_purchases_listed_newest_first() {
        let store = store();
        let products = ProductHandler::new(store.clone());
        let customers = CustomerHandler::new(store.clone());
        let sales = SaleHandler::new(store.clone());
        let purchases = PurchaseHandler::new(store);
        let ctx = context();

        products
            .create(
                CreateProductCommand::new("Samba").with_stock_line(
                    StockLineInput::new(dec!(8), 3, dec!(100)).with_stock_id("s-1"),
                ),
                &ctx,
            )
            .await
            .unwrap();
        let customer = customers
            .create(CreateCustomerCommand::new("Dana"), &ctx)
            .await
            .unwrap();

        let newer = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let older = newer - Duration::days(1);

        // Newest recorded first so insertion order cannot pass for sorting
        for (id, at) in [("sale-new", newer), ("sale-old", older)] {
            let mut cmd = CreateSaleCommand::new("s-1", customer.user_id.clone(), 1, dec!(95));
            cmd.sale_id = Some(id.to_string());
            sales.create(cmd.at(at), &ctx).await.unwrap();
        }
        for (id, at) in [("buy-old", older), ("buy-new", newer)] {
            let mut cmd = CreatePurchaseCommand::new("s-1", 2, dec!(60));
            cmd.purchase_id = Some(id.to_string());
            purchases.create(cmd.at(at), &ctx).await.unwrap();
        }

        let sale_ids: Vec<_> = sales
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.sale_id)
            .collect();
        assert_eq!(sale_ids, ["sale-new", "sale-old"]);

        let purchase_ids: Vec<_> = purchases
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.purchase_id)
            .collect();
        assert_eq!(purchase_ids, ["buy-new", "buy-old"]);
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    #[tokio::test]
    async fn test_expense_recorded_and_listed() {
        let expenses = ExpenseHandler::new(store());
        let ctx = context();

        let expense = expenses
            .create(CreateExpenseCommand::new(" Shipping ", dec!(42.5)), &ctx)
            .await
            .unwrap();
        assert_eq!(expense.category, "Shipping");
        assert_eq!(expense.amount, dec!(42.50));
        assert_eq!(expenses.list().await.unwrap(), vec![expense]);
    }
}
