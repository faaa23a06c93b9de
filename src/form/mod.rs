//! Product entry form
//!
//! Draft editing and submission through the API client. List views stay
//! fresh through the client's tag invalidation.

mod draft;
mod error;

use crate::client::{ApiClient, Transport};
use crate::domain::Product;

pub use draft::{ProductDraft, StockField, StockLineDraft};
pub use error::{DraftError, SubmitError};

/// "Add product" form state
#[derive(Debug, Default)]
pub struct AddProductForm {
    draft: ProductDraft,
}

impl AddProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    /// Discard the draft for a blank one
    pub fn reset(&mut self) {
        self.draft = ProductDraft::blank();
    }

    /// Send the draft; on success the form resets to a blank draft
    pub async fn submit<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
    ) -> Result<Product, SubmitError> {
        let command = self.draft.validate()?;

        let product = client.create_product(&command).await.map_err(|e| {
            tracing::warn!(
                product_id = %self.draft.product_id,
                error = %e,
                "Product submission failed"
            );
            e
        })?;

        tracing::info!(product_id = %product.product_id, "Product submitted");
        self.reset();
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::client::{ApiRequest, ApiResponse, ClientError};

    struct Reject;

    #[async_trait]
    impl Transport for Reject {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ClientError> {
            Ok(ApiResponse {
                status: 409,
                body: br#"{"message":"Product already exists","errorCode":"conflict"}"#.to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let client = ApiClient::new(Reject);
        let mut form = AddProductForm::new();
        form.draft_mut().set_name("Samba");
        let before = form.draft().clone();

        let err = form.submit(&client).await.unwrap_err();

        assert!(matches!(err, SubmitError::Client(_)));
        assert_eq!(form.draft(), &before);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let client = ApiClient::new(Reject);
        let mut form = AddProductForm::new();

        let err = form.submit(&client).await.unwrap_err();
        assert!(matches!(err, SubmitError::Draft(DraftError::MissingName)));
    }
}
