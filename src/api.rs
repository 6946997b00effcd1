mod client;
mod error;
pub(crate) mod models;

pub use client::MarketClient;
pub use error::HttpError;
pub use models::{ProductDetails, ProductPage, ProductSummary};

use crate::model::{ProductCreateRequest, ProductEditRequest, ProductId};

/// Операции над товарами каталога.
pub trait ProductCatalog {
    fn fetch_product(&self, id: ProductId) -> Result<ProductDetails, HttpError>;

    fn create_product(&self, request: &ProductCreateRequest<'_>) -> Result<ProductSummary, HttpError>;

    fn update_product(
        &self,
        id: ProductId,
        request: &ProductEditRequest,
    ) -> Result<ProductSummary, HttpError>;

    fn delete_product(&self, id: ProductId, secret: &str) -> Result<(), HttpError>;
}
