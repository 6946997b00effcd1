use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Currency, ImageId, ProductFields, ProductId, VendorId};

/// Товар в том виде, в котором его отдаёт список каталога.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub vendor_id: VendorId,
    pub name: String,
    pub thumbnail: String,
    pub currency: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Цена с учётом скидки.
    #[serde(with = "rust_decimal::serde::float")]
    pub bargain_price: Decimal,

    /// Размер скидки. Ноль, если скидки нет.
    #[serde(with = "rust_decimal::serde::float")]
    pub discounted_price: Decimal,

    pub stock: u64,
    pub created_at: NaiveDateTime,
    pub issued_at: NaiveDateTime,
}

impl ProductSummary {
    pub fn has_discount(&self) -> bool {
        !self.discounted_price.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub summary: ProductSummary,
    pub description: String,
    pub images: Vec<ImageData>,
    pub vendors: Vendor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageData {
    pub id: ImageId,
    pub url: String,
    pub thumbnail_url: String,
    pub succeed: bool,
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub issued_at: Option<NaiveDateTime>,
}

/// Страница списка товаров.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPage {
    pub page_no: u32,
    pub items_per_page: u32,
    pub total_count: u32,
    pub offset: u32,
    pub limit: u32,
    pub last_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub pages: Vec<ProductSummary>,
}

/// JSON часть запроса на регистрацию или изменение товара.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductParams<'a> {
    pub name: &'a str,
    pub descriptions: &'a str,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub currency: Currency,

    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discounted_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,

    pub secret: &'a str,
}

impl<'a> From<&'a ProductFields> for ProductParams<'a> {
    fn from(value: &'a ProductFields) -> Self {
        Self {
            name: &value.name,
            descriptions: &value.description,
            price: value.price,
            currency: value.currency,
            discounted_price: value.discounted_price,
            stock: value.stock,
            secret: &value.secret,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecretRequest<'a> {
    pub secret: &'a str,
}
