use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id_newtype;

/// Максимальное количество изображений у одного товара.
pub const MAX_IMAGES: usize = 5;

/// MIME тип всех прикрепляемых изображений.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

id_newtype!(ProductId);
id_newtype!(VendorId);
id_newtype!(ImageId);

/// Валюта цены товара.
#[derive(
    Serialize,
    Deserialize,
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    enum_iterator::Sequence,
)]
pub enum Currency {
    #[default]
    #[serde(rename = "KRW")]
    #[display(fmt = "KRW")]
    Krw,

    #[serde(rename = "USD")]
    #[display(fmt = "USD")]
    Usd,
}

impl FromStr for Currency {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "KRW" => Ok(Self::Krw),
            "USD" => Ok(Self::Usd),
            _ => Err(CurrencyParseError(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown currency \"{0}\"")]
pub struct CurrencyParseError(String);

/// Изображение, прикреплённое к товару.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        IMAGE_MIME_TYPE
    }
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type())
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Черновик товара.
/// Хранит значения ровно в том виде, в котором их ввёл пользователь.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftProduct {
    pub name: String,
    pub description: String,
    pub price_text: String,

    /// Пустая строка означает отсутствие скидки.
    pub discounted_price_text: String,

    /// Пустая строка означает что остаток не указан.
    pub stock_text: String,

    pub currency: Currency,
    pub images: Vec<ImageAttachment>,
}

impl DraftProduct {
    /// Прикрепляет изображение к черновику.
    /// Возвращает изображение обратно, если лимит уже исчерпан.
    pub fn attach(&mut self, image: ImageAttachment) -> Result<(), ImageAttachment> {
        if self.images.len() >= MAX_IMAGES {
            return Err(image);
        }

        self.images.push(image);

        Ok(())
    }
}

/// Запрос на регистрацию товара.
/// Изображения заимствуются у черновика без копирования.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCreateRequest<'a> {
    pub fields: ProductFields,
    pub images: &'a [ImageAttachment],
}

/// Запрос на изменение товара. Изображения API менять не позволяет.
pub type ProductEditRequest = ProductFields;

/// Провалидированные поля товара.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: Currency,
    pub discounted_price: Option<Decimal>,
    pub stock: Option<u64>,
    pub secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is empty")]
    EmptyName,

    #[error("description is empty")]
    EmptyDescription,

    #[error("price is not a non-negative number")]
    InvalidPrice,

    #[error("discounted price is not a non-negative number")]
    InvalidDiscountedPrice,

    #[error("stock is not a non-negative integer")]
    InvalidStock,

    #[error("no images attached")]
    NoImages,

    #[error("more than {} images attached", MAX_IMAGES)]
    TooManyImages,
}
