use std::str::FromStr;

use rust_decimal::Decimal;

use crate::model::{
    DraftProduct, ProductCreateRequest, ProductEditRequest, ProductFields, ValidationError,
    MAX_IMAGES,
};

/// Проверяет черновики товаров и собирает из них запросы к API.
#[derive(Debug, Clone)]
pub struct SubmissionBuilder {
    /// Секрет продавца. Передаётся в запрос как есть.
    secret: String,
}

impl SubmissionBuilder {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Собирает запрос на регистрацию товара.
    ///
    /// Поля проверяются в порядке: название, описание, цена, цена со скидкой,
    /// остаток, изображения. Возвращается первая найденная ошибка.
    pub fn validate<'a>(&self, draft: &'a DraftProduct) -> Result<ProductCreateRequest<'a>, ValidationError> {
        let fields = self.fields(draft)?;

        match draft.images.len() {
            0 => return Err(ValidationError::NoImages),
            n if n > MAX_IMAGES => return Err(ValidationError::TooManyImages),
            _ => {}
        }

        Ok(ProductCreateRequest {
            fields,
            images: &draft.images,
        })
    }

    /// Собирает запрос на изменение товара. Изображения не проверяются.
    pub fn validate_edit(&self, draft: &DraftProduct) -> Result<ProductEditRequest, ValidationError> {
        self.fields(draft)
    }

    fn fields(&self, draft: &DraftProduct) -> Result<ProductFields, ValidationError> {
        if is_blank(&draft.name) {
            return Err(ValidationError::EmptyName);
        }

        if is_blank(&draft.description) {
            return Err(ValidationError::EmptyDescription);
        }

        let price = parse_amount(&draft.price_text).ok_or(ValidationError::InvalidPrice)?;

        let discounted_price = optional(
            &draft.discounted_price_text,
            parse_amount,
            ValidationError::InvalidDiscountedPrice,
        )?;

        let stock = optional(
            &draft.stock_text,
            |s| u64::from_str(s).ok(),
            ValidationError::InvalidStock,
        )?;

        Ok(ProductFields {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price,
            currency: draft.currency,
            discounted_price,
            stock,
            secret: self.secret.clone(),
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Разбирает неотрицательную десятичную сумму.
fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .ok()
        .filter(|amount| !amount.is_sign_negative() || amount.is_zero())
}

/// Пустая строка означает отсутствие значения.
fn optional<T>(
    text: &str,
    parse: impl Fn(&str) -> Option<T>,
    err: ValidationError,
) -> Result<Option<T>, ValidationError> {
    if text.is_empty() {
        return Ok(None);
    }

    parse(text).map(Some).ok_or(err)
}
