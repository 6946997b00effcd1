use std::{fs, path::PathBuf};

use anyhow::Context;
use enum_iterator::all;
use inquire::{validator::Validation, Select, Text};
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::{
    api::{HttpError, ProductCatalog, ProductDetails, ProductSummary},
    model::{
        Currency, CurrencyParseError, DraftProduct, ProductEditRequest, ProductId, ValidationError,
    },
    submission::SubmissionBuilder,
    thumbnail::ImageResizer,
};

/// Поля товара, переданные в командной строке.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// Размер скидки. Пустое значение убирает скидку,
    /// при изменении товара на сервер уходит 0.
    #[arg(long)]
    pub discounted_price: Option<String>,

    /// Пустое значение означает что остаток не указан.
    /// При изменении товара стёртый остаток отправляется как 0.
    #[arg(long)]
    pub stock: Option<String>,

    #[arg(long)]
    pub currency: Option<Currency>,
}

/// Чем закончилась работа с формой товара.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Registered(ProductSummary),
    Updated(ProductSummary),

    /// Пользователь ничего не поменял, запрос не отправлялся.
    Unchanged,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid product")]
    Invalid(#[from] ValidationError),

    #[error("catalog request failed")]
    Http(#[from] HttpError),

    #[error("product has unsupported currency")]
    UnsupportedCurrency(#[from] CurrencyParseError),
}

/// Собирает черновик нового товара.
/// Недостающие обязательные поля запрашиваются у пользователя.
pub fn new_draft(
    args: &ProductArgs,
    images: &[PathBuf],
    resizer: &impl ImageResizer,
) -> anyhow::Result<DraftProduct> {
    let mut draft = DraftProduct {
        name: value_or_prompt(&args.name, "Название товара")?,
        description: value_or_prompt(&args.description, "Описание товара")?,
        price_text: value_or_prompt(&args.price, "Цена")?,
        discounted_price_text: args.discounted_price.clone().unwrap_or_default(),
        stock_text: args.stock.clone().unwrap_or_default(),
        currency: match args.currency {
            Some(c) => c,
            None => Select::new("Валюта", all::<Currency>().collect()).prompt()?,
        },
        images: Vec::with_capacity(images.len()),
    };

    for path in images {
        let bytes = fs::read(path).with_context(|| format!("read image {:?}", path))?;

        let Some(image) = resizer.resize(&path.to_string_lossy(), &bytes) else {
            warn!("Изображение {:?} пропущено", path);
            continue;
        };

        if let Err(image) = draft.attach(image) {
            warn!("Изображение {} не добавлено: превышен лимит", image.file_name);
        }
    }

    Ok(draft)
}

/// Черновик с текущими значениями товара.
pub fn draft_from_details(details: &ProductDetails) -> Result<DraftProduct, CurrencyParseError> {
    let summary = &details.summary;

    let discounted_price_text = if summary.has_discount() {
        summary.discounted_price.normalize().to_string()
    } else {
        String::new()
    };

    Ok(DraftProduct {
        name: summary.name.clone(),
        description: details.description.clone(),
        price_text: summary.price.normalize().to_string(),
        discounted_price_text,
        stock_text: summary.stock.to_string(),
        currency: summary.currency.parse()?,
        images: Vec::new(),
    })
}

/// Переносит в черновик только те поля, которые были переданы.
pub fn apply_overrides(draft: &mut DraftProduct, args: &ProductArgs) {
    if let Some(v) = &args.name {
        draft.name = v.clone();
    }
    if let Some(v) = &args.description {
        draft.description = v.clone();
    }
    if let Some(v) = &args.price {
        draft.price_text = v.clone();
    }
    if let Some(v) = &args.discounted_price {
        draft.discounted_price_text = v.clone();
    }
    if let Some(v) = &args.stock {
        draft.stock_text = v.clone();
    }
    if let Some(v) = args.currency {
        draft.currency = v;
    }
}

/// Регистрирует новый товар.
pub fn register(
    catalog: &impl ProductCatalog,
    builder: &SubmissionBuilder,
    draft: &DraftProduct,
) -> Result<FormOutcome, SubmitError> {
    let request = builder.validate(draft)?;

    let summary = catalog.create_product(&request)?;

    debug!("Товар зарегистрирован с id {}", summary.id);

    Ok(FormOutcome::Registered(summary))
}

/// Изменяет существующий товар.
pub fn edit(
    catalog: &impl ProductCatalog,
    builder: &SubmissionBuilder,
    id: ProductId,
    args: &ProductArgs,
) -> Result<FormOutcome, SubmitError> {
    let details = catalog.fetch_product(id)?;

    let current = draft_from_details(&details)?;

    let mut draft = current.clone();
    apply_overrides(&mut draft, args);

    if draft == current {
        debug!("Товар {} не изменился", id);
        return Ok(FormOutcome::Unchanged);
    }

    let mut request = builder.validate_edit(&draft)?;
    keep_cleared_fields(&current, &mut request);

    // Сравниваются разобранные значения: "12.50" и "12.5" одна и та же цена.
    if builder.validate_edit(&current).ok().as_ref() == Some(&request) {
        debug!("Товар {} не изменился", id);
        return Ok(FormOutcome::Unchanged);
    }

    let summary = catalog.update_product(id, &request)?;

    Ok(FormOutcome::Updated(summary))
}

/// Отсутствующее поле сервер оставляет как было, поэтому стёртые
/// скидка и остаток отправляются явным нулём.
fn keep_cleared_fields(current: &DraftProduct, request: &mut ProductEditRequest) {
    if request.discounted_price.is_none() && !current.discounted_price_text.is_empty() {
        request.discounted_price = Some(Decimal::ZERO);
    }
    if request.stock.is_none() && !current.stock_text.is_empty() {
        request.stock = Some(0);
    }
}

fn value_or_prompt(value: &Option<String>, title: &str) -> anyhow::Result<String> {
    if let Some(v) = value {
        return Ok(v.clone());
    }

    let val = Text::new(title)
        .with_validator(|s: &str| {
            if s.trim().is_empty() {
                return Ok(Validation::Invalid("required".into()));
            };
            Ok(Validation::Valid)
        })
        .prompt()?;

    Ok(val)
}
