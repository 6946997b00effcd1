use rust_decimal::Decimal;

use crate::{
    api::{ProductDetails, ProductPage, ProductSummary},
    model::{ValidationError, MAX_IMAGES},
};

/// Сообщение для пользователя о том, что не так с черновиком.
pub fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyName => "Введите название товара".to_owned(),
        ValidationError::EmptyDescription => "Введите описание товара".to_owned(),
        ValidationError::InvalidPrice => "Цена должна быть неотрицательным числом".to_owned(),
        ValidationError::InvalidDiscountedPrice => {
            "Скидка должна быть неотрицательным числом".to_owned()
        }
        ValidationError::InvalidStock => {
            "Остаток должен быть неотрицательным целым числом".to_owned()
        }
        ValidationError::NoImages => "Добавьте хотя бы одно изображение".to_owned(),
        ValidationError::TooManyImages => {
            format!("Можно добавить не более {} изображений", MAX_IMAGES)
        }
    }
}

/// Одна строка в списке товаров.
pub fn render_summary(product: &ProductSummary) -> String {
    format!(
        "#{:<6} {}  |  {}  |  {}",
        product.id,
        product.name,
        price_label(product),
        stock_label(product.stock)
    )
}

pub fn render_page(page: &ProductPage) -> Vec<String> {
    let mut lines: Vec<String> = page.pages.iter().map(render_summary).collect();

    lines.push(format!(
        "Страница {} из {}, всего товаров: {}",
        page.page_no, page.last_page, page.total_count
    ));

    lines
}

pub fn render_details(product: &ProductDetails) -> Vec<String> {
    let summary = &product.summary;

    let mut lines = vec![
        format!("{} (#{})", summary.name, summary.id),
        format!("Продавец: {}", product.vendors.name),
        format!("Цена: {}", price_label(summary)),
        format!("Наличие: {}", stock_label(summary.stock)),
        String::new(),
        product.description.clone(),
    ];

    if !product.images.is_empty() {
        lines.push(String::new());
        lines.extend(product.images.iter().map(|i| i.url.clone()));
    }

    lines
}

fn price_label(product: &ProductSummary) -> String {
    let price = format!("{} {}", product.currency, format_amount(product.price));

    if !product.has_discount() {
        return price;
    }

    format!(
        "{} -> {} {}",
        price,
        product.currency,
        format_amount(product.bargain_price)
    )
}

fn stock_label(stock: u64) -> String {
    if stock == 0 {
        return "нет в наличии".to_owned();
    }

    format!("остаток: {}", stock)
}

/// Форматирует сумму с разделителями разрядов.
fn format_amount(amount: Decimal) -> String {
    let text = amount.normalize().to_string();

    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    let (int_part, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
