use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Адрес АПИ каталога.
    pub base_url: String,

    /// Идентификатор продавца, отправляется в заголовке `identifier`.
    pub identifier: String,

    /// Секрет продавца, нужен для изменения и удаления товаров.
    pub secret: String,

    /// Размер стороны квадрата, в который вписываются изображения.
    pub image_size: u32,

    /// Количество товаров на одной странице списка.
    pub items_per_page: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://market-training.yagom-academy.kr".to_owned(),
            identifier: String::new(),
            secret: String::new(),
            image_size: 100,
            items_per_page: 20,
        }
    }
}

/// Загружает конфигурацию.
/// Если файла нет, он будет создан со значениями по умолчанию.
pub fn load(path: PathBuf) -> anyhow::Result<Config> {
    let mut cfg: Config = confy::load_path(path)?;

    normalize(&mut cfg)?;

    Ok(cfg)
}

pub fn normalize(cfg: &mut Config) -> Result<(), ConfigError> {
    cfg.base_url = cfg.base_url.trim().trim_end_matches('/').to_owned();

    if cfg.base_url.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }

    if cfg.image_size == 0 {
        return Err(ConfigError::ZeroImageSize);
    }

    if cfg.items_per_page == 0 {
        return Err(ConfigError::ZeroItemsPerPage);
    }

    Ok(())
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base_url is empty")]
    EmptyBaseUrl,

    #[error("image_size should be positive")]
    ZeroImageSize,

    #[error("items_per_page should be positive")]
    ZeroItemsPerPage,
}
