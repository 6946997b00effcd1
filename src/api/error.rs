use reqwest::StatusCode;

/// Ошибка обращения к АПИ каталога.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("send request")]
    Transport(#[from] reqwest::Error),

    #[error("got {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("json")]
    Json(#[from] serde_json::Error),
}
