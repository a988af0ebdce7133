use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::render;

pub const MSG_CONNECTION: &str = "خطأ في الاتصال بقاعدة البيانات";
pub const MSG_GENERIC: &str = "حدث خطأ غير متوقع";

#[derive(Debug, Error)]
pub enum AppError {
    /// The data gateway was never configured.
    #[error("Gateway not configured: {0}")]
    Config(String),

    /// A lookup returned no rows. Carries the user-facing message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity is already linked. Carries the user-facing message.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Remote data API error: {0}")]
    Remote(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Remote(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Localised text shown in the alert box.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::NotFound(msg) | AppError::Duplicate(msg) | AppError::BadRequest(msg) => msg,
            AppError::Config(_) => MSG_CONNECTION,
            AppError::Remote(_) | AppError::Database(_) => MSG_GENERIC,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => error!("database error: {}", e),
            AppError::Remote(e) => error!("remote data API error: {}", e),
            AppError::Config(e) => error!("gateway unavailable: {}", e),
            _ => {}
        }

        let status = self.status();
        let body = render::layout::alert_page(self.user_message(), "/");
        (status, Html(body)).into_response()
    }
}
