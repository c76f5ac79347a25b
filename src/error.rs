use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{models::EntityKind, validation::ValidationErrors};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid id: '{0}'")]
    InvalidId(String),
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("{0} not found")]
    ParentNotFound(EntityKind),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migration(_)
            | AppError::InvalidData(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) | AppError::ParentNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Storage-side failures the caller cannot correct.
    pub fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(errors) => json!({
                "success": false,
                "message": self.to_string(),
                "error": errors,
            }),
            err if err.is_internal() => {
                error!("request failed: {err:?}");
                if cfg!(debug_assertions) {
                    json!({
                        "success": false,
                        "message": "Internal server error",
                        "error": err.to_string(),
                    })
                } else {
                    json!({
                        "success": false,
                        "message": "Internal server error",
                    })
                }
            }
            err => json!({
                "success": false,
                "message": err.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
