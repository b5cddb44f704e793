use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use model::ModelError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

use crate::views;

/// Errors a request handler can end with.
///
/// Expected outcomes (failed logins, unauthorized access, duplicate
/// usernames) are not errors; handlers turn them into flashes and redirects.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                warn!("{} not found", what);
                (StatusCode::NOT_FOUND, Html(views::errors::not_found_page())).into_response()
            }
            AppError::Forbidden(reason) => {
                warn!("Forbidden: {}", reason);
                (StatusCode::FORBIDDEN, Html(views::errors::forbidden_page())).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::errors::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
