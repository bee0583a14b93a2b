use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::auth::logout_cookie;
use crate::templates;

/// Input rejected by `signup` before anything touches the store.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("username and email must not be blank")]
    BlankIdentity,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique or foreign key constraint rejected the write.
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::Integrity(detail),
            _ => StoreError::Db(err),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("message text must not be empty")]
    Empty,
    #[error("message text is limited to {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("page not found")]
    NotFound,
    #[error("access unauthorized")]
    Forbidden,
    /// Signed session for a user that no longer exists.
    #[error("session user #{0} no longer exists")]
    StaleSession(i32),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Signup(#[from] SignupError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Store(err.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::StaleSession(_) => StatusCode::FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // the visitor is logged out, not failed
        if let AppError::StaleSession(user_id) = self {
            log::warn!("Session points at missing user #{}", user_id);
            return HttpResponse::Found()
                .append_header(("Location", "/"))
                .cookie(logout_cookie())
                .finish();
        }

        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {:?}", self);
        }

        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(templates::error_page(status))
    }
}

pub type AppResult<T> = Result<T, AppError>;
