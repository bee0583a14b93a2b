pub mod auth;
pub mod home;
pub mod messages;
pub mod users;

use crate::auth::CurrentUser;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::repository::UserRepository;
use actix_web::HttpResponse;
use sea_orm::DatabaseConnection;

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", location))
        .finish()
}

/// Loads the user behind a signed session. A session for a deleted user
/// fails with `AppError::StaleSession`, which logs the visitor out.
pub(crate) async fn session_user(
    current: &CurrentUser,
    db: &DatabaseConnection,
) -> AppResult<User> {
    UserRepository::new(db)
        .find_by_id(current.user_id)
        .await?
        .ok_or(AppError::StaleSession(current.user_id))
}
