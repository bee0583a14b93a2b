use crate::auth::{login_cookie, logout_cookie, PasswordHasher};
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::{AppResult, SignupError, StoreError};
use crate::models::{LoginForm, SignupForm};
use crate::repository::{commit_or_rollback, UserRepository};
use crate::services::accounts;
use crate::templates;
use crate::views::html;
use actix_web::{web, HttpResponse};
use sea_orm::TransactionTrait;

pub async fn signup_form() -> HttpResponse {
    html(templates::signup_page(None))
}

pub async fn signup(
    form: web::Form<SignupForm>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    hasher: web::Data<PasswordHasher>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let new_user = match accounts::signup(
        form.username.trim(),
        form.email.trim(),
        form.password.as_deref(),
        form.image_url.as_deref(),
        hasher.get_ref(),
    ) {
        Ok(new_user) => new_user,
        Err(SignupError::BlankIdentity) => {
            return Ok(html(templates::signup_page(Some(
                "Username and email are required.",
            ))));
        }
        Err(SignupError::EmptyPassword) => {
            return Ok(html(templates::signup_page(Some("Password is required."))));
        }
        Err(e) => return Err(e.into()),
    };

    let txn = pool.begin().await?;
    let result = UserRepository::new(&txn).insert(new_user).await;

    match commit_or_rollback(txn, result).await {
        Ok(user) => {
            let cookie = login_cookie(user.id, &user.username, &config.session)?;
            Ok(HttpResponse::Found()
                .append_header(("Location", "/"))
                .cookie(cookie)
                .finish())
        }
        Err(StoreError::Integrity(detail)) => {
            log::info!("Signup rejected by store: {}", detail);
            Ok(html(templates::signup_page(Some(
                "Username or email already taken",
            ))))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form() -> HttpResponse {
    html(templates::login_page(None))
}

pub async fn login(
    form: web::Form<LoginForm>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    hasher: web::Data<PasswordHasher>,
) -> AppResult<HttpResponse> {
    let repo = UserRepository::new(pool.get_ref());

    match accounts::authenticate(&repo, hasher.get_ref(), &form.username, &form.password).await? {
        Some(user) => {
            log::info!("Hello, {}!", user.username);
            let cookie = login_cookie(user.id, &user.username, &config.session)?;
            Ok(HttpResponse::Found()
                .append_header(("Location", "/"))
                .cookie(cookie)
                .finish())
        }
        None => Ok(html(templates::login_page(Some("Invalid credentials.")))),
    }
}

pub async fn logout() -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", "/login"))
        .cookie(logout_cookie())
        .finish()
}
