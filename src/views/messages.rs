use std::collections::HashSet;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{validate_text, MessageForm};
use crate::repository::{MessageRepository, UserRepository};
use crate::templates;
use crate::views::{html, redirect, session_user};
use actix_web::{web, HttpResponse};

pub async fn new_message_form(
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;

    Ok(html(templates::new_message(&current, None)))
}

pub async fn create_message(
    form: web::Form<MessageForm>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    let author = session_user(&current, pool.get_ref()).await?;

    let text = match validate_text(&form.text) {
        Ok(text) => text,
        Err(e) => {
            let error = e.to_string();
            return Ok(html(templates::new_message(&current, Some(&error))));
        }
    };

    let message = MessageRepository::new(pool.get_ref())
        .create(author.id, text)
        .await?;
    log::info!("{} posted message #{}", author, message.id);

    Ok(redirect(&format!("/users/{}", author.id)))
}

pub async fn show_message(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let entry = MessageRepository::new(pool.get_ref())
        .find(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    let liked = match &current {
        Some(current) => {
            UserRepository::new(pool.get_ref())
                .liked_message_ids(current.user_id)
                .await?
        }
        None => HashSet::new(),
    };

    Ok(html(templates::message_detail(&entry, current.as_ref(), &liked)))
}

pub async fn delete_message(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;

    let repo = MessageRepository::new(pool.get_ref());
    let (message, author) = repo
        .find(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    if author.id != current.user_id {
        log::warn!(
            "User #{} tried to delete message #{} owned by #{}",
            current.user_id,
            message.id,
            author.id
        );
        return Err(AppError::Forbidden);
    }

    repo.delete(message.id).await?;
    log::info!("Deleted message #{}", message.id);

    Ok(redirect(&format!("/users/{}", current.user_id)))
}

/// Users cannot like their own messages.
pub async fn toggle_like(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;

    let repo = MessageRepository::new(pool.get_ref());
    let (message, author) = repo
        .find(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    if author.id == current.user_id {
        return Err(AppError::Forbidden);
    }

    let liked = repo.toggle_like(current.user_id, message.id).await?;
    log::info!(
        "User #{} {} message #{}",
        current.user_id,
        if liked { "liked" } else { "unliked" },
        message.id
    );

    Ok(redirect("/"))
}
