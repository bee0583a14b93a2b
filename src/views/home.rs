use crate::auth::{logout_cookie, CurrentUser};
use crate::db::DbPool;
use crate::errors::{AppError, AppResult};
use crate::repository::{MessageRepository, UserRepository};
use crate::templates;
use crate::views::{html, session_user};
use actix_web::{web, HttpResponse};

const TIMELINE_LIMIT: u64 = 100;

/// Landing page for visitors, timeline for logged-in users.
pub async fn homepage(
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(html(templates::home_anon()));
    };

    let user = match session_user(&current, pool.get_ref()).await {
        Ok(user) => user,
        // already on the landing page, so no redirect
        Err(AppError::StaleSession(user_id)) => {
            log::warn!("Session points at missing user #{}", user_id);
            return Ok(HttpResponse::Ok()
                .cookie(logout_cookie())
                .content_type("text/html; charset=utf-8")
                .body(templates::home_anon()));
        }
        Err(e) => return Err(e),
    };

    let users = UserRepository::new(pool.get_ref());
    let timeline = MessageRepository::new(pool.get_ref())
        .timeline(user.id, TIMELINE_LIMIT)
        .await?;
    let liked = users.liked_message_ids(user.id).await?;

    Ok(html(templates::home(&current, &user, &timeline, &liked)))
}
