use crate::db::DbPool;
use crate::models::{ProfileResponse, SearchQuery, UserResponse};
use crate::repository::UserRepository;
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("q" = Option<String>, Query, description = "Only users whose username contains this")
    ),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>)
    ),
    tag = "users"
)]
pub async fn list_users(
    query: web::Query<SearchQuery>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let users = UserRepository::new(pool.get_ref())
        .list(query.q.as_deref())
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile with relationship counts", body = ProfileResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let repo = UserRepository::new(pool.get_ref());
    let user_id = path.into_inner();

    let user = match repo
        .find_by_id(user_id)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?
    {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "error": "User not found"
            })));
        }
    };

    let relationships = repo
        .relationships(user.id)
        .await
        .map_err(|e| {
            log::error!("Database error loading relationships of {}: {:?}", user, e);
            actix_web::error::ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        header_image_url: user.header_image_url.clone(),
        message_count: relationships.messages.len(),
        followers: relationships
            .followers
            .into_iter()
            .map(UserResponse::from)
            .collect(),
        following: relationships
            .following
            .into_iter()
            .map(UserResponse::from)
            .collect(),
        like_count: relationships.likes.len(),
        user: user.into(),
    }))
}
