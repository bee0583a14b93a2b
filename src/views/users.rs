use std::collections::HashSet;

use crate::auth::{login_cookie, logout_cookie, CurrentUser, PasswordHasher};
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::{AppError, AppResult, StoreError};
use crate::models::{ProfileForm, Relationships, SearchQuery, User};
use crate::repository::{commit_or_rollback, MessageRepository, UserRepository};
use crate::services::accounts;
use crate::templates::{self, ProfilePage, ProfileStats};
use crate::views::{html, redirect, session_user};
use actix_web::{web, HttpResponse};
use sea_orm::{DatabaseConnection, TransactionTrait};

/// A profile plus what the viewer needs to render follow and like buttons.
struct Profile {
    user: User,
    relationships: Relationships,
    viewer_following: HashSet<i32>,
    viewer_likes: HashSet<i32>,
}

impl Profile {
    async fn load(
        db: &DatabaseConnection,
        user_id: i32,
        current: Option<&CurrentUser>,
    ) -> AppResult<Self> {
        let repo = UserRepository::new(db);
        let user = repo.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        let relationships = repo.relationships(user.id).await?;

        let (viewer_following, viewer_likes) = match current {
            Some(current) => (
                following_ids(&repo, current.user_id).await?,
                repo.liked_message_ids(current.user_id).await?,
            ),
            None => (HashSet::new(), HashSet::new()),
        };

        Ok(Profile {
            user,
            relationships,
            viewer_following,
            viewer_likes,
        })
    }

    fn page<'a>(&'a self, current: Option<&'a CurrentUser>) -> ProfilePage<'a> {
        ProfilePage {
            user: &self.user,
            stats: ProfileStats {
                messages: self.relationships.messages.len(),
                following: self.relationships.following.len(),
                followers: self.relationships.followers.len(),
                likes: self.relationships.likes.len(),
            },
            current,
            viewer_following: &self.viewer_following,
            viewer_likes: &self.viewer_likes,
        }
    }
}

async fn following_ids(
    repo: &UserRepository<'_, DatabaseConnection>,
    user_id: i32,
) -> AppResult<HashSet<i32>> {
    Ok(repo
        .following(user_id)
        .await?
        .into_iter()
        .map(|user| user.id)
        .collect())
}

pub async fn list_users(
    query: web::Query<SearchQuery>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let repo = UserRepository::new(pool.get_ref());
    let search = query.q.as_deref();
    let users = repo.list(search).await?;

    let following = match &current {
        Some(current) => following_ids(&repo, current.user_id).await?,
        None => HashSet::new(),
    };

    Ok(html(templates::users_index(
        &users,
        search,
        current.as_ref(),
        &following,
    )))
}

pub async fn show_user(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let profile = Profile::load(pool.get_ref(), path.into_inner(), current.as_ref()).await?;
    let page = profile.page(current.as_ref());

    Ok(html(templates::user_detail(
        &page,
        &profile.relationships.messages,
    )))
}

pub async fn show_following(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        log::debug!("Anonymous request for following list");
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;

    let profile = Profile::load(pool.get_ref(), path.into_inner(), Some(&current)).await?;
    let page = profile.page(Some(&current));

    Ok(html(templates::user_list(
        &page,
        &profile.relationships.following,
    )))
}

pub async fn show_followers(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        log::debug!("Anonymous request for followers list");
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;

    let profile = Profile::load(pool.get_ref(), path.into_inner(), Some(&current)).await?;
    let page = profile.page(Some(&current));

    Ok(html(templates::user_list(
        &page,
        &profile.relationships.followers,
    )))
}

pub async fn show_likes(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;

    let profile = Profile::load(pool.get_ref(), path.into_inner(), Some(&current)).await?;
    let liked = MessageRepository::new(pool.get_ref())
        .liked_by(profile.user.id)
        .await?;
    let page = profile.page(Some(&current));

    Ok(html(templates::liked_messages(&page, &liked)))
}

pub async fn follow(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    let follower = session_user(&current, pool.get_ref()).await?;
    let follow_id = path.into_inner();

    if follow_id == follower.id {
        log::warn!("{} tried to follow themselves", follower);
        return Err(AppError::Forbidden);
    }

    let repo = UserRepository::new(pool.get_ref());
    let followed = repo.find_by_id(follow_id).await?.ok_or(AppError::NotFound)?;

    if repo.follow(follower.id, followed.id).await? {
        log::info!("{} now follows {}", follower, followed);
    }

    Ok(redirect(&format!("/users/{}/following", follower.id)))
}

pub async fn stop_following(
    path: web::Path<i32>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };
    session_user(&current, pool.get_ref()).await?;
    let follow_id = path.into_inner();

    if UserRepository::new(pool.get_ref())
        .unfollow(current.user_id, follow_id)
        .await?
    {
        log::info!("User #{} stopped following #{}", current.user_id, follow_id);
    }

    Ok(redirect(&format!("/users/{}/following", current.user_id)))
}

pub async fn edit_profile_form(
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };

    let user = session_user(&current, pool.get_ref()).await?;

    Ok(html(templates::edit_profile(&user, &current, None)))
}

pub async fn edit_profile(
    form: web::Form<ProfileForm>,
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    hasher: web::Data<PasswordHasher>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };

    let user = session_user(&current, pool.get_ref()).await?;
    let repo = UserRepository::new(pool.get_ref());

    let Some(user) =
        accounts::authenticate(&repo, hasher.get_ref(), &user.username, &form.password).await?
    else {
        return Ok(html(templates::edit_profile(
            &user,
            &current,
            Some("Wrong password, please try again."),
        )));
    };

    let Some(update) = form.to_update() else {
        return Ok(html(templates::edit_profile(
            &user,
            &current,
            Some("Username and email are required."),
        )));
    };

    let txn = pool.begin().await?;
    let result = UserRepository::new(&txn)
        .update_profile(user.clone(), update)
        .await;

    match commit_or_rollback(txn, result).await {
        Ok(updated) => {
            log::info!("Updated profile of {}", updated);
            let cookie = login_cookie(updated.id, &updated.username, &config.session)?;
            Ok(HttpResponse::Found()
                .append_header(("Location", format!("/users/{}", updated.id)))
                .cookie(cookie)
                .finish())
        }
        Err(StoreError::Integrity(detail)) => {
            log::info!("Profile update rejected by store: {}", detail);
            Ok(html(templates::edit_profile(
                &user,
                &current,
                Some("Username or email already taken"),
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_user(
    current: Option<CurrentUser>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let Some(current) = current else {
        return Ok(redirect("/"));
    };

    session_user(&current, pool.get_ref()).await?;

    let txn = pool.begin().await?;
    let result = UserRepository::new(&txn).delete(current.user_id).await;
    if commit_or_rollback(txn, result).await? {
        log::info!("Deleted user #{}", current.user_id);
    }

    Ok(HttpResponse::Found()
        .append_header(("Location", "/signup"))
        .cookie(logout_cookie())
        .finish())
}
