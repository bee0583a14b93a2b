// Shared setup for the integration tests. Every test gets its own in-memory
// SQLite store, so tests never see each other's rows.
#![allow(dead_code)]

use actix_web::{cookie::Cookie, dev::ServiceResponse, test, web, App};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use warbler::{
    auth::{login_cookie, PasswordHasher},
    config::{AuthConfig, Config, DatabaseConfig, ServerConfig, SessionConfig},
    db::{create_pool, DbPool},
    entities::{follows, user},
    models::User,
    repository::UserRepository,
    routes,
    services::accounts,
};

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        session: SessionConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
        },
        database: DatabaseConfig {
            // one connection: each sqlite in-memory connection is its own database
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig { bcrypt_cost: 4 },
    }
}

pub fn hasher() -> PasswordHasher {
    PasswordHasher::new(test_config().auth.bcrypt_cost)
}

pub async fn test_db() -> DbPool {
    create_pool(&test_config())
        .await
        .expect("Failed to create test database")
}

/// Helper function to create a test app
pub fn create_test_app(
    pool: DbPool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let config = test_config();

    App::new()
        .app_data(web::Data::new(hasher()))
        .app_data(web::Data::new(config))
        .app_data(web::Data::new(pool))
        .configure(routes::configure)
}

/// Inserts a user through `signup`, the way the signup page does.
pub async fn signup_user(db: &DbPool, username: &str, email: &str, password: &str) -> User {
    let new_user = accounts::signup(username, email, Some(password), None, &hasher())
        .expect("signup should accept a non-empty password");
    UserRepository::new(db)
        .insert(new_user)
        .await
        .expect("Failed to insert user")
}

/// Inserts a user directly, skipping validation and hashing.
pub async fn insert_raw_user(db: &DbPool, username: &str, email: &str) -> User {
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password: Set(format!("{username}pw")),
        image_url: Set(Some(format!("www.{username}.com"))),
        header_image_url: Set(Some(format!("www.{username}header.com"))),
        bio: Set(Some(format!("{username}bio"))),
        location: Set(Some(format!("{username}location"))),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

/// Writes a follows edge straight into the store: `follower` follows `followed`.
pub async fn add_follow(db: &DbPool, follower: &User, followed: &User) {
    follows::Entity::insert(follows::ActiveModel {
        user_being_followed_id: Set(followed.id),
        user_following_id: Set(follower.id),
    })
    .exec_without_returning(db)
    .await
    .expect("Failed to insert follow");
}

/// Equivalent of putting the user's id under the current-user key.
pub fn session_for(user: &User) -> Cookie<'static> {
    login_cookie(user.id, &user.username, &test_config().session)
        .expect("Failed to sign session cookie")
}

pub async fn body_text(resp: ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).expect("Body should be UTF-8")
}

pub fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn user_count(db: &DbPool) -> usize {
    user::Entity::find()
        .all(db)
        .await
        .expect("Failed to count users")
        .len()
}
