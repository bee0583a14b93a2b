use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Cookie holding the signed current-user key.
pub const CURR_USER_KEY: &str = "curr_user";

/// Payload signed into the `curr_user` cookie.
#[derive(Debug, Serialize, Deserialize)]
struct SessionKey {
    sub: i32,
    username: String,
    exp: i64,
    iat: i64,
}

/// Builds the cookie that logs `user_id` in.
pub fn login_cookie(
    user_id: i32,
    username: &str,
    config: &SessionConfig,
) -> Result<Cookie<'static>, anyhow::Error> {
    let now = Utc::now();
    let key = SessionKey {
        sub: user_id,
        username: username.to_string(),
        exp: (now + Duration::hours(config.expiration_hours)).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &key,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(Cookie::build(CURR_USER_KEY, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(config.expiration_hours))
        .finish())
}

/// Checks the signature and expiry of a `curr_user` value and returns the
/// user id and username it carries.
pub fn read_session(value: &str, secret: &str) -> Result<(i32, String), anyhow::Error> {
    let data = decode::<SessionKey>(
        value,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok((data.claims.sub, data.claims.username))
}

pub fn logout_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(CURR_USER_KEY, "").path("/").finish();
    cookie.make_removal();
    cookie
}
