use crate::auth::{read_session, CURR_USER_KEY};
use crate::config::Config;
use actix_web::{web, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// The logged-in user, taken from the session cookie. Handlers that also
/// serve anonymous visitors take `Option<CurrentUser>`.
///
/// Only the signature is checked here; `views::session_user` confirms the
/// user still exists.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let (Some(cookie), Some(config)) = (
            req.cookie(CURR_USER_KEY),
            req.app_data::<web::Data<Config>>(),
        ) else {
            return ready(Err(actix_web::error::ErrorUnauthorized("Not logged in")));
        };

        match read_session(cookie.value(), &config.session.secret) {
            Ok((user_id, username)) => ready(Ok(CurrentUser { user_id, username })),
            Err(e) => {
                log::debug!("Rejected session cookie: {:?}", e);
                ready(Err(actix_web::error::ErrorUnauthorized("Invalid session")))
            }
        }
    }
}
