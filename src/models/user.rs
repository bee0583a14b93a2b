use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{message, user};

pub type User = user::Model;

/// A validated, hashed user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Everything derived from the follows, likes and messages tables for one user.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    pub messages: Vec<message::Model>,
    pub followers: Vec<User>,
    pub following: Vec<User>,
    pub likes: Vec<message::Model>,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub password: String,
}

impl ProfileForm {
    /// `None` when the username or email is blank.
    pub fn to_update(&self) -> Option<ProfileUpdate> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() {
            return None;
        }

        Some(ProfileUpdate {
            username: username.to_string(),
            email: email.to_string(),
            image_url: non_blank(&self.image_url),
            header_image_url: non_blank(&self.header_image_url),
            bio: non_blank(&self.bio),
            location: non_blank(&self.location),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchQuery {
    /// Substring of the username to match.
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            image_url: user.image_url,
            bio: user.bio,
            location: user.location,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub header_image_url: Option<String>,
    pub message_count: usize,
    pub followers: Vec<UserResponse>,
    pub following: Vec<UserResponse>,
    pub like_count: usize,
}

/// Treats missing, empty and whitespace-only form fields alike.
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
