use sea_orm::ConnectionTrait;

use crate::auth::PasswordHasher;
use crate::entities::user::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
use crate::errors::{SignupError, StoreError};
use crate::models::{non_blank, NewUser, User};
use crate::repository::UserRepository;

/// Hashes the password and builds a user ready to be inserted.
///
/// A blank username or email and an empty or missing password are rejected
/// before the hasher runs. Nothing is written here: duplicate usernames or
/// emails only show up when the caller inserts the result.
pub fn signup(
    username: &str,
    email: &str,
    password: Option<&str>,
    image_url: Option<&str>,
    hasher: &PasswordHasher,
) -> Result<NewUser, SignupError> {
    if username.trim().is_empty() || email.trim().is_empty() {
        return Err(SignupError::BlankIdentity);
    }

    let password = match password {
        Some(password) if !password.is_empty() => password,
        _ => return Err(SignupError::EmptyPassword),
    };

    let hashed = hasher.hash(password)?;
    let image_url = non_blank(&image_url.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

    Ok(NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: hashed,
        image_url,
        header_image_url: DEFAULT_HEADER_IMAGE_URL.to_string(),
    })
}

/// Looks the user up by exact username and checks the password.
///
/// `Ok(None)` covers both an unknown username and a wrong password; errors are
/// reserved for the store itself failing.
pub async fn authenticate<C: ConnectionTrait>(
    repo: &UserRepository<'_, C>,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user) = repo.find_by_username(username).await? else {
        log::debug!("Login attempt for unknown user {:?}", username);
        return Ok(None);
    };

    if hasher.verify(password, &user.password) {
        Ok(Some(user))
    } else {
        log::debug!("Wrong password for {}", user);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn signup_hashes_with_bcrypt() {
        let user = signup("testusername", "test@gmail.com", Some("testpass"), Some("http://www.test.com"), &hasher())
            .unwrap();

        assert_eq!(user.username, "testusername");
        assert_eq!(user.email, "test@gmail.com");
        assert!(user.password.starts_with("$2b$"));
        assert_ne!(user.password, "testpass");
        assert_eq!(user.image_url, "http://www.test.com");
    }

    #[test]
    fn signup_defaults_image_url() {
        let user = signup("u1", "u1@u1.com", Some("pw"), None, &hasher()).unwrap();
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);

        let user = signup("u1", "u1@u1.com", Some("pw"), Some(""), &hasher()).unwrap();
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);
    }

    #[test]
    fn signup_rejects_blank_username_or_email() {
        assert!(matches!(
            signup("   ", "test@gmail.com", Some("testpass"), None, &hasher()),
            Err(SignupError::BlankIdentity)
        ));
        assert!(matches!(
            signup("testusername", "", Some("testpass"), None, &hasher()),
            Err(SignupError::BlankIdentity)
        ));
    }

    #[test]
    fn signup_rejects_empty_or_missing_password() {
        assert!(matches!(
            signup("testusername", "test@gmail.com", Some(""), None, &hasher()),
            Err(SignupError::EmptyPassword)
        ));
        assert!(matches!(
            signup("testusername", "test@gmail.com", None, None, &hasher()),
            Err(SignupError::EmptyPassword)
        ));
    }
}
