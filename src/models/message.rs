use serde::Deserialize;

use crate::entities::{message, user};
use crate::errors::MessageError;

pub const MAX_MESSAGE_LEN: usize = 140;

pub type Message = message::Model;

/// A message together with the user who wrote it.
pub type AuthoredMessage = (message::Model, user::Model);

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    pub text: String,
}

pub fn validate_text(text: &str) -> Result<String, MessageError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MessageError::Empty);
    }
    if text.chars().count() > MAX_MESSAGE_LEN {
        return Err(MessageError::TooLong {
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(text.to_string())
}
