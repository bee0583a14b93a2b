pub mod message;
pub mod user;

pub use message::*;
pub use user::*;
