pub mod follows;
pub mod likes;
pub mod message;
pub mod user;
