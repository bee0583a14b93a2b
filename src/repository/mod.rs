pub mod messages;
pub mod users;

pub use messages::MessageRepository;
pub use users::UserRepository;

use sea_orm::{DatabaseTransaction, DbErr};

/// Commits `txn` when `result` is `Ok`, rolls it back otherwise, and hands
/// `result` back unchanged.
pub async fn commit_or_rollback<T, E>(txn: DatabaseTransaction, result: Result<T, E>) -> Result<T, E>
where
    E: From<DbErr>,
{
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}
