use crate::config::Config;
use crate::entities::{follows, likes, message, user};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &Config) -> Result<DbPool, anyhow::Error> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    create_schema(&db).await?;

    Ok(db)
}

/// Creates the tables from the entity definitions. Parents come before the
/// edge tables that reference them.
pub async fn create_schema(db: &DbPool) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = [
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(message::Entity),
        schema.create_table_from_entity(follows::Entity),
        schema.create_table_from_entity(likes::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    log::debug!("Schema ready on {:?}", backend);
    Ok(())
}
