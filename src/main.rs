use actix_web::{middleware::Logger, web, App, HttpServer};

use warbler::auth::PasswordHasher;
use warbler::config::Config;
use warbler::db::create_pool;
use warbler::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    log::info!("Starting server on {}", config.bind_address());
    let pool = create_pool(&config)
        .await
        .expect("Failed to connect to the database");

    log::info!("Database connection established");

    let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
    let bind_address = config.bind_address();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(hasher))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
