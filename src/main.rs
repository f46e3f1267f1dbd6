use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

mod config;
mod db;
mod error;
mod middleware;
#[cfg(test)]
mod mock_db;
mod models;
mod repository;
mod routes;
mod token;
mod views;

use config::Config;
use token::TokenService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Without a signing secret the process must not start.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = db::connect(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let store = Arc::new(db::MongoStore::new(&db));
    if let Err(e) = store.ensure_indexes().await {
        error!("Failed to create indexes: {}", e);
    }

    let tokens = Arc::new(TokenService::new(&config));
    let bind = config.bind_address();
    info!("Starting server on {}:{} ({})", bind.0, bind.1, config.environment);

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(web::Data::from(tokens.clone()))
            .wrap(middleware::IdentityMiddleware::new(tokens.clone()))
            .wrap(Logger::default())
            .configure(routes::configure(store.clone()))
    })
    .bind(bind)?
    .run()
    .await
}
