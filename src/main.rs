use actix_web::{App, HttpServer, web};
use log::info;

mod config;
mod controllers;
mod errors;
mod models;
mod services;
mod state;

use config::Config;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let state = web::Data::new(AppState::new().expect("Failed to create HTTP client"));

    info!("Server is live at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(services::health::health_check))
            .route(
                "/api/debug-check",
                web::get().to(controllers::debug::debug_check),
            )
            .route(
                "/api/domains/check",
                web::post().to(controllers::check::check_domain),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
