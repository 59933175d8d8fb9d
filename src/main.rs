mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use api::AppState;
use config::Settings;
use network::HttpChainFetcher;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings = Settings::from_env();
    let host = settings.host.clone();
    let port = settings.port;

    println!("⛓️ Starting ledger node at http://{host}:{port}");

    let fetcher = Arc::new(HttpChainFetcher::new(settings.peer_timeout));
    let state = web::Data::new(AppState::new(&settings, fetcher));
    info!(
        "node id {} (difficulty={}, peer timeout={:?})",
        state.node_id, settings.difficulty, settings.peer_timeout
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
