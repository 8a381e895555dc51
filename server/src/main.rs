mod config;
mod db;
mod error;
mod handlers;
mod league;
mod models;
mod scheduler;
mod services;
mod validation;

use config::Config;
use db::Db;
use ntex::web;
use ntex_cors::Cors;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::from_env());
    let db = Arc::new(Db::open(&config.database_path).map_err(std::io::Error::other)?);

    if config.commit_check_secs > 0 {
        ntex::rt::spawn(scheduler::run_commit_loop(
            db.clone(),
            Duration::from_secs(config.commit_check_secs),
        ));
    }

    tracing::info!(host = %config.host, port = config.port, "Smash league server starting");

    let bind = format!("{}:{}", config.host, config.port);
    web::HttpServer::new(move || {
        web::App::new()
            .state(db.clone())
            .state(config.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            // Health check
            .route("/api/health", web::get().to(health))
            // Players
            .route("/api/players", web::post().to(handlers::players::register_player))
            .route("/api/players/{player_id}", web::get().to(handlers::players::get_player))
            // Leagues
            .route("/api/leagues", web::post().to(handlers::league::create_league))
            .route("/api/leagues/{league_id}", web::get().to(handlers::league::get_league))
            .route("/api/leagues/{league_id}/results", web::post().to(handlers::league::report_results))
            .route("/api/leagues/{league_id}/commit", web::post().to(handlers::league::commit_week))
            .route("/api/leagues/{league_id}/ignored", web::get().to(handlers::league::get_ignored_matches))
            .route(
                "/api/leagues/{league_id}/players/{player_id}",
                web::get().to(handlers::league::get_player_standing),
            )
    })
    .bind(bind)?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
