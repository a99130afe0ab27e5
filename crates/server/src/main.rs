mod api;
mod dto;
mod provider;
mod state;

use crate::{provider::OsrmProvider, state::AppState};
use axum::routing::{get, post};
use roadlog::{
    Planner,
    route::{CachedProvider, DistanceProvider, StaticDistanceTable},
};
use std::sync::Arc;
use tracing::{error, info};

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let args: Vec<_> = std::env::args().collect();
    let provider: Box<dyn DistanceProvider + Send + Sync> =
        match args.get(1).map(String::as_str) {
            Some("--osrm") => {
                info!("Using OSRM routing with Nominatim geocoding");
                Box::new(CachedProvider::new(OsrmProvider::new()))
            }
            Some(path) => {
                info!("Loading distance table from {path}");
                match StaticDistanceTable::from_csv_path(path) {
                    Ok(table) => Box::new(table),
                    Err(err) => {
                        error!("Failed to load distance table: {err}");
                        std::process::exit(1);
                    }
                }
            }
            None => {
                error!("Usage: roadlog-server <distance-table.csv | --osrm>");
                std::process::exit(1);
            }
        };

    let state = Arc::new(AppState::new(Planner::new(provider)));

    let app = axum::Router::new()
        .route("/plan", post(api::plan))
        .route("/trips", post(api::save_trip).get(api::list_trips))
        .route("/trips/{id}", get(api::get_trip).delete(api::delete_trip))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT))
        .await
        .unwrap();
    info!("Listening to port {PORT}");
    axum::serve(listener, app).await.unwrap();
}
