use std::{net::SocketAddr, sync::Arc};

use tokio::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
use config::Config;
mod engine;
use engine::{LeafEngine, PalmEngine};
mod error;
mod knowledge;
mod model;
use model::Model;
mod quality;
mod routes;
use routes::AppState;
mod scoring;
mod utils;
use utils::ensure_files_exist;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    ensure_files_exist(&[&config.leaf_model, &config.palm_model]).await?;

    let leaf_model = Model::new(&config.leaf_model.path, &config.input_op, &config.output_op)?;
    let palm_model = Model::new(&config.palm_model.path, &config.input_op, &config.output_op)?;

    let shared_state = Arc::new(Mutex::new(AppState {
        leaf: LeafEngine::new(Box::new(leaf_model)),
        palm: PalmEngine::new(Box::new(palm_model)),
        min_images: config.min_images,
    }));

    let app = routes::router(shared_state, config.body_limit_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("leaf_advisor=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
