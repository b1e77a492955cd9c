mod api;
mod app;
mod classifier;
mod config;
mod domain;
mod infrastructure;
mod text;
mod web_content;

use anyhow::Result;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let app = app::SentinelApp::initialize(config)?;
    app.run().await
}
