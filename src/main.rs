//! Cazimi service - Entry Point

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cazimi::ephemeris::init_ephemeris;
use cazimi::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env();

    tracing::info!(
        auth = config.api_key.is_some(),
        ephe_path = config.ephe_path.as_deref().unwrap_or("<moshier>"),
        "starting cazimi"
    );

    // Initialize Swiss Ephemeris
    init_ephemeris(config.ephe_path.as_deref());

    cazimi::serve(config).await
}
