//! CardioScope prediction service.
//!
//! Loads the trained model artifact and serves it over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin cardioscope
//! ```
//!
//! # Environment Variables
//!
//! - `CARDIOSCOPE_ADDR`: listen address (default: 0.0.0.0:8000)
//! - `CARDIOSCOPE_ARTIFACT`: path to the model artifact
//! - `CARDIOSCOPE_CORS_ORIGINS`: comma-separated allowed frontend origins
//! - `RUST_LOG`: logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cardioscope::api::{build_cors_layer, create_app, ServiceState};
use cardioscope::model::artifact;

#[derive(Parser, Debug)]
#[command(name = "cardioscope")]
#[command(about = "Heart-failure survival prediction service")]
#[command(version)]
struct CliArgs {
    /// Listen address for the HTTP server
    #[arg(long, env = "CARDIOSCOPE_ADDR", default_value = "0.0.0.0:8000")]
    addr: String,

    /// Path to the trained model artifact
    #[arg(
        long,
        env = "CARDIOSCOPE_ARTIFACT",
        default_value = "model/heart_failure_model.json"
    )]
    artifact: PathBuf,

    /// Comma-separated list of allowed CORS origins
    #[arg(
        long,
        env = "CARDIOSCOPE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://localhost:3000"
    )]
    cors_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let estimator = artifact::load_from_disk(&args.artifact).with_context(|| {
        format!(
            "failed to load model artifact from {} (run the train binary first)",
            args.artifact.display()
        )
    })?;
    info!(family = %estimator.family, "Serving model");

    let state = ServiceState::new(estimator);
    let app = create_app(state, build_cors_layer(&args.cors_origins));

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.addr))?;
    info!("HTTP server listening on {}", args.addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server exited with an error")?;
    Ok(())
}
