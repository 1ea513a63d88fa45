//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::pipeline::DescribePipeline;
use crate::signature::HmacPathValidator;
use crate::state::AppState;
use anyhow::{Context, Result};
use imgrelay_core::Config;
use imgrelay_processing::RequestParser;
use std::sync::Arc;

/// Initialize telemetry, validate configuration and build the router.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()?;

    let state = build_state(config).context("Configuration validation failed")?;
    tracing::info!(
        presets = state.config.presets.len(),
        allow_insecure = state.config.allow_insecure,
        only_presets = state.config.only_presets,
        "Configuration loaded and validated successfully"
    );

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}

/// Build the shared state: request parser (with signature validation unless
/// insecure mode is on) and the describing pipeline.
pub fn build_state(config: Config) -> Result<Arc<AppState>> {
    config.validate()?;

    let config = Arc::new(config);
    let mut parser = RequestParser::new(config.clone());
    if !config.allow_insecure {
        parser = parser.with_path_validator(Arc::new(HmacPathValidator::from_config(&config)));
    }
    parser.validate_presets()?;

    let pipeline = Arc::new(DescribePipeline::new(parser.template().clone()));

    Ok(Arc::new(AppState::new(config, parser, pipeline)))
}
