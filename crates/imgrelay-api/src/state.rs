//! Application state shared by all handlers.

use crate::pipeline::ImagePipeline;
use imgrelay_core::Config;
use imgrelay_processing::RequestParser;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<Config>,
    pub parser: RequestParser,
    pub pipeline: Arc<dyn ImagePipeline>,
}

impl AppState {
    pub fn new(config: Arc<Config>, parser: RequestParser, pipeline: Arc<dyn ImagePipeline>) -> Self {
        Self {
            config,
            parser,
            pipeline,
        }
    }
}
