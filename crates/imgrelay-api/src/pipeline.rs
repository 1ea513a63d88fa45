//! Downstream processing of parsed image requests.

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgrelay_processing::{ImageRequest, OptionsDiff, ProcessingOptions};
use serde::Serialize;

/// Receives every successfully parsed request.
#[async_trait]
pub trait ImagePipeline: Send + Sync {
    async fn process(&self, request: ImageRequest) -> Response;
}

#[derive(Debug, Serialize)]
pub struct RequestDescription {
    pub source_url: String,
    pub options: OptionsDiff,
}

/// Answers with a JSON description of the parsed request instead of an image.
pub struct DescribePipeline {
    template: ProcessingOptions,
}

impl DescribePipeline {
    pub fn new(template: ProcessingOptions) -> Self {
        Self { template }
    }

    pub fn describe(&self, request: &ImageRequest) -> RequestDescription {
        RequestDescription {
            source_url: request.source_url.clone(),
            options: OptionsDiff::between(&self.template, &request.options),
        }
    }
}

#[async_trait]
impl ImagePipeline for DescribePipeline {
    async fn process(&self, request: ImageRequest) -> Response {
        (StatusCode::OK, Json(self.describe(&request))).into_response()
    }
}
