//! Image request handler.

use crate::error::HttpAppError;
use crate::middleware::RequestId;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, Uri},
    response::Response,
    Extension,
};
use imgrelay_processing::ProcessingHeaders;
use std::sync::Arc;

const WIDTH: &str = "width";
const VIEWPORT_WIDTH: &str = "viewport-width";
const DPR: &str = "dpr";

pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let request_id = request_id.map(|Extension(id)| id.0).unwrap_or_default();

    // The escaped path keeps percent-encoded plain source URLs intact.
    let request = state
        .parser
        .parse(uri.path(), &processing_headers(&headers))
        .map_err(|err| {
            HttpAppError::new(err)
                .in_production(state.config.is_production())
                .with_request_id(request_id.clone())
        })?;

    tracing::info!(
        request_id = %request_id,
        source_url = %request.source_url,
        "Processing image request"
    );

    Ok(state.pipeline.process(request).await)
}

pub fn processing_headers(headers: &HeaderMap) -> ProcessingHeaders {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    ProcessingHeaders {
        accept: get(header::ACCEPT.as_str()),
        width: get(WIDTH),
        viewport_width: get(VIEWPORT_WIDTH),
        dpr: get(DPR),
    }
}
