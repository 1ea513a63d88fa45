use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgrelay_core::{ErrorMetadata, LogLevel, ParseError, RequestError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub code: String,
}

#[derive(Debug)]
pub struct HttpAppError {
    pub error: RequestError,
    production: bool,
    request_id: Option<String>,
}

impl HttpAppError {
    pub fn new(error: RequestError) -> Self {
        Self {
            error,
            production: false,
            request_id: None,
        }
    }

    /// Hide details and error types regardless of the error kind.
    pub fn in_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Client-facing body. Sensitive errors never carry their cause.
    pub fn to_error_response(&self) -> ErrorResponse {
        let error = &self.error;
        let include_details = !self.production && !error.is_sensitive();

        ErrorResponse {
            error: error.client_message(),
            details: include_details.then(|| error.detailed_message()),
            error_type: include_details.then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
        }
    }

    fn log(&self) {
        let error = &self.error;
        let error_type = error.error_type();
        let request_id = self.request_id.as_deref().unwrap_or_default();
        match error.log_level() {
            LogLevel::Debug => {
                tracing::debug!(
                    request_id = %request_id,
                    error = %error,
                    error_type = error_type,
                    "Rejected image request"
                );
            }
            LogLevel::Warn => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %error,
                    error_type = error_type,
                    "Rejected image request"
                );
            }
            LogLevel::Error => {
                tracing::error!(
                    request_id = %request_id,
                    error = %error,
                    error_type = error_type,
                    "Rejected image request"
                );
            }
        }
    }
}

impl From<RequestError> for HttpAppError {
    fn from(err: RequestError) -> Self {
        HttpAppError::new(err)
    }
}

impl From<ParseError> for HttpAppError {
    fn from(err: ParseError) -> Self {
        HttpAppError::new(RequestError::InvalidUrl(err))
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        self.log();

        (status, Json(self.to_error_response())).into_response()
    }
}
