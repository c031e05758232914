use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

use crate::response::ApiError;

/// Prometheus text exposition of the default registry.
pub async fn metrics_handler() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(ApiError::internal)?;
    let content_type = encoder.format_type().to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], buffer).into_response())
}
