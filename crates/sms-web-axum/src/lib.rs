use std::sync::Arc;

use axum::{
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use bytes::Bytes;
use serde_json::json;
use sms_core::{HttpStatus, RelayResponse};
use sms_web_generic::{RelayProcessor, RelayRequest, ResponseConverter};

/// Path the handler is served on.
pub const SEND_PATH: &str = "/send-otp";
/// Same handler under the path Netlify-hosted clients already call.
pub const NETLIFY_PATH: &str = "/.netlify/functions/send-otp";

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<RelayProcessor>,
}

impl AppState {
    pub fn new(processor: RelayProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}

/// Axum-specific response converter
pub struct AxumResponseConverter;

impl ResponseConverter for AxumResponseConverter {
    type ResponseType = Response;

    fn from_relay_response(response: RelayResponse) -> Self::ResponseType {
        let status =
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, response.content_type)],
            response.body,
        )
            .into_response()
    }
}

fn failure(status: impl Into<u16>, message: String) -> Response {
    AxumResponseConverter::from_relay_response(RelayResponse::json(
        status,
        &json!({ "success": false, "message": message }),
    ))
}

/// Relay handler for every method; the processor answers non-POST with 405.
///
/// Bodies over the configured limit and bodies that are not UTF-8 are
/// answered here with the same JSON failure shape the processor uses.
pub async fn send_sms(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return failure(rejection.status().as_u16(), rejection.body_text()),
    };
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(e) => {
            return failure(
                HttpStatus::InternalServerError,
                format!("body is not UTF-8: {e}"),
            )
        }
    };
    let body = (!text.is_empty()).then_some(text);
    let response = state
        .processor
        .process(RelayRequest::new(method.as_str(), body))
        .await;
    AxumResponseConverter::from_relay_response(response)
}

pub fn router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route(SEND_PATH, any(send_sms))
        .route(NETLIFY_PATH, any(send_sms))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}
