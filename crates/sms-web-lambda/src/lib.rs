//! Serverless adapter for the SMS relay handler.
//!
//! Accepts the API Gateway (REST, payload v1) event shape that Netlify
//! functions also receive, and answers with the matching proxy response.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sms_core::{HttpStatus, RelayResponse};
use sms_web_generic::{RelayProcessor, RelayRequest, ResponseConverter};
use tracing::warn;

/// Inbound proxy event. Fields the relay does not read are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Lambda-specific response converter
pub struct LambdaResponseConverter;

impl ResponseConverter for LambdaResponseConverter {
    type ResponseType = ApiGatewayResponse;

    fn from_relay_response(response: RelayResponse) -> Self::ResponseType {
        ApiGatewayResponse {
            status_code: response.status,
            headers: HashMap::from([("Content-Type".to_string(), response.content_type)]),
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

/// Run one event through the processor. Never fails.
pub async fn handle_event(processor: &RelayProcessor, event: HttpEvent) -> ApiGatewayResponse {
    let body = match decode_body(&event) {
        Ok(body) => body,
        Err(message) => {
            warn!(%message, "undecodable event body");
            return LambdaResponseConverter::from_relay_response(RelayResponse::json(
                HttpStatus::InternalServerError,
                &json!({ "success": false, "message": message }),
            ));
        }
    };

    let response = processor
        .process(RelayRequest::new(&event.http_method, body.as_deref()))
        .await;
    LambdaResponseConverter::from_relay_response(response)
}

fn decode_body(event: &HttpEvent) -> Result<Option<String>, String> {
    match &event.body {
        Some(body) if event.is_base64_encoded => {
            let bytes = STANDARD
                .decode(body)
                .map_err(|e| format!("invalid base64 body: {e}"))?;
            String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| format!("body is not UTF-8: {e}"))
        }
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use sms_twilio::TwilioConfig;

    fn processor() -> RelayProcessor {
        RelayProcessor::new(TwilioConfig::default())
    }

    fn body_of(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn parses_netlify_event() {
        let event: HttpEvent = serde_json::from_value(json!({
            "httpMethod": "POST",
            "path": "/.netlify/functions/send-otp",
            "headers": { "content-type": "application/json" },
            "body": "{\"phone\":\"9876543210\"}",
            "isBase64Encoded": false
        }))
        .unwrap();
        assert_eq!(event.http_method, "POST");
        assert_eq!(event.body.as_deref(), Some("{\"phone\":\"9876543210\"}"));
    }

    #[tokio::test]
    async fn non_post_event_is_405() {
        let event = HttpEvent {
            http_method: "GET".into(),
            ..Default::default()
        };
        let response = handle_event(&processor(), event).await;
        assert_eq!(response.status_code, 405);
        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(body_of(&response)["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn base64_body_is_decoded() {
        let event = HttpEvent {
            http_method: "POST".into(),
            body: Some(STANDARD.encode(r#"{"phone":"9876543210","message":"hi"}"#)),
            is_base64_encoded: true,
        };
        let response = handle_event(&processor(), event).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(body_of(&response)["message"], "Twilio not configured");
    }

    #[tokio::test]
    async fn bad_base64_is_internal_error() {
        let event = HttpEvent {
            http_method: "POST".into(),
            body: Some("***".into()),
            is_base64_encoded: true,
        };
        let response = handle_event(&processor(), event).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(body_of(&response)["success"], false);
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = LambdaResponseConverter::from_relay_response(RelayResponse::json(
            200u16,
            &json!({ "success": true }),
        ));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["isBase64Encoded"], false);
    }
}
