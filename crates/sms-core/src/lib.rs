//! # SMS Core
//!
//! Core traits and types shared by the sms-relay crates.
//!
//! This crate provides the building blocks for relaying an SMS:
//! - [`SendRequest`] naming the destination, sender and text of one SMS
//! - [`ProviderReply`] carrying the provider's status and best-effort body
//! - [`RelayResponse`], a framework-agnostic HTTP response
//! - [`normalize_phone`] for the crude E.164-like destination rewrite
//!
//! ## Example
//!
//! ```rust
//! use sms_core::{normalize_phone, SendRequest};
//!
//! let to = normalize_phone("98765 43210");
//! let request = SendRequest {
//!     to: to.as_str(),
//!     from: "+15005550006",
//!     text: "Your code is 123456",
//! };
//! assert_eq!(request.to, "+919876543210");
//! ```

mod phone;

pub use phone::{normalize_phone, NormalizedPhone, DEFAULT_COUNTRY_CODE};

use serde::{Deserialize, Serialize};

/// Errors that can occur during SMS operations
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// HTTP communication error
    #[error("http error: {0}")]
    Http(String),
    /// Invalid request parameters
    #[error("invalid request: {0}")]
    Invalid(String),
}

/// HTTP status codes the relay produces on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Ok = 200,
    BadRequest = 400,
    MethodNotAllowed = 405,
    InternalServerError = 500,
    BadGateway = 502,
}

impl HttpStatus {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl From<HttpStatus> for u16 {
    fn from(status: HttpStatus) -> Self {
        status.as_u16()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest<'a> {
    pub to: &'a str,
    pub from: &'a str,
    pub text: &'a str,
}

/// What the provider answered, whatever the status.
///
/// `data` is the body parsed as JSON when possible, otherwise the raw text as a
/// JSON string, otherwise `None` when the body was empty or unreadable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub data: Option<serde_json::Value>,
}

impl ProviderReply {
    /// Builds a reply from a status and the raw response text.
    pub fn from_text(status: u16, text: Option<String>) -> Self {
        let data = match text {
            Some(text) if !text.is_empty() => Some(
                serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)),
            ),
            _ => None,
        };
        Self { status, data }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Generic response that can be converted to any host's response type
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl RelayResponse {
    pub fn json<T: Serialize>(status: impl Into<u16>, payload: &T) -> Self {
        Self {
            status: status.into(),
            body: serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string()),
            content_type: "application/json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_prefers_json() {
        let reply = ProviderReply::from_text(201, Some(r#"{"sid":"SM123"}"#.into()));
        assert_eq!(reply.data, Some(json!({ "sid": "SM123" })));
        assert!(reply.is_success());
    }

    #[test]
    fn reply_falls_back_to_text_then_nothing() {
        let text = ProviderReply::from_text(503, Some("Service Unavailable".into()));
        assert_eq!(text.data, Some(json!("Service Unavailable")));
        assert!(!text.is_success());

        assert_eq!(ProviderReply::from_text(500, Some(String::new())).data, None);
        assert_eq!(ProviderReply::from_text(500, None).data, None);
    }

    #[test]
    fn relay_response_is_json() {
        let response = RelayResponse::json(HttpStatus::BadGateway, &json!({ "success": false }));
        assert_eq!(response.status, 502);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body, r#"{"success":false}"#);
    }
}
