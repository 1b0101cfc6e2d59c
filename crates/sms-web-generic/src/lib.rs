//! Framework-agnostic SMS relay handler.
//!
//! [`RelayProcessor::process`] takes one inbound request (method plus optional
//! JSON body), validates it, checks the injected Twilio configuration,
//! normalizes the destination, performs a single Twilio call and translates the
//! outcome into a [`RelayResponse`]. Every failure becomes a structured JSON
//! response; nothing escapes to the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sms_core::{normalize_phone, HttpStatus, ProviderReply, RelayResponse, SendRequest, SmsError};
use sms_twilio::{HttpClient, TwilioClient, TwilioConfig};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// How provider replies map onto the relay's own HTTP status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// 2xx becomes 200 with the provider status in the body; failures mirror
    /// the provider status when it lies in 200..=599, otherwise 502.
    #[default]
    PassThrough,
    /// 2xx becomes 200, anything else 502.
    Gateway,
}

/// One inbound invocation.
#[derive(Debug, Clone, Copy)]
pub struct RelayRequest<'a> {
    pub method: &'a str,
    pub body: Option<&'a str>,
}

impl<'a> RelayRequest<'a> {
    pub fn new(method: &'a str, body: Option<&'a str>) -> Self {
        Self { method, body }
    }

    pub fn post(body: &'a str) -> Self {
        Self::new("POST", Some(body))
    }
}

/// Reasons an invocation ends before a provider reply exists.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("phone and message required")]
    MissingFields,
    #[error("Twilio not configured")]
    NotConfigured,
    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("{0}")]
    Transport(#[from] SmsError),
}

impl RelayError {
    pub fn status(&self) -> HttpStatus {
        match self {
            RelayError::MethodNotAllowed => HttpStatus::MethodNotAllowed,
            RelayError::MissingFields => HttpStatus::BadRequest,
            RelayError::NotConfigured
            | RelayError::MalformedBody(_)
            | RelayError::Transport(_) => HttpStatus::InternalServerError,
        }
    }

    /// Caller-facing message.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            "Internal error".to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Serialize)]
struct RelayBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

const PROVIDER_FAILURE: &str = "Twilio API error";

/// The SMS relay handler.
#[derive(Clone, Debug)]
pub struct RelayProcessor {
    twilio: TwilioConfig,
    mode: ResponseMode,
    http: HttpClient,
}

impl RelayProcessor {
    pub fn new(twilio: TwilioConfig) -> Self {
        Self {
            twilio,
            mode: ResponseMode::default(),
            http: HttpClient::new(),
        }
    }

    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    /// Handle one invocation and return a host-agnostic response
    pub async fn process(&self, request: RelayRequest<'_>) -> RelayResponse {
        let span = info_span!("relay", method = request.method);
        async move {
            match self.relay(request).await {
                Ok(reply) => self.reply_to_response(reply),
                Err(e) => self.error_to_response(e),
            }
        }
        .instrument(span)
        .await
    }

    async fn relay(&self, request: RelayRequest<'_>) -> Result<ProviderReply, RelayError> {
        if request.method != "POST" {
            return Err(RelayError::MethodNotAllowed);
        }

        let body: Value = match request.body {
            Some(text) if !text.is_empty() => serde_json::from_str(text)?,
            _ => Value::Object(Default::default()),
        };

        let (Some(phone), Some(message)) = (field_text(&body, "phone"), field_text(&body, "message"))
        else {
            return Err(RelayError::MissingFields);
        };

        let credentials = self.twilio.credentials().ok_or(RelayError::NotConfigured)?;

        let to = normalize_phone(&phone);
        debug!(to = %to.masked(), "normalized destination");

        let client = TwilioClient::with_base_url(credentials, self.twilio.base_url().to_string())
            .with_http_client(self.http.clone());
        let reply = client
            .deliver(SendRequest {
                to: to.as_str(),
                from: &client.credentials().from_number,
                text: &message,
            })
            .await?;
        Ok(reply)
    }

    fn reply_to_response(&self, reply: ProviderReply) -> RelayResponse {
        let success = reply.is_success();
        if success {
            info!(status = reply.status, "twilio accepted message");
        } else {
            warn!(status = reply.status, "twilio rejected message");
        }

        let status = match (self.mode, success) {
            (_, true) => HttpStatus::Ok.as_u16(),
            (ResponseMode::Gateway, false) => HttpStatus::BadGateway.as_u16(),
            (ResponseMode::PassThrough, false) if (200..=599).contains(&reply.status) => {
                reply.status
            }
            (ResponseMode::PassThrough, false) => HttpStatus::BadGateway.as_u16(),
        };

        let body = RelayBody {
            success,
            status: match self.mode {
                ResponseMode::PassThrough => Some(reply.status),
                ResponseMode::Gateway => None,
            },
            message: (!success).then(|| PROVIDER_FAILURE.to_string()),
            data: reply.data,
        };
        RelayResponse::json(status, &body)
    }

    fn error_to_response(&self, error: RelayError) -> RelayResponse {
        match &error {
            RelayError::MethodNotAllowed | RelayError::MissingFields => {
                warn!(reason = %error, "rejected request")
            }
            RelayError::NotConfigured => error!("twilio credentials missing from configuration"),
            RelayError::MalformedBody(e) => warn!(error = %e, "request body is not valid JSON"),
            RelayError::Transport(e) => error!(error = %e, "could not reach twilio"),
        }

        let body = RelayBody {
            success: false,
            status: None,
            message: Some(error.message()),
            data: None,
        };
        RelayResponse::json(error.status(), &body)
    }
}

/// Reads a field the way a truthiness check would: empty strings, zero,
/// `false`, `null`, arrays and objects count as missing.
fn field_text(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Integral floats print without a fraction, so `9876543210.0` reads as
/// `9876543210` just like an integer literal would.
fn number_text(n: &serde_json::Number) -> String {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

/// Helper trait for host adapters to convert responses
pub trait ResponseConverter {
    type ResponseType;

    fn from_relay_response(response: RelayResponse) -> Self::ResponseType;
}
