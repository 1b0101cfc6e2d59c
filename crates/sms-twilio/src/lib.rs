//! # Twilio
//!
//! Minimal client for the Twilio Messages API.
//!
//! One form-encoded `POST` to `/2010-04-01/Accounts/{sid}/Messages.json`,
//! authenticated with HTTP Basic credentials built from the account SID and
//! auth token. Whatever the provider answers is handed back as a
//! [`ProviderReply`]; only transport failures are errors.
//!
//! ```rust,ignore
//! use sms_core::SendRequest;
//! use sms_twilio::{TwilioClient, TwilioConfig};
//!
//! let config = TwilioConfig::from_parts("AC123", "secret", "+15005550006");
//! let client = TwilioClient::new(config.credentials().unwrap());
//! let reply = client.deliver(SendRequest {
//!     to: "+919876543210",
//!     from: "+15005550006",
//!     text: "Your code is 123456",
//! }).await?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sms_core::{ProviderReply, SendRequest, SmsError};
use tracing::{debug, warn};
use url::Url;

/// HTTP client used for provider calls; share one to pool connections.
pub use reqwest::Client as HttpClient;

const API_VERSION: &str = "2010-04-01";

/// Default Twilio API host.
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Twilio settings as they come out of configuration. Any field may be missing.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: Option<String>,
    /// Twilio Auth Token
    pub auth_token: Option<String>,
    /// Sender number every message goes out from
    pub from_number: Option<String>,
    /// API host override (default: https://api.twilio.com)
    pub base_url: Option<String>,
}

impl TwilioConfig {
    pub fn from_parts<S: Into<String>>(account_sid: S, auth_token: S, from_number: S) -> Self {
        Self {
            account_sid: Some(account_sid.into()),
            auth_token: Some(auth_token.into()),
            from_number: Some(from_number.into()),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The complete credential set, or `None` if any value is missing or empty.
    pub fn credentials(&self) -> Option<TwilioCredentials> {
        fn present(value: &Option<String>) -> Option<String> {
            value.as_deref().filter(|v| !v.is_empty()).map(str::to_owned)
        }

        Some(TwilioCredentials {
            account_sid: present(&self.account_sid)?,
            auth_token: present(&self.auth_token)?,
            from_number: present(&self.from_number)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

/// A complete set of Twilio credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// Twilio REST client.
#[derive(Clone, Debug)]
pub struct TwilioClient {
    credentials: TwilioCredentials,
    /// API base URL; override for testing/mocking.
    pub base_url: String,
    http: HttpClient,
}

impl TwilioClient {
    pub fn new(credentials: TwilioCredentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(credentials: TwilioCredentials, base_url: String) -> Self {
        Self {
            credentials,
            base_url,
            http: HttpClient::new(),
        }
    }

    /// Reuse an existing connection pool.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn credentials(&self) -> &TwilioCredentials {
        &self.credentials
    }

    /// `{base_url}/2010-04-01/Accounts/{sid}/Messages.json`
    pub fn messages_url(&self) -> Result<Url, SmsError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SmsError::Invalid(format!("base url {:?}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SmsError::Invalid(format!("base url {:?} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend([
                API_VERSION,
                "Accounts",
                self.credentials.account_sid.as_str(),
                "Messages.json",
            ]);
        Ok(url)
    }

    /// Send one message and return whatever Twilio answered.
    pub async fn deliver(&self, req: SendRequest<'_>) -> Result<ProviderReply, SmsError> {
        let url = self.messages_url()?;
        debug!(%url, "posting message to twilio");

        let form = [("To", req.to), ("From", req.from), ("Body", req.text)];
        let res = self
            .http
            .post(url)
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "twilio request failed");
                SmsError::Http(e.to_string())
            })?;

        let status = res.status().as_u16();
        // An unreadable body is treated like an empty one.
        let text = res.text().await.ok();
        Ok(ProviderReply::from_text(status, text))
    }
}
