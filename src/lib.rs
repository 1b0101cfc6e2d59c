//! # SMS Relay
//!
//! A serverless SMS relay: accept `{ phone, message }`, normalize the phone
//! number and forward the message to Twilio, returning Twilio's answer.
//!
//! ## Features
//!
//! - **One handler, two hosts**: serve it with Axum or run it as a Lambda/Netlify-style function
//! - **Injected configuration**: the handler never reads the environment itself
//! - **Structured failures**: every error becomes a JSON response with a meaningful status
//! - **Layered configuration**: defaults, config files and environment variables
//! - **Observability**: structured logging via `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sms_relay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let processor = config.processor();
//!
//!     let response = processor
//!         .process(RelayRequest::post(r#"{"phone":"9876543210","message":"Your code is 123456"}"#))
//!         .await;
//!
//!     println!("{} {}", response.status, response.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! The original `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` and
//! `TWILIO_FROM_NUMBER` variables are honoured, alongside `config/*.toml` files
//! and `SMS_RELAY__SECTION__KEY` overrides:
//!
//! ```rust,ignore
//! use sms_relay::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("Listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod config;
pub mod logging;

pub use crate::config::*;

/// Common imports for SMS Relay usage
pub mod prelude {
    pub use crate::config::{AppConfig, LoggingConfig, RelayConfig, ServerConfig};
    pub use sms_core::*;
    pub use sms_twilio::{TwilioClient, TwilioConfig, TwilioCredentials};
    pub use sms_web_generic::{RelayError, RelayProcessor, RelayRequest, ResponseMode};
}
