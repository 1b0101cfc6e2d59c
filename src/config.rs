use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sms_twilio::TwilioConfig;
use sms_web_generic::{RelayProcessor, ResponseMode};
use std::env;

/// Variables the relay has always been configured with, mapped onto config keys.
const TWILIO_ENV: [(&str, &str); 4] = [
    ("TWILIO_ACCOUNT_SID", "twilio.account_sid"),
    ("TWILIO_AUTH_TOKEN", "twilio.auth_token"),
    ("TWILIO_FROM_NUMBER", "twilio.from_number"),
    ("TWILIO_BASE_URL", "twilio.base_url"),
];

/// Application configuration
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Twilio credentials and sender number
    pub twilio: TwilioConfig,
    /// Relay behaviour
    pub relay: RelayConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Server host (default: 0.0.0.0)
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

/// Relay configuration
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RelayConfig {
    /// Status mapping for provider replies: pass_through or gateway (default: pass_through)
    pub response_mode: ResponseMode,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level, used when RUST_LOG is unset (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Add configuration file based on environment
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local configuration file (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SMS_RELAY__)
            .add_source(Environment::with_prefix("SMS_RELAY").separator("__"));

        Self::build(builder, |name| env::var(name).ok())
    }

    /// The relay handler described by this configuration.
    pub fn processor(&self) -> RelayProcessor {
        RelayProcessor::new(self.twilio.clone()).with_mode(self.relay.response_mode)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder().add_source(Config::try_from(&AppConfig::default())?))
    }

    /// Applies the plain `TWILIO_*` variables on top of every other source.
    fn build(
        builder: ConfigBuilder<DefaultState>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        TWILIO_ENV
            .iter()
            .try_fold(builder, |builder, (name, key)| {
                builder.set_override_option(*key, lookup(name))
            })?
            .build()?
            .try_deserialize()
    }
}
