use std::env;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

/// Byte length the token symmetric key must have (ChaCha20-Poly1305).
pub const SYMMETRIC_KEY_LEN: usize = 32;

const DEFAULT_TOKEN_DURATION_MINUTES: i64 = 60;
const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {0} has an invalid value: {1}")]
    InvalidVar(&'static str, String),

    #[error("TOKEN_SYMMETRIC_KEY must be exactly {SYMMETRIC_KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),
}

/// Process configuration, built once at startup and passed by reference
/// into every service constructor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub token_symmetric_key: String,
    pub token_duration: Duration,
    pub listen_address: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub chat_api_url: String,
    pub chat_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let token_symmetric_key = env::var("TOKEN_SYMMETRIC_KEY")
            .map_err(|_| ConfigError::MissingVar("TOKEN_SYMMETRIC_KEY"))?;
        if token_symmetric_key.len() != SYMMETRIC_KEY_LEN {
            return Err(ConfigError::InvalidKeyLength(token_symmetric_key.len()));
        }

        let token_duration = match env::var("TOKEN_DURATION_MINUTES") {
            Ok(raw) => {
                let minutes: i64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidVar("TOKEN_DURATION_MINUTES", raw.clone()))?;
                Duration::minutes(minutes)
            }
            Err(_) => Duration::minutes(DEFAULT_TOKEN_DURATION_MINUTES),
        };

        let listen_address = env::var("LISTEN_ADDRESS").unwrap_or_else(|_| {
            warn!("LISTEN_ADDRESS not set, using {}", DEFAULT_LISTEN_ADDRESS);
            DEFAULT_LISTEN_ADDRESS.to_string()
        });

        // Payment and chat credentials are optional: those endpoints report
        // their own configuration errors when used without credentials.
        let payment_key_id = env::var("PAYMENT_KEY_ID").unwrap_or_default();
        let payment_key_secret = env::var("PAYMENT_KEY_SECRET").unwrap_or_default();
        let chat_api_url = env::var("CHAT_API_URL").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
                .to_string()
        });
        let chat_api_key = env::var("CHAT_API_KEY").unwrap_or_default();

        Ok(Self {
            database_url,
            token_symmetric_key,
            token_duration,
            listen_address,
            payment_key_id,
            payment_key_secret,
            chat_api_url,
            chat_api_key,
        })
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.payment_key_id.is_empty() && !self.payment_key_secret.is_empty()
    }

    pub fn is_chat_configured(&self) -> bool {
        !self.chat_api_key.is_empty()
    }
}
