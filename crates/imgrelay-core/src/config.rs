//! Configuration module
//!
//! Service configuration is read once from the environment at startup and then
//! shared read-only (behind an `Arc`) by every request handler.

use std::env;

use crate::presets::Presets;

const SERVER_PORT: u16 = 8080;
const DEFAULT_QUALITY: u8 = 80;
const SIGNATURE_SIZE: usize = 32;
const MAX_CLIENTS: usize = 1024;

/// Service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Prefix prepended to every decoded source URL
    pub base_url: String,
    /// Default output quality (1-100)
    pub quality: u8,
    pub presets: Presets,
    /// Skip signature validation entirely
    pub allow_insecure: bool,
    /// Restrict processing URLs to the presets-only grammar
    pub only_presets: bool,
    pub enable_client_hints: bool,
    pub enable_webp_detection: bool,
    pub enforce_webp: bool,
    /// HMAC key, decoded from hex
    pub key: Vec<u8>,
    /// HMAC salt, decoded from hex
    pub salt: Vec<u8>,
    /// Number of HMAC bytes kept in URL signatures
    pub signature_size: usize,
    /// Requests served concurrently before new ones wait
    pub max_clients: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            base_url: String::new(),
            quality: DEFAULT_QUALITY,
            presets: Presets::default(),
            allow_insecure: false,
            only_presets: false,
            enable_client_hints: false,
            enable_webp_detection: false,
            enforce_webp: false,
            key: Vec::new(),
            salt: Vec::new(),
            signature_size: SIGNATURE_SIZE,
            max_clients: MAX_CLIENTS,
        }
    }
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let presets = match env::var("IMGRELAY_PRESETS") {
            Ok(raw) => Presets::parse(raw.split(','))?,
            Err(_) => Presets::default(),
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            base_url: env::var("IMGRELAY_BASE_URL").unwrap_or_default(),
            quality: env::var("IMGRELAY_QUALITY")
                .unwrap_or_else(|_| DEFAULT_QUALITY.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("IMGRELAY_QUALITY must be a number between 1 and 100"))?,
            presets,
            allow_insecure: env_flag("IMGRELAY_ALLOW_INSECURE", false),
            only_presets: env_flag("IMGRELAY_ONLY_PRESETS", false),
            enable_client_hints: env_flag("IMGRELAY_ENABLE_CLIENT_HINTS", false),
            enable_webp_detection: env_flag("IMGRELAY_ENABLE_WEBP_DETECTION", false),
            enforce_webp: env_flag("IMGRELAY_ENFORCE_WEBP", false),
            key: env_hex("IMGRELAY_KEY")?,
            salt: env_hex("IMGRELAY_SALT")?,
            signature_size: env::var("IMGRELAY_SIGNATURE_SIZE")
                .unwrap_or_else(|_| SIGNATURE_SIZE.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("IMGRELAY_SIGNATURE_SIZE must be a valid number"))?,
            max_clients: env::var("IMGRELAY_MAX_CLIENTS")
                .unwrap_or_else(|_| MAX_CLIENTS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("IMGRELAY_MAX_CLIENTS must be a valid number"))?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(1..=100).contains(&self.quality) {
            return Err(anyhow::anyhow!(
                "IMGRELAY_QUALITY must be between 1 and 100, got {}",
                self.quality
            ));
        }

        if !(1..=SIGNATURE_SIZE).contains(&self.signature_size) {
            return Err(anyhow::anyhow!(
                "IMGRELAY_SIGNATURE_SIZE must be between 1 and {}, got {}",
                SIGNATURE_SIZE,
                self.signature_size
            ));
        }

        if self.max_clients == 0 {
            return Err(anyhow::anyhow!("IMGRELAY_MAX_CLIENTS must be greater than 0"));
        }

        if !self.allow_insecure && (self.key.is_empty() || self.salt.is_empty()) {
            return Err(anyhow::anyhow!(
                "IMGRELAY_KEY and IMGRELAY_SALT must be set unless IMGRELAY_ALLOW_INSECURE=true"
            ));
        }

        Ok(())
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .to_lowercase()
        .parse()
        .unwrap_or(default)
}

fn env_hex(name: &str) -> Result<Vec<u8>, anyhow::Error> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => {
            hex::decode(value.trim()).map_err(|e| anyhow::anyhow!("{} must be hex-encoded: {}", name, e))
        }
        _ => Ok(Vec::new()),
    }
}
