use std::env;

use secrecy::SecretString;
use thiserror::Error;

use crate::auth::Region;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    MissingVar(&'static str),
    #[error("invalid value for environment variable `{0}`")]
    InvalidVar(&'static str),
}

/// Credentials and region for the Battle.net OAuth application.
#[derive(Debug, Clone)]
pub struct BattleNetConfig {
    client_id: String,
    client_secret: SecretString,
    region: Region,
}

impl BattleNetConfig {
    pub fn new(client_id: String, client_secret: SecretString, region: Region) -> Self {
        Self {
            client_id,
            client_secret,
            region,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Externally visible origin; the OAuth redirect URI is computed from it.
    pub public_base_url: String,
    /// Origin allowed to call the API with credentials.
    pub frontend_origin: String,
    /// Reject negative increments and regressing high-score sets.
    pub strict_stats: bool,
    pub battlenet: BattleNetConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = env::var("BATTLENET_CLIENT_ID")
            .map_err(|_| ConfigError::MissingVar("BATTLENET_CLIENT_ID"))?;

        let client_secret = env::var("BATTLENET_CLIENT_SECRET")
            .map_err(|_| ConfigError::MissingVar("BATTLENET_CLIENT_SECRET"))?;

        let region = match env::var("BATTLENET_REGION") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidVar("BATTLENET_REGION"))?,
            Err(_) => Region::default(),
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let strict_stats = env::var("STRICT_STATS")
            .is_ok_and(|value| matches!(value.as_str(), "1" | "true" | "yes"));

        Ok(Self {
            listen_addr,
            public_base_url,
            frontend_origin,
            strict_stats,
            battlenet: BattleNetConfig::new(
                client_id,
                SecretString::new(client_secret.into()),
                region,
            ),
        })
    }
}
