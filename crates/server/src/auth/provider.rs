use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::BattleNetConfig;

const USER_AGENT: &str = concat!("bnet-arcade/", env!("CARGO_PKG_VERSION"));

/// Deadline for every outbound provider call. A stalled upstream surfaces
/// as `ProviderError::Timeout` instead of hanging the request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Scope requested at the authorize endpoint.
const SCOPE: &str = "openid";

/// Battle.net regional OAuth gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    Us,
    #[default]
    Eu,
    Kr,
    Tw,
    Cn,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
            Region::Kr => "kr",
            Region::Tw => "tw",
            Region::Cn => "cn",
        }
    }

    /// Host serving the authorize, token and userinfo endpoints.
    /// CN is hosted off the shared battle.net domain.
    fn oauth_base(self) -> &'static str {
        match self {
            Region::Us => "https://us.battle.net",
            Region::Eu => "https://eu.battle.net",
            Region::Kr => "https://kr.battle.net",
            Region::Tw => "https://tw.battle.net",
            Region::Cn => "https://www.battlenet.com.cn",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown region `{0}`")]
pub struct UnknownRegion(String);

impl std::str::FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            "kr" => Ok(Region::Kr),
            "tw" => Ok(Region::Tw),
            "cn" => Ok(Region::Cn),
            other => Err(UnknownRegion(other.to_string())),
        }
    }
}

/// Transport-level and protocol-level failures of a provider call, kept
/// distinct so callers can report timeout vs network vs rejection.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(String),
    #[error("provider returned http {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedBody(String),
}

impl ProviderError {
    /// True when the provider answered and rejected the request, meaning
    /// the presented token or code is bad rather than the provider being
    /// unreachable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

/// Access token issued by the token endpoint.
#[derive(Debug)]
pub struct TokenGrant {
    pub access_token: SecretString,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenResponseBody {
    access_token: String,
    token_type: Option<String>,
    scope: Option<String>,
    expires_in: Option<i64>,
}

/// HTTP client for the Battle.net token and userinfo endpoints.
pub struct BattleNetProvider {
    http: Client,
    client_id: String,
    client_secret: SecretString,
    region: Region,
}

impl BattleNetProvider {
    pub fn new(config: &BattleNetConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().clone(),
            region: config.region(),
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn authorize_url(&self, state: &str, redirect_uri: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.region.oauth_base()))?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("response_type", "code");
            qp.append_pair("client_id", &self.client_id);
            qp.append_pair("redirect_uri", redirect_uri);
            qp.append_pair("scope", SCOPE);
            qp.append_pair("state", state);
        }
        Ok(url)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// `redirect_uri` must be byte-identical to the one sent at authorize
    /// time. The body is read as text before parsing so a truncated or
    /// empty response surfaces as `MalformedBody` rather than a decode
    /// fault mid-stream.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, ProviderError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.region.oauth_base()))
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_token_body(&body)?;
        Ok(TokenGrant {
            access_token: SecretString::new(parsed.access_token.into()),
            token_type: parsed.token_type,
            scope: parsed.scope,
            expires_in: parsed.expires_in,
        })
    }

    /// Fetches the userinfo document for a bearer token.
    ///
    /// A non-2xx answer is returned as `Status` so the caller can decide
    /// whether "token rejected" means degrade-to-anonymous or 401.
    pub async fn fetch_userinfo(&self, token: &str) -> Result<serde_json::Value, ProviderError> {
        let response = self
            .http
            .get(format!("{}/oauth/userinfo", self.region.oauth_base()))
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::MalformedBody(e.to_string()))
    }
}

fn parse_token_body(body: &str) -> Result<TokenResponseBody, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::MalformedBody(e.to_string()))
}

fn map_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(e.to_string())
    }
}
