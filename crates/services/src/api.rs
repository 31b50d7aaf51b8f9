//! HTTP client for the arcade backend.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;
use utils::api::{
    auth::{LogoutResponse, MeResponse, SESSION_COOKIE},
    stats::{
        RankingEntry, RankingSubmission, StatsResponse, StatsUpdateRequest, StatsUpdateResponse,
    },
};

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("url error: {0}")]
    Url(String),
}

impl ClientError {
    /// True when the response means "not signed in" rather than a backend
    /// failure; callers fall back to anonymous defaults instead of
    /// surfacing an error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }
}

/// Client for the auth and stats endpoints. The session token, when set,
/// rides along as the browser would send it.
pub struct ApiClient {
    base: Url,
    http: Client,
    session_token: Option<String>,
}

impl ApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::Url(e.to_string()))?;
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("arcade-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            base,
            http,
            session_token: None,
        })
    }

    /// Attaches the session token normally carried by the browser cookie.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub async fn fetch_me(&self) -> Result<MeResponse, ClientError> {
        self.get_json("/api/auth/me").await
    }

    pub async fn fetch_stats(&self) -> Result<StatsResponse, ClientError> {
        self.get_json("/api/user/stats").await
    }

    pub async fn push_stats(
        &self,
        update: &StatsUpdateRequest,
    ) -> Result<StatsUpdateResponse, ClientError> {
        self.post_json("/api/user/stats", update).await
    }

    pub async fn logout(&self) -> Result<LogoutResponse, ClientError> {
        self.post_json("/api/auth/logout", &serde_json::json!({}))
            .await
    }

    pub async fn fetch_rankings(&self, difficulty: u8) -> Result<Vec<RankingEntry>, ClientError> {
        self.get_json(&format!("/api/rankings/{difficulty}")).await
    }

    pub async fn submit_ranking(
        &self,
        submission: &RankingSubmission,
    ) -> Result<(), ClientError> {
        let url = self.url("/api/rankings")?;
        let response = self
            .decorate(self.http.post(url))
            .json(submission)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::ensure_success(response).await.map(|_| ())
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Url(e.to_string()))
    }

    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}")),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path)?;
        let response = self
            .decorate(self.http.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = Self::ensure_success(response).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Serde(e.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let response = self
            .decorate(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = Self::ensure_success(response).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Serde(e.to_string()))
    }

    async fn ensure_success(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_classification_only_matches_401() {
        assert!(
            ClientError::Http {
                status: 401,
                body: String::new()
            }
            .is_auth()
        );
        assert!(
            !ClientError::Http {
                status: 502,
                body: String::new()
            }
            .is_auth()
        );
        assert!(!ClientError::Timeout.is_auth());
    }
}
