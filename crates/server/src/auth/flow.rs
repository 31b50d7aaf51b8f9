use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;
use url::Url;

use super::provider::{BattleNetProvider, ProviderError, TokenGrant};

/// Length of the CSRF state token round-tripped through the provider.
pub const STATE_TOKEN_LENGTH: usize = 24;

#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("invalid or missing state parameter")]
    InvalidState,
    #[error("missing authorization code")]
    MissingCode,
    #[error("token exchange failed: {0}")]
    Exchange(ProviderError),
}

/// Orchestrates the authorization-code flow: issues the login redirect and
/// validates plus completes the provider callback.
pub struct AuthService {
    provider: BattleNetProvider,
    public_base_url: String,
}

impl AuthService {
    pub fn new(provider: BattleNetProvider, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            provider,
            public_base_url,
        }
    }

    pub fn provider(&self) -> &BattleNetProvider {
        &self.provider
    }

    /// Redirect target registered with the provider. Login and callback
    /// must send the exact same value or the exchange is refused.
    pub fn redirect_uri(&self) -> String {
        format!("{}/api/auth/battlenet/callback", self.public_base_url)
    }

    /// Starts a login attempt: a fresh state token and the authorize URL
    /// bound to it.
    pub fn begin_login(&self) -> Result<(String, Url), url::ParseError> {
        let state = generate_state();
        let url = self.provider.authorize_url(&state, &self.redirect_uri())?;
        Ok((state, url))
    }

    /// Callback-side CSRF check: both values must be present and equal.
    pub fn validate_state(
        query_state: Option<&str>,
        cookie_state: Option<&str>,
    ) -> Result<(), AuthFlowError> {
        match (query_state, cookie_state) {
            (Some(query), Some(cookie)) if !query.is_empty() && query == cookie => Ok(()),
            _ => Err(AuthFlowError::InvalidState),
        }
    }

    /// Exchanges the callback's authorization code for a token grant.
    pub async fn complete_login(&self, code: Option<&str>) -> Result<TokenGrant, AuthFlowError> {
        let code = code
            .filter(|value| !value.is_empty())
            .ok_or(AuthFlowError::MissingCode)?;
        self.provider
            .exchange_code(code, &self.redirect_uri())
            .await
            .map_err(AuthFlowError::Exchange)
    }
}

fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tokens_are_fixed_length_alphanumeric() {
        let state = generate_state();
        assert_eq!(state.len(), STATE_TOKEN_LENGTH);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn state_tokens_differ_across_calls() {
        assert_ne!(generate_state(), generate_state());
    }

    #[test]
    fn state_validation_requires_exact_match() {
        assert!(AuthService::validate_state(Some("abc"), Some("abc")).is_ok());

        for (query, cookie) in [
            (Some("abc"), Some("abd")),
            (Some("abc"), None),
            (None, Some("abc")),
            (None, None),
            (Some(""), Some("")),
            (Some("ABC"), Some("abc")),
        ] {
            assert!(
                matches!(
                    AuthService::validate_state(query, cookie),
                    Err(AuthFlowError::InvalidState)
                ),
                "expected InvalidState for {query:?} / {cookie:?}"
            );
        }
    }
}
