//! # Token Verification
//!
//! Pre-flight check for the user token. If the token has expired, every
//! authenticated case would fail for a reason unrelated to BPM, so the run is
//! stopped before it starts.

use log::{error, info};
use url::Url;

use crate::config::BearerToken;
use crate::error::{Result, SmokeError};
use crate::http::HttpCaller;

/// Google OAuth2 token introspection endpoint.
pub const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    endpoint: String,
}

impl TokenVerifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Succeeds only if the introspection endpoint answers 200 for `token`.
    pub async fn verify(&self, caller: &HttpCaller, token: &BearerToken) -> Result<()> {
        let url = Url::parse(&self.endpoint).map_err(|source| SmokeError::InvalidUrl {
            url: self.endpoint.clone(),
            source,
        })?;

        let response = caller
            .call(url, &[("access_token", token.as_str())], None)
            .await?;

        if response.status != 200 {
            error!("token introspection returned {}", response.status);
            return Err(SmokeError::InvalidToken {
                status: response.status,
            });
        }

        info!("user token is valid");
        Ok(())
    }
}

impl Default for TokenVerifier {
    fn default() -> Self {
        Self::new(TOKENINFO_URL)
    }
}
