use super::endpoints::GoogleOauthEndpoints;
use crate::error::{IsRetryable, PortfolioError};
use crate::google_oauth::credentials::OAuthCredentials;

use backon::{ExponentialBuilder, Retryable};
use secrecy::SecretString;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub(crate) fn default_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(3))
        .with_max_times(3)
        .with_jitter()
}

/// Token exchange against the Google OAuth2 token endpoint.
#[derive(Clone)]
pub struct GoogleOauthService {
    client: reqwest::Client,
    token_url: Url,
    redirect_uri: Option<Url>,
    retry_policy: ExponentialBuilder,
}

impl GoogleOauthService {
    pub fn new(client: reqwest::Client, token_url: Url, redirect_uri: Option<Url>) -> Self {
        Self {
            client,
            token_url,
            redirect_uri,
            retry_policy: default_retry_policy(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: ExponentialBuilder) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Refresh-token grant with network-aware retries.
    pub async fn refresh_access_token(
        &self,
        creds: &OAuthCredentials,
    ) -> Result<SecretString, PortfolioError> {
        (|| async {
            GoogleOauthEndpoints::refresh_access_token(
                creds,
                &self.token_url,
                self.redirect_uri.as_ref(),
                &self.client,
            )
            .await
        })
        .retry(self.retry_policy.clone())
        .when(|e: &PortfolioError| e.is_retryable())
        .notify(|err, dur: Duration| {
            warn!(error = %err, "Google Oauth2 token refresh retrying after {:?}", dur);
        })
        .await
    }
}
