use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::api::RecaptchaApi;
use crate::config::SECRET_RISK_API_KEY;
use crate::crypto::SecretVault;
use crate::error::PortfolioError;
use crate::types::assessment::{AssessmentEvent, AssessmentRequest};

/// Scores at or below this are treated as automated traffic.
pub const RISK_THRESHOLD: f64 = 0.3;
pub const EXPECTED_ACTION: &str = "submit";

/// Scores a client token with an external bot-detection service.
#[async_trait]
pub trait RiskAssessor: Send + Sync {
    /// Risk score in `[0, 1]`; lower means more likely automated.
    async fn assess(&self, api_key: &SecretString, token: &str) -> Result<f64, PortfolioError>;
}

/// reCAPTCHA Enterprise assessments.
pub struct RecaptchaAssessor {
    client: reqwest::Client,
    url: Url,
    site_key: String,
}

impl RecaptchaAssessor {
    pub fn new(
        client: reqwest::Client,
        base_url: &Url,
        project: &str,
        site_key: impl Into<String>,
    ) -> Result<Self, PortfolioError> {
        Ok(Self {
            client,
            url: RecaptchaApi::assessment_url(base_url, project)?,
            site_key: site_key.into(),
        })
    }
}

#[async_trait]
impl RiskAssessor for RecaptchaAssessor {
    async fn assess(&self, api_key: &SecretString, token: &str) -> Result<f64, PortfolioError> {
        let body = AssessmentRequest {
            event: AssessmentEvent {
                token,
                expected_action: EXPECTED_ACTION,
                site_key: &self.site_key,
            },
        };
        let response =
            RecaptchaApi::create_assessment(&self.client, &self.url, api_key.expose_secret(), &body)
                .await?;
        response.score().ok_or_else(|| {
            PortfolioError::RiskCheckFailed("assessment carries no riskAnalysis.score".to_string())
        })
    }
}

/// Fail-closed bot gate in front of the mail and resume routes.
pub struct RiskGate {
    vault: Arc<SecretVault>,
    assessor: Arc<dyn RiskAssessor>,
}

impl RiskGate {
    pub fn new(vault: Arc<SecretVault>, assessor: Arc<dyn RiskAssessor>) -> Self {
        Self { vault, assessor }
    }

    /// Pass only when the token scores above the threshold.
    ///
    /// Transport and parse failures become `RiskCheckFailed`; an unavailable API
    /// key stays a credential error.
    pub async fn check(&self, token: Option<&str>) -> Result<f64, PortfolioError> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            warn!("risk gate: request carries no client token");
            return Err(PortfolioError::RiskCheckFailed(
                "missing client token".to_string(),
            ));
        };

        let api_key = self.vault.reveal(SECRET_RISK_API_KEY).await?;

        let score = self
            .assessor
            .assess(&api_key, token)
            .await
            .map_err(|e| {
                warn!(error = %e, "risk assessment failed; rejecting");
                match e {
                    PortfolioError::RiskCheckFailed(_) => e,
                    other => PortfolioError::RiskCheckFailed(other.to_string()),
                }
            })?;

        judge(score)
    }
}

/// Threshold policy: `score <= 0.3` rejects, anything outside `[0, 1]` is a failure.
pub fn judge(score: f64) -> Result<f64, PortfolioError> {
    if !(0.0..=1.0).contains(&score) {
        warn!(score, "risk score out of range; rejecting");
        return Err(PortfolioError::RiskCheckFailed(format!(
            "score {score} out of range"
        )));
    }
    if score <= RISK_THRESHOLD {
        info!(score, "risk gate rejected request");
        return Err(PortfolioError::RiskRejected { score });
    }
    Ok(score)
}
