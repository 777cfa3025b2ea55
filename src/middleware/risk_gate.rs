use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::PortfolioError;
use crate::router::PortfolioState;
use crate::validation::ContactForm;

/// Bodies that carry the client-side bot-detection token.
pub trait CarriesRiskToken {
    fn risk_token(&self) -> Option<&str>;
}

impl CarriesRiskToken for ContactForm {
    fn risk_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// JSON body that passed the bot-risk gate.
///
/// Rejections are terminal responses: 400 for unreadable bodies, low scores
/// and assessment failures, 413 for oversized bodies, 500 when the gate's own
/// credential is unavailable.
pub struct RiskChecked<T>(pub T);

impl<T> FromRequest<PortfolioState> for RiskChecked<T>
where
    T: DeserializeOwned + CarriesRiskToken + Send,
{
    type Rejection = PortfolioError;

    async fn from_request(req: Request, state: &PortfolioState) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .inspect_err(|rejection| debug!(status = %rejection.status(), "unreadable request body"))?;

        let token = body.risk_token().map(str::to_owned);
        state.gate.check(token.as_deref()).await?;

        Ok(Self(body))
    }
}
