use crate::error::PortfolioError;
use crate::types::mail::GmailSendRequest;
use tracing::error;
use url::Url;

pub struct GmailApi;

impl GmailApi {
    /// POST one message to `users.messages.send`. Not retried: a retry after an
    /// ambiguous failure could deliver twice.
    pub async fn send(
        client: &reqwest::Client,
        url: &Url,
        access_token: &str,
        body: &GmailSendRequest,
    ) -> Result<(), PortfolioError> {
        let resp = client
            .post(url.clone())
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            error!(%status, "Gmail send rejected");
            return Err(PortfolioError::UpstreamStatus(status));
        }
        Ok(())
    }
}
