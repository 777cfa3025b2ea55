use crate::error::PortfolioError;
use crate::types::assessment::{AssessmentRequest, AssessmentResponse};
use url::Url;

pub struct RecaptchaApi;

impl RecaptchaApi {
    /// `{base}/v1/projects/{project}/assessments`
    pub fn assessment_url(base: &Url, project: &str) -> Result<Url, PortfolioError> {
        let mut endpoint = base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| PortfolioError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["v1", "projects", project, "assessments"]);
        Ok(endpoint)
    }

    /// Create one assessment. The API key travels as the `key` query parameter,
    /// so errors from here must never be logged with their URL.
    pub async fn create_assessment(
        client: &reqwest::Client,
        url: &Url,
        api_key: &str,
        body: &AssessmentRequest<'_>,
    ) -> Result<AssessmentResponse, PortfolioError> {
        let resp = client
            .post(url.clone())
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PortfolioError::UpstreamStatus(status));
        }
        Ok(resp.json::<AssessmentResponse>().await?)
    }
}
