use serde::{Deserialize, Serialize};

/// reCAPTCHA Enterprise `projects.assessments.create` body.
#[derive(Debug, Serialize)]
pub struct AssessmentRequest<'a> {
    pub event: AssessmentEvent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentEvent<'a> {
    pub token: &'a str,
    pub expected_action: &'a str,
    pub site_key: &'a str,
}

/// Only the fields the gate reads; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    #[serde(default)]
    pub risk_analysis: Option<RiskAnalysis>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RiskAnalysis {
    #[serde(default)]
    pub score: Option<f64>,
}

impl AssessmentResponse {
    pub fn score(&self) -> Option<f64> {
        self.risk_analysis.as_ref()?.score
    }
}
