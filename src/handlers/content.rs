use axum::{Json, extract::State};
use serde::Deserialize;

use crate::db::{ImageAsset, ProjectWithTools, TimelineEntry, Tool};
use crate::middleware::{CarriesRiskToken, RiskChecked};
use crate::service::ResumeImages;
use crate::{PortfolioError, router::PortfolioState};

/// `/api/resume` body: only the bot-detection token.
#[derive(Debug, Default, Deserialize)]
pub struct ResumeRequest {
    pub token: Option<String>,
}

impl CarriesRiskToken for ResumeRequest {
    fn risk_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// GET /api/images -> profile images.
pub async fn profile_images_handler(
    State(state): State<PortfolioState>,
) -> Result<Json<Vec<ImageAsset>>, PortfolioError> {
    Ok(Json(state.catalog.profile_images().await?))
}

/// GET /api/timeline -> every entry in insertion order.
pub async fn timeline_handler(
    State(state): State<PortfolioState>,
) -> Result<Json<Vec<TimelineEntry>>, PortfolioError> {
    Ok(Json(state.catalog.timeline().await?))
}

/// GET /api/skills
pub async fn skills_handler(
    State(state): State<PortfolioState>,
) -> Result<Json<Vec<Tool>>, PortfolioError> {
    Ok(Json(state.catalog.tools().await?))
}

/// GET /api/projects -> projects with embedded tool names.
pub async fn projects_handler(
    State(state): State<PortfolioState>,
) -> Result<Json<Vec<ProjectWithTools>>, PortfolioError> {
    Ok(Json(state.catalog.projects().await?))
}

/// POST /api/resume -> resume (and optionally cover letter) images, behind the bot gate.
pub async fn resume_handler(
    State(state): State<PortfolioState>,
    RiskChecked(_body): RiskChecked<ResumeRequest>,
) -> Result<Json<ResumeImages>, PortfolioError> {
    Ok(Json(state.catalog.resume_images(state.resume_split).await?))
}
