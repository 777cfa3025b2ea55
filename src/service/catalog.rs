use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::db::{
    ContentStore, ImageAsset, Project, ProjectTool, ProjectWithTools, TimelineEntry, Tool,
};
use crate::error::PortfolioError;

pub const TAG_PROFILE: &str = "profile";
pub const TAG_RESUME: &str = "resume";
pub const TAG_COVERLETTER: &str = "coverletter";

/// `/api/resume` payload: a flat list, or grouped when the split is enabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResumeImages {
    Flat(Vec<ImageAsset>),
    Split {
        resume: Vec<ImageAsset>,
        coverletter: Vec<ImageAsset>,
    },
}

/// Read-side composition over the content store.
#[derive(Clone)]
pub struct Catalog {
    store: ContentStore,
}

impl Catalog {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub async fn profile_images(&self) -> Result<Vec<ImageAsset>, PortfolioError> {
        self.store.images_by_tag(TAG_PROFILE).await
    }

    pub async fn resume_images(&self, split: bool) -> Result<ResumeImages, PortfolioError> {
        if !split {
            return Ok(ResumeImages::Flat(
                self.store.images_by_tag(TAG_RESUME).await?,
            ));
        }
        let images = self
            .store
            .images_by_tags(&[TAG_RESUME, TAG_COVERLETTER])
            .await?;
        let (resume, coverletter): (Vec<_>, Vec<_>) = images
            .into_iter()
            .partition(|image| image.purpose == TAG_RESUME);
        Ok(ResumeImages::Split {
            resume,
            coverletter,
        })
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineEntry>, PortfolioError> {
        self.store.timeline().await
    }

    pub async fn tools(&self) -> Result<Vec<Tool>, PortfolioError> {
        self.store.tools().await
    }

    /// Projects with their tool names; the three collections are read concurrently.
    pub async fn projects(&self) -> Result<Vec<ProjectWithTools>, PortfolioError> {
        let (projects, tools, links) = futures::try_join!(
            self.store.projects(),
            self.store.tools(),
            self.store.project_tools(),
        )?;
        Ok(attach_tools(projects, &tools, &links))
    }
}

/// Give every project the names of its associated tools, in association order.
/// Associations pointing at a missing tool are skipped.
pub fn attach_tools(
    projects: Vec<Project>,
    tools: &[Tool],
    links: &[ProjectTool],
) -> Vec<ProjectWithTools> {
    let names: HashMap<i64, &str> = tools.iter().map(|t| (t.id, t.tool.as_str())).collect();

    let mut by_project: HashMap<i64, Vec<String>> = HashMap::new();
    for link in links {
        match names.get(&link.tool_id) {
            Some(name) => by_project
                .entry(link.project_id)
                .or_default()
                .push((*name).to_string()),
            None => warn!(
                project_id = link.project_id,
                tool_id = link.tool_id,
                "skipping association to unknown tool"
            ),
        }
    }

    projects
        .into_iter()
        .map(|project| ProjectWithTools {
            tools: by_project.get(&project.id).cloned().unwrap_or_default(),
            project,
        })
        .collect()
}
