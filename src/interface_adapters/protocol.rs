use serde::Serialize;

use crate::domain::{ProjectNoteStatus, ProjectStatus};

// Request payload for creating a project.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

// Request payload for updating a project.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

// Request payload for creating a note under a project.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectNoteRequest {
    pub project_id: u64,
    pub title: String,
    pub note: String,
}

// Request payload for a partial note update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectNoteRequest {
    pub project_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectNoteStatus>,
}

// Body carrying only the owning project.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProjectScoped {
    pub project_id: u64,
}

// Project update body with the project id merged in.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ScopedProjectUpdate<'a> {
    #[serde(flatten)]
    pub body: &'a UpdateProjectRequest,
    pub project_id: u64,
}

// Body for overwriting the counted seconds of a time entry.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TimeEntrySeconds {
    pub project_id: u64,
    pub seconds_counted: u64,
}
