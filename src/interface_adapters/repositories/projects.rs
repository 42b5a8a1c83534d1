use crate::domain::{ApiError, Project, ProjectNote, ProjectTimeEntry};
use crate::interface_adapters::http::{ApiClient, ApiRequest};
use crate::interface_adapters::protocol::{
    CreateProjectNoteRequest, CreateProjectRequest, ProjectScoped, ScopedProjectUpdate,
    TimeEntrySeconds, UpdateProjectNoteRequest, UpdateProjectRequest,
};

// Projects plus their note and time-entry sub-resources.
#[derive(Clone)]
pub struct ProjectsRepository {
    api: ApiClient,
}

impl ProjectsRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// GET /api/projects
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.api.call(ApiRequest::get("/api/projects")).await
    }

    /// POST /api/projects
    pub async fn create_project(&self, body: &CreateProjectRequest) -> Result<Project, ApiError> {
        let request = ApiRequest::post("/api/projects").json(body)?;
        self.api.call(request).await
    }

    /// GET /api/projects/{id}
    pub async fn get_project(&self, project_id: u64) -> Result<Project, ApiError> {
        let request =
            ApiRequest::get(format!("/api/projects/{project_id}")).query("project_id", project_id);
        self.api.call(request).await
    }

    /// PUT /api/projects/{id}
    pub async fn update_project(
        &self,
        project_id: u64,
        body: &UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        let request = ApiRequest::put(format!("/api/projects/{project_id}"))
            .json(&ScopedProjectUpdate { body, project_id })?;
        self.api.call(request).await
    }

    /// DELETE /api/projects/{id}
    pub async fn delete_project(&self, project_id: u64) -> Result<bool, ApiError> {
        let request = ApiRequest::delete(format!("/api/projects/{project_id}"))
            .query("project_id", project_id);
        self.api.call(request).await
    }

    /// POST /api/projects/notes
    pub async fn create_project_note(
        &self,
        body: &CreateProjectNoteRequest,
    ) -> Result<ProjectNote, ApiError> {
        let request = ApiRequest::post("/api/projects/notes").json(body)?;
        self.api.call(request).await
    }

    /// PUT /api/projects/notes/{id}
    pub async fn update_project_note(
        &self,
        note_id: u64,
        body: &UpdateProjectNoteRequest,
    ) -> Result<ProjectNote, ApiError> {
        let request = ApiRequest::put(format!("/api/projects/notes/{note_id}")).json(body)?;
        self.api.call(request).await
    }

    /// DELETE /api/projects/notes/{id}
    pub async fn delete_project_note(&self, note_id: u64, project_id: u64) -> Result<bool, ApiError> {
        let request = ApiRequest::delete(format!("/api/projects/notes/{note_id}"))
            .query("project_id", project_id);
        self.api.call(request).await
    }

    /// POST /api/projects/time
    pub async fn create_project_time_entry(
        &self,
        project_id: u64,
    ) -> Result<ProjectTimeEntry, ApiError> {
        let request = ApiRequest::post("/api/projects/time").json(&ProjectScoped { project_id })?;
        self.api.call(request).await
    }

    /// PUT /api/projects/time/{id}/start
    pub async fn start_project_time_entry(
        &self,
        time_entry_id: u64,
        project_id: u64,
    ) -> Result<ProjectTimeEntry, ApiError> {
        let request = ApiRequest::put(format!("/api/projects/time/{time_entry_id}/start"))
            .json(&ProjectScoped { project_id })?;
        self.api.call(request).await
    }

    /// PUT /api/projects/time/{id}/stop
    pub async fn stop_project_time_entry(
        &self,
        time_entry_id: u64,
        project_id: u64,
    ) -> Result<bool, ApiError> {
        let request = ApiRequest::put(format!("/api/projects/time/{time_entry_id}/stop"))
            .json(&ProjectScoped { project_id })?;
        self.api.call(request).await
    }

    /// DELETE /api/projects/time/{id}
    pub async fn delete_project_time_entry(
        &self,
        time_entry_id: u64,
        project_id: u64,
    ) -> Result<bool, ApiError> {
        let request = ApiRequest::delete(format!("/api/projects/time/{time_entry_id}"))
            .query("project_id", project_id);
        self.api.call(request).await
    }

    /// PUT /api/projects/time/{id}/update-time
    pub async fn update_project_time_entry(
        &self,
        time_entry_id: u64,
        project_id: u64,
        total_seconds: u64,
    ) -> Result<ProjectTimeEntry, ApiError> {
        let request = ApiRequest::put(format!("/api/projects/time/{time_entry_id}/update-time"))
            .json(&TimeEntrySeconds {
                project_id,
                seconds_counted: total_seconds,
            })?;
        self.api.call(request).await
    }
}
