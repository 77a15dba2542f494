use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::models::schema::projects;
use crate::shared::models::ListQuery;
use crate::shared::state::AppState;

/// Allowed project lifecycle states. There are no enforced transitions;
/// any known status may be written at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Draft,
    Quoted,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::Quoted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "Draft",
            ProjectStatus::Quoted => "Quoted",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

fn validate_status(value: &str) -> Result<(), ApiError> {
    if ProjectStatus::parse(value).is_some() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Unknown project status '{value}', expected one of: Draft, Quoted, In Progress, Completed"
        )))
    }
}

#[derive(Debug, Clone, Serialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub quotation_no: String,
    pub status: String,
    pub poc_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub quotation_no: String,
    pub status: String,
    pub poc_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub quotation_no: Option<String>,
    pub status: Option<String>,
    pub poc_phone: Option<String>,
}

fn apply_update(project: &mut Project, update: UpdateProjectRequest) -> Result<(), ApiError> {
    if let Some(name) = update.name {
        project.name = name;
    }
    if let Some(quotation_no) = update.quotation_no {
        project.quotation_no = quotation_no;
    }
    if let Some(status) = update.status {
        validate_status(&status)?;
        project.status = status;
    }
    if let Some(poc_phone) = update.poc_phone {
        project.poc_phone = Some(poc_phone);
    }
    Ok(())
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let mut conn = state.conn.get()?;

    let rows: Vec<Project> = projects::table
        .order(projects::quotation_no.asc())
        .offset(query.offset())
        .limit(query.limit())
        .load(&mut conn)?;

    Ok(Json(rows))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    validate_status(&req.status)?;

    let mut conn = state.conn.get()?;

    let project = Project {
        id: Uuid::new_v4(),
        name: req.name,
        quotation_no: req.quotation_no,
        status: req.status,
        poc_phone: req.poc_phone,
    };

    diesel::insert_into(projects::table)
        .values(&project)
        .execute(&mut conn)?;

    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let mut conn = state.conn.get()?;

    let mut project: Project = projects::table
        .find(project_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Project"))?;

    apply_update(&mut project, req)?;

    diesel::update(projects::table.find(project_id))
        .set(&project)
        .execute(&mut conn)?;

    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let mut conn = state.conn.get()?;

    let project: Project = projects::table
        .find(project_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Project"))?;

    diesel::delete(projects::table.find(project_id)).execute(&mut conn)?;

    Ok(Json(project))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/:id", put(update_project).delete(delete_project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_values() {
        assert_eq!(ProjectStatus::parse("Draft"), Some(ProjectStatus::Draft));
        assert_eq!(ProjectStatus::parse("Quoted"), Some(ProjectStatus::Quoted));
        assert_eq!(
            ProjectStatus::parse("In Progress"),
            Some(ProjectStatus::InProgress)
        );
        assert_eq!(
            ProjectStatus::parse("Completed"),
            Some(ProjectStatus::Completed)
        );
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(ProjectStatus::parse("draft"), None);
        assert_eq!(ProjectStatus::parse("Cancelled"), None);
        assert_eq!(ProjectStatus::parse(""), None);
    }

    #[test]
    fn test_apply_update_rejects_bad_status() {
        let mut project = Project {
            id: Uuid::new_v4(),
            name: "Plant revamp".to_string(),
            quotation_no: "Q-1001".to_string(),
            status: "Draft".to_string(),
            poc_phone: None,
        };

        let result = apply_update(
            &mut project,
            UpdateProjectRequest {
                status: Some("Cancelled".to_string()),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(project.status, "Draft");
    }

    #[test]
    fn test_apply_update_partial_merge() {
        let mut project = Project {
            id: Uuid::new_v4(),
            name: "Plant revamp".to_string(),
            quotation_no: "Q-1001".to_string(),
            status: "Draft".to_string(),
            poc_phone: Some("555-0100".to_string()),
        };

        apply_update(
            &mut project,
            UpdateProjectRequest {
                status: Some("In Progress".to_string()),
                ..Default::default()
            },
        )
        .expect("Update failed");

        assert_eq!(project.status, "In Progress");
        assert_eq!(project.name, "Plant revamp");
        assert_eq!(project.quotation_no, "Q-1001");
        assert_eq!(project.poc_phone.as_deref(), Some("555-0100"));
    }
}
