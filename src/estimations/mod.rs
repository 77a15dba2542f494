use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::shared::error::ApiError;
use crate::shared::models::schema::estimations;
use crate::shared::state::AppState;

/// An estimation keeps the identifier supplied by the caller (e.g. "EST-001")
/// rather than a generated one.
#[derive(Debug, Clone, Serialize, Queryable, Insertable)]
#[diesel(table_name = estimations)]
pub struct Estimation {
    pub id: String,
    pub client_name: String,
    pub billing_address: Option<String>,
    pub ship_to_address: Option<String>,
    pub poc_name: Option<String>,
    pub poc_phone: Option<String>,
    pub poc_email: Option<String>,
    pub prepared_by: Option<String>,
    pub project_name: String,
    pub revision: Option<String>,
    pub proposal_no: Option<String>,
    pub proposal_date: Option<NaiveDate>,
    pub valid_till: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEstimationRequest {
    pub id: String,
    pub client_name: String,
    pub billing_address: Option<String>,
    pub ship_to_address: Option<String>,
    pub poc_name: Option<String>,
    pub poc_phone: Option<String>,
    pub poc_email: Option<String>,
    pub prepared_by: Option<String>,
    pub project_name: String,
    pub revision: Option<String>,
    pub proposal_no: Option<String>,
    pub proposal_date: Option<NaiveDate>,
    pub valid_till: Option<NaiveDate>,
}

pub async fn list_estimations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Estimation>>, ApiError> {
    let mut conn = state.conn.get()?;

    let rows: Vec<Estimation> = estimations::table
        .order(estimations::id.asc())
        .load(&mut conn)?;

    Ok(Json(rows))
}

pub async fn create_estimation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEstimationRequest>,
) -> Result<Json<Estimation>, ApiError> {
    if req.id.trim().is_empty() {
        return Err(ApiError::Validation(
            "Estimation id must not be empty".to_string(),
        ));
    }

    let mut conn = state.conn.get()?;

    let estimation = Estimation {
        id: req.id,
        client_name: req.client_name,
        billing_address: req.billing_address,
        ship_to_address: req.ship_to_address,
        poc_name: req.poc_name,
        poc_phone: req.poc_phone,
        poc_email: req.poc_email,
        prepared_by: req.prepared_by,
        project_name: req.project_name,
        revision: req.revision,
        proposal_no: req.proposal_no,
        proposal_date: req.proposal_date,
        valid_till: req.valid_till,
    };

    diesel::insert_into(estimations::table)
        .values(&estimation)
        .execute(&mut conn)?;

    Ok(Json(estimation))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/estimations", get(list_estimations).post(create_estimation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_parses_calendar_dates() {
        let req: CreateEstimationRequest = serde_json::from_str(
            r#"{
                "id": "EST-001",
                "client_name": "Acme",
                "project_name": "Plant revamp",
                "proposal_date": "2025-03-14",
                "valid_till": "2025-04-14"
            }"#,
        )
        .expect("Deserialization failed");

        assert_eq!(req.id, "EST-001");
        assert_eq!(
            req.proposal_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
        );
        assert_eq!(
            req.valid_till,
            Some(NaiveDate::from_ymd_opt(2025, 4, 14).unwrap())
        );
        assert_eq!(req.revision, None);
    }

    #[test]
    fn test_create_request_rejects_malformed_date() {
        let result: Result<CreateEstimationRequest, _> = serde_json::from_str(
            r#"{
                "id": "EST-002",
                "client_name": "Acme",
                "project_name": "Plant revamp",
                "proposal_date": "14/03/2025"
            }"#,
        );

        assert!(result.is_err());
    }
}
