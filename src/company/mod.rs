use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::models::schema::company;
use crate::shared::state::AppState;

/// The company record. Exactly one row system-wide: the first POST inserts,
/// every later POST overwrites all fields of the existing row.
#[derive(Debug, Clone, Serialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = company)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertCompanyRequest {
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn overwrite(existing: &mut Company, req: UpsertCompanyRequest) {
    existing.name = req.name;
    existing.address = req.address;
    existing.email = req.email;
    existing.phone = req.phone;
}

pub async fn get_company(State(state): State<Arc<AppState>>) -> Result<Json<Company>, ApiError> {
    let mut conn = state.conn.get()?;

    let row: Company = company::table
        .order(company::id.asc())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Company"))?;

    Ok(Json(row))
}

pub async fn upsert_company(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertCompanyRequest>,
) -> Result<Json<Company>, ApiError> {
    let mut conn = state.conn.get()?;

    let existing: Option<Company> = company::table
        .order(company::id.asc())
        .first(&mut conn)
        .optional()?;

    let row = match existing {
        Some(mut row) => {
            overwrite(&mut row, req);
            diesel::update(company::table.find(row.id))
                .set(&row)
                .execute(&mut conn)?;
            row
        }
        None => {
            let row = Company {
                id: Uuid::new_v4(),
                name: req.name,
                address: req.address,
                email: req.email,
                phone: req.phone,
            };
            diesel::insert_into(company::table)
                .values(&row)
                .execute(&mut conn)?;
            row
        }
    };

    Ok(Json(row))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/company", get(get_company).post(upsert_company))
}
