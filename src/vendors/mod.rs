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
use crate::shared::models::schema::vendors;
use crate::shared::models::ListQuery;
use crate::shared::state::AppState;

/// Same shape as a client, plus the raw materials a vendor supplies.
#[derive(Debug, Clone, Serialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = vendors)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub vendor_code: String,
    pub address: Option<String>,
    pub poc: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub raw_materials: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub name: String,
    pub vendor_code: String,
    pub address: Option<String>,
    pub poc: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub raw_materials: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub vendor_code: Option<String>,
    pub address: Option<String>,
    pub poc: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub raw_materials: Option<String>,
}

fn apply_update(vendor: &mut Vendor, update: UpdateVendorRequest) {
    if let Some(name) = update.name {
        vendor.name = name;
    }
    if let Some(vendor_code) = update.vendor_code {
        vendor.vendor_code = vendor_code;
    }
    if let Some(address) = update.address {
        vendor.address = Some(address);
    }
    if let Some(poc) = update.poc {
        vendor.poc = Some(poc);
    }
    if let Some(phone) = update.phone {
        vendor.phone = Some(phone);
    }
    if let Some(email) = update.email {
        vendor.email = Some(email);
    }
    if let Some(raw_materials) = update.raw_materials {
        vendor.raw_materials = Some(raw_materials);
    }
}

pub async fn list_vendors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    let mut conn = state.conn.get()?;

    let rows: Vec<Vendor> = vendors::table
        .order(vendors::vendor_code.asc())
        .offset(query.offset())
        .limit(query.limit())
        .load(&mut conn)?;

    Ok(Json(rows))
}

pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVendorRequest>,
) -> Result<Json<Vendor>, ApiError> {
    let mut conn = state.conn.get()?;

    let vendor = Vendor {
        id: Uuid::new_v4(),
        name: req.name,
        vendor_code: req.vendor_code,
        address: req.address,
        poc: req.poc,
        phone: req.phone,
        email: req.email,
        raw_materials: req.raw_materials,
    };

    diesel::insert_into(vendors::table)
        .values(&vendor)
        .execute(&mut conn)?;

    Ok(Json(vendor))
}

pub async fn update_vendor(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
    Json(req): Json<UpdateVendorRequest>,
) -> Result<Json<Vendor>, ApiError> {
    let mut conn = state.conn.get()?;

    let mut vendor: Vendor = vendors::table
        .find(vendor_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Vendor"))?;

    apply_update(&mut vendor, req);

    diesel::update(vendors::table.find(vendor_id))
        .set(&vendor)
        .execute(&mut conn)?;

    Ok(Json(vendor))
}

pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
) -> Result<Json<Vendor>, ApiError> {
    let mut conn = state.conn.get()?;

    let vendor: Vendor = vendors::table
        .find(vendor_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Vendor"))?;

    diesel::delete(vendors::table.find(vendor_id)).execute(&mut conn)?;

    Ok(Json(vendor))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vendors", get(list_vendors).post(create_vendor))
        .route("/vendors/:id", put(update_vendor).delete(delete_vendor))
}
