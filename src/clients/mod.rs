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
use crate::shared::models::schema::clients;
use crate::shared::models::ListQuery;
use crate::shared::state::AppState;

#[derive(Debug, Clone, Serialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = clients)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub client_code: String,
    pub address: Option<String>,
    pub poc: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub client_code: String,
    pub address: Option<String>,
    pub poc: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub client_code: Option<String>,
    pub address: Option<String>,
    pub poc: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

fn apply_update(client: &mut Client, update: UpdateClientRequest) {
    if let Some(name) = update.name {
        client.name = name;
    }
    if let Some(client_code) = update.client_code {
        client.client_code = client_code;
    }
    if let Some(address) = update.address {
        client.address = Some(address);
    }
    if let Some(poc) = update.poc {
        client.poc = Some(poc);
    }
    if let Some(phone) = update.phone {
        client.phone = Some(phone);
    }
    if let Some(email) = update.email {
        client.email = Some(email);
    }
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    let mut conn = state.conn.get()?;

    let rows: Vec<Client> = clients::table
        .order(clients::client_code.asc())
        .offset(query.offset())
        .limit(query.limit())
        .load(&mut conn)?;

    Ok(Json(rows))
}

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    let mut conn = state.conn.get()?;

    let client = Client {
        id: Uuid::new_v4(),
        name: req.name,
        client_code: req.client_code,
        address: req.address,
        poc: req.poc,
        phone: req.phone,
        email: req.email,
    };

    diesel::insert_into(clients::table)
        .values(&client)
        .execute(&mut conn)?;

    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    let mut conn = state.conn.get()?;

    let mut client: Client = clients::table
        .find(client_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Client"))?;

    apply_update(&mut client, req);

    diesel::update(clients::table.find(client_id))
        .set(&client)
        .execute(&mut conn)?;

    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Client>, ApiError> {
    let mut conn = state.conn.get()?;

    let client: Client = clients::table
        .find(client_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Client"))?;

    diesel::delete(clients::table.find(client_id)).execute(&mut conn)?;

    Ok(Json(client))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/:id", put(update_client).delete(delete_client))
}
