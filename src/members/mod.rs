use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::security::password::hash_password;
use crate::shared::error::ApiError;
use crate::shared::models::schema::members;
use crate::shared::models::ListQuery;
use crate::shared::state::AppState;

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = members)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
    pub contact: String,
    pub password_hash: String,
}

/// Public projection of a member. The password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
    pub contact: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            role: member.role.clone(),
            email: member.email.clone(),
            contact: member.contact.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub role: String,
    pub email: String,
    pub contact: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub password: Option<String>,
}

pub fn find_member_by_email(
    conn: &mut PgConnection,
    email_addr: &str,
) -> Result<Option<Member>, diesel::result::Error> {
    members::table
        .filter(members::email.eq(email_addr))
        .first::<Member>(conn)
        .optional()
}

/// Merge a partial payload into an existing row. Absent fields keep their
/// prior values; a supplied password is re-hashed before it is stored.
fn apply_update(member: &mut Member, update: UpdateMemberRequest) -> Result<(), ApiError> {
    if let Some(name) = update.name {
        member.name = name;
    }
    if let Some(role) = update.role {
        member.role = role;
    }
    if let Some(email) = update.email {
        member.email = email;
    }
    if let Some(contact) = update.contact {
        member.contact = contact;
    }
    if let Some(password) = update.password {
        member.password_hash = hash_password(&password)?;
    }
    Ok(())
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let mut conn = state.conn.get()?;

    let rows: Vec<Member> = members::table
        .order(members::email.asc())
        .offset(query.offset())
        .limit(query.limit())
        .load(&mut conn)?;

    Ok(Json(rows.iter().map(MemberResponse::from).collect()))
}

pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let mut conn = state.conn.get()?;

    let member = Member {
        id: Uuid::new_v4(),
        name: req.name,
        role: req.role,
        email: req.email,
        contact: req.contact,
        password_hash: hash_password(&req.password)?,
    };

    diesel::insert_into(members::table)
        .values(&member)
        .execute(&mut conn)?;

    Ok(Json(MemberResponse::from(&member)))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let mut conn = state.conn.get()?;

    let mut member: Member = members::table
        .find(member_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Member"))?;

    apply_update(&mut member, req)?;

    diesel::update(members::table.find(member_id))
        .set(&member)
        .execute(&mut conn)?;

    Ok(Json(MemberResponse::from(&member)))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let mut conn = state.conn.get()?;

    let member: Member = members::table
        .find(member_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Member"))?;

    diesel::delete(members::table.find(member_id)).execute(&mut conn)?;

    Ok(Json(MemberResponse::from(&member)))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route("/members/:id", put(update_member).delete(delete_member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::password::verify_password;

    fn sample_member() -> Member {
        Member {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            role: "Sales".to_string(),
            email: "a@x.com".to_string(),
            contact: "123".to_string(),
            password_hash: hash_password("pw").expect("Failed to hash"),
        }
    }

    #[test]
    fn test_apply_update_only_touches_supplied_fields() {
        let mut member = sample_member();
        let before_hash = member.password_hash.clone();

        apply_update(
            &mut member,
            UpdateMemberRequest {
                name: Some("B".to_string()),
                ..Default::default()
            },
        )
        .expect("Update failed");

        assert_eq!(member.name, "B");
        assert_eq!(member.role, "Sales");
        assert_eq!(member.email, "a@x.com");
        assert_eq!(member.contact, "123");
        assert_eq!(member.password_hash, before_hash);
    }

    #[test]
    fn test_apply_update_rehashes_password() {
        let mut member = sample_member();
        let before_hash = member.password_hash.clone();

        apply_update(
            &mut member,
            UpdateMemberRequest {
                password: Some("new-pw".to_string()),
                ..Default::default()
            },
        )
        .expect("Update failed");

        assert_ne!(member.password_hash, before_hash);
        assert_ne!(member.password_hash, "new-pw");
        assert!(verify_password("new-pw", &member.password_hash).expect("Verify failed"));
    }

    #[test]
    fn test_response_has_no_password_field() {
        let member = sample_member();
        let value =
            serde_json::to_value(MemberResponse::from(&member)).expect("Serialization failed");
        let obj = value.as_object().expect("Expected object");

        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("email"));
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
    }
}
