//! Password login and bearer-token identity for the API.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header, request::Parts},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::members::{find_member_by_email, Member, MemberResponse};
use crate::security::jwt::extract_bearer_token;
use crate::security::password::verify_password;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /token - exchange username (email) + password for a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let mut conn = state.conn.get()?;

    let member = find_member_by_email(&mut conn, &form.username)?
        .ok_or(ApiError::Unauthorized("Incorrect username or password"))?;

    // A malformed stored hash counts as a failed login, not a server error.
    let ok = verify_password(&form.password, &member.password_hash).unwrap_or(false);
    if !ok {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    let access_token = state.tokens.issue(&member.email)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// The member resolved from a validated bearer token. Rejects the request
/// when the token is absent, invalid, expired, or its subject no longer
/// resolves to a stored member.
pub struct AuthenticatedMember(pub Member);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let claims = state
            .tokens
            .validate(token)
            .map_err(|_| ApiError::Unauthorized("Could not validate credentials"))?;

        let mut conn = state.conn.get()?;
        let member = find_member_by_email(&mut conn, &claims.sub)?
            .ok_or(ApiError::Unauthorized("Could not validate credentials"))?;

        Ok(AuthenticatedMember(member))
    }
}

/// GET /users/me - the current member, resolved from the bearer token.
pub async fn me(AuthenticatedMember(member): AuthenticatedMember) -> Json<MemberResponse> {
    Json(MemberResponse::from(&member))
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route("/token", post(login))
        .route("/users/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_shape() {
        let value = serde_json::to_value(TokenResponse {
            access_token: "abc".to_string(),
            token_type: "bearer".to_string(),
        })
        .expect("Serialization failed");

        assert_eq!(value["access_token"], "abc");
        assert_eq!(value["token_type"], "bearer");
    }

}
