//! POST /tokens: admin-gated token issuance.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    pub password: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueTokenResponse {
    pub token: String,
}

pub async fn issue(
    State(state): State<AppState>,
    Json(req): Json<IssueTokenRequest>,
) -> Result<(StatusCode, Json<IssueTokenResponse>), ApiError> {
    state.check_admin_password(&req.password)?;
    let token = state.registry().issue(req.permissions);
    Ok((StatusCode::CREATED, Json(IssueTokenResponse { token })))
}
