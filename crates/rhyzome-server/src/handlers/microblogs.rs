//! Microblog routes.
//!
//! - GET    /microblogs         index relations of the collection
//! - POST   /microblogs         create (`create_microblog`)
//! - GET    /microblogs/all     every stored node value
//! - GET    /microblogs/:id     one post
//! - DELETE /microblogs/:id     delete the node (`delete_microblog`)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rhyzome_core::{Permission, Relation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMicroblogRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Microblog {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedMicroblog {
    pub id: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Relation>>, ApiError> {
    let relations = state.blocking(|s| s.microblogs.list()).await?;
    Ok(Json(relations))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateMicroblogRequest>,
) -> Result<(StatusCode, Json<CreatedMicroblog>), ApiError> {
    state.authorize(&headers, Permission::CreateMicroblog)?;
    let id = state
        .blocking(move |s| s.microblogs.create(&req.text))
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedMicroblog { id })))
}

pub async fn all_values(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let values = state.blocking(|s| s.store.all_node_values()).await?;
    Ok(Json(values))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Microblog>, ApiError> {
    let lookup = id.clone();
    let text = state
        .blocking(move |s| s.store.get_node(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("microblog {id}")))?;
    Ok(Json(Microblog { id, text }))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers, Permission::DeleteMicroblog)?;
    state.blocking(move |s| s.store.delete_node(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
