//! Relation routes.
//!
//! `DELETE /microblogs/:id/relations/:name` removes every relation called
//! `name` in the whole store, not only those leaving `:id`.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rhyzome_core::{Permission, Relation, WalkOrder};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRelationRequest {
    pub related_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalkQuery {
    #[serde(default)]
    pub order: WalkOrder,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalkResponse {
    pub start: String,
    pub order: WalkOrder,
    pub ids: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Relation>>, ApiError> {
    let relations = state
        .blocking(move |s| s.store.query_relations_from(&id))
        .await?;
    Ok(Json(relations))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, name)): Path<(String, String)>,
    Json(req): Json<CreateRelationRequest>,
) -> Result<(StatusCode, Json<Relation>), ApiError> {
    state.authorize(&headers, Permission::CreateRelation)?;
    let relation = Relation::new(id, name, req.related_id);
    let stored = relation.clone();
    state
        .blocking(move |s| {
            s.store
                .create_relation(&stored.from_id, &stored.name, &stored.to_id)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(relation)))
}

pub async fn delete_by_name(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((_id, name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.authorize(&headers, Permission::DeleteRelation)?;
    let removed = state
        .blocking(move |s| s.store.delete_relations_by_name(&name))
        .await?;
    tracing::info!(removed, "relations deleted by name");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn walk(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<WalkQuery>,
) -> Result<Json<WalkResponse>, ApiError> {
    let order = query.order;
    let start = id.clone();
    let ids = state.blocking(move |s| s.store.walk(&start, order)).await?;
    tracing::debug!(start = %id, order = order.as_str(), visited = ids.len(), "walk finished");
    Ok(Json(WalkResponse {
        start: id,
        order,
        ids,
    }))
}
