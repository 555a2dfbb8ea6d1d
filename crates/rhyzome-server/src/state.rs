//! Shared application state handed to every handler.

use crate::error::ApiError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use rhyzome_core::{AuthorizationGate, Collection, Permission, Store, StoreError, TokenRegistry};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub microblogs: Collection,
    pub gate: AuthorizationGate,
    admin_password: Arc<str>,
}

impl AppState {
    pub fn new(store: Store, admin_password: impl Into<String>) -> Self {
        Self::with_registry(store, Arc::new(TokenRegistry::new()), admin_password)
    }

    pub fn with_registry(
        store: Store,
        registry: Arc<TokenRegistry>,
        admin_password: impl Into<String>,
    ) -> Self {
        Self {
            microblogs: Collection::microblogs(store.clone()),
            store,
            gate: AuthorizationGate::new(registry),
            admin_password: Arc::from(admin_password.into()),
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        self.gate.registry()
    }

    /// Spend the request's bearer token on `permission`.
    pub fn authorize(&self, headers: &HeaderMap, permission: Permission) -> Result<(), ApiError> {
        let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
        if self.gate.authorize(token, permission) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    pub fn check_admin_password(&self, password: &str) -> Result<(), ApiError> {
        if password == &*self.admin_password {
            Ok(())
        } else {
            tracing::warn!("token issuance rejected: wrong admin password");
            Err(ApiError::Unauthorized)
        }
    }

    /// Run a store call on the blocking pool.
    pub async fn blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&AppState) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        let result = tokio::task::spawn_blocking(move || f(&state)).await?;
        Ok(result?)
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}
