//! Authorization gate: one call per mutating request.

use super::token_registry::{short_id, TokenRegistry};
use std::sync::Arc;
use tracing::warn;

/// Permission required by each mutating endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateMicroblog,
    DeleteMicroblog,
    CreateRelation,
    DeleteRelation,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Self::CreateMicroblog,
        Self::DeleteMicroblog,
        Self::CreateRelation,
        Self::DeleteRelation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateMicroblog => "create_microblog",
            Self::DeleteMicroblog => "delete_microblog",
            Self::CreateRelation => "create_relation",
            Self::DeleteRelation => "delete_relation",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime authorizer.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    registry: Arc<TokenRegistry>,
}

impl AuthorizationGate {
    pub fn new(registry: Arc<TokenRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<TokenRegistry> {
        &self.registry
    }

    /// Validate and consume `token_id` for `permission`.
    ///
    /// `true` means the token was spent on this call.
    pub fn authorize(&self, token_id: &str, permission: Permission) -> bool {
        let granted = self
            .registry
            .validate_and_consume(token_id, permission.as_str());
        if !granted {
            warn!(
                token = short_id(token_id),
                permission = permission.as_str(),
                "authorization rejected"
            );
        }
        granted
    }
}
