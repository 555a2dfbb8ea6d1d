//! TokenRegistry: in-memory ledger of single-use, permission-scoped tokens.
//!
//! Tokens live only in process memory and are gone after a restart. They are
//! never removed from the ledger, so an issued id can never be handed out
//! again while the process lives.

use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Random bytes per token id (hex-encoded to twice as many characters).
pub const TOKEN_ID_BYTES: usize = 32;

/// An issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: String,
    pub used: bool,
    pub permissions: BTreeSet<String>,
}

impl Token {
    fn grants(&self, permission: &str) -> bool {
        !self.used && self.permissions.contains(permission)
    }
}

/// Shared token ledger.
///
/// Share it between request handlers behind an `Arc`.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: Mutex<HashMap<String, Token>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokens(&self) -> MutexGuard<'_, HashMap<String, Token>> {
        // Every mutation is a single insert or flag write, so the map is
        // consistent even if a previous holder panicked.
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a fresh, unused token carrying `permissions`.
    pub fn issue<I, S>(&self, permissions: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permissions: BTreeSet<String> = permissions.into_iter().map(Into::into).collect();
        let mut tokens = self.tokens();

        let id = loop {
            let candidate = generate_token_id();
            if !tokens.contains_key(&candidate) {
                break candidate;
            }
        };

        info!(
            token = short_id(&id),
            permissions = ?permissions,
            "token issued"
        );
        tokens.insert(
            id.clone(),
            Token {
                id: id.clone(),
                used: false,
                permissions,
            },
        );
        id
    }

    /// Check that `token_id` exists, is unused and grants
    /// `required_permission`; if so, mark it used.
    ///
    /// Check and flip happen under one lock, so concurrent callers presenting
    /// the same token see at most one `true`. A `false` leaves the token
    /// untouched.
    pub fn validate_and_consume(&self, token_id: &str, required_permission: &str) -> bool {
        let mut tokens = self.tokens();
        match tokens.get_mut(token_id) {
            Some(token) if token.grants(required_permission) => {
                token.used = true;
                debug!(
                    token = short_id(token_id),
                    permission = required_permission,
                    "token consumed"
                );
                true
            }
            _ => false,
        }
    }

    /// Snapshot of a token's current state.
    pub fn get(&self, token_id: &str) -> Option<Token> {
        self.tokens().get(token_id).cloned()
    }

    /// Number of tokens ever issued by this registry.
    pub fn len(&self) -> usize {
        self.tokens().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn generate_token_id() -> String {
    let mut bytes = [0u8; TOKEN_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Log-safe prefix of a token id.
pub(crate) fn short_id(token_id: &str) -> &str {
    token_id
        .char_indices()
        .nth(8)
        .map_or(token_id, |(end, _)| &token_id[..end])
}
