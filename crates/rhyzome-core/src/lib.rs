//! Storage and authorization kernel for Rhyzome.
//!
//! Two independent halves:
//!
//! - [`storage`]: a SQLite-backed node table plus a directed, named relation
//!   table. No authorization awareness.
//! - [`runtime`]: the in-memory [`TokenRegistry`] of single-use,
//!   permission-scoped tokens and the [`AuthorizationGate`] that request
//!   handlers call once per mutating operation.
//!
//! ```text
//!   request handler
//!        │  token + permission
//!        ▼
//!  ┌───────────────────┐   validate_and_consume   ┌────────────────┐
//!  │ AuthorizationGate │ ───────────────────────▶ │ TokenRegistry  │
//!  └───────────────────┘                          │ (process mem)  │
//!        │  ok                                    └────────────────┘
//!        ▼
//!  ┌───────────────────┐
//!  │ Store (SQLite)    │  nodes(id, value) / relations(name, from_id, to_id)
//!  └───────────────────┘
//! ```

pub mod collection;
pub mod runtime;
pub mod storage;

pub use collection::{Collection, MICROBLOG_COLLECTION};
pub use runtime::{AuthorizationGate, Permission, Token, TokenRegistry};
pub use storage::{Relation, Store, StoreError, WalkOrder, MEMORY_LOCATION};
