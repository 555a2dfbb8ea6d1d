//! HTTP surface for the Rhyzome microblog graph store.
//!
//! Routing, JSON bodies, bearer-token extraction and the admin-password check
//! live here; storage and token semantics live in `rhyzome-core`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::ServerArgs;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
