//! Runtime token authorization.
//!
//! Mutating requests present a bearer token; the [`AuthorizationGate`] asks the
//! [`TokenRegistry`] to validate and consume it in one step.
//!
//! ```text
//! ┌──────────────┐  authorize(token, Permission)  ┌───────────────────┐
//! │   handler    │ ─────────────────────────────▶ │ AuthorizationGate │
//! └──────────────┘                                └─────────┬─────────┘
//!                                                           │ validate_and_consume
//!                                                 ┌─────────▼─────────┐
//!                                                 │   TokenRegistry   │
//!                                                 │  Mutex<HashMap>   │
//!                                                 └───────────────────┘
//! ```

mod authorizer;
mod token_registry;

pub use authorizer::{AuthorizationGate, Permission};
pub use token_registry::{Token, TokenRegistry, TOKEN_ID_BYTES};
