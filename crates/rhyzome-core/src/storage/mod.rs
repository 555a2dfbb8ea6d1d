//! Node/relation persistence.

pub mod rows;
pub mod schema;
pub mod store;
pub mod walk;

pub use rows::Relation;
pub use schema::GRAPH_SCHEMA;
pub use store::{Store, StoreError, MEMORY_LOCATION};
pub use walk::WalkOrder;
