//! Named collections of nodes, indexed through sentinel relations.
//!
//! A collection called `c` is the set of relations `c --c--> id`: the
//! collection name doubles as the relation name and as the origin id. Listing
//! the collection is `query_relations_from(c)`.
//!
//! Because the index is an ordinary relation, `delete_relations_by_name(c)`
//! empties the collection index too (the member nodes stay).

use crate::storage::{Relation, Store, StoreError};
use tracing::debug;
use uuid::Uuid;

/// Collection holding every microblog post.
pub const MICROBLOG_COLLECTION: &str = "microblog";

/// A sentinel-relation collection over a [`Store`].
#[derive(Clone)]
pub struct Collection {
    store: Store,
    name: &'static str,
}

impl Collection {
    pub fn new(store: Store, name: &'static str) -> Self {
        Self { store, name }
    }

    pub fn microblogs(store: Store) -> Self {
        Self::new(store, MICROBLOG_COLLECTION)
    }

    /// Store `value` under a freshly generated id and index it.
    ///
    /// The node write and the index write are separate statements; a failure
    /// between them leaves an unindexed node behind.
    pub fn create(&self, value: &str) -> Result<String, StoreError> {
        let id = new_node_id();
        self.store.set_node(&id, value)?;
        self.store.create_relation(self.name, self.name, &id)?;
        debug!(collection = self.name, node_id = %id, "collection member created");
        Ok(id)
    }

    /// Index relations of every member, unordered.
    pub fn list(&self) -> Result<Vec<Relation>, StoreError> {
        self.store.query_relations_from(self.name)
    }
}

/// Opaque, URL-safe node id.
pub fn new_node_id() -> String {
    Uuid::new_v4().simple().to_string()
}
