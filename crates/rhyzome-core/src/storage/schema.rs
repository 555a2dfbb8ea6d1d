//! SQLite schema for the graph store.
//!
//! Tables:
//! - `nodes`: id/value pairs, upserted by id
//! - `relations`: append-only directed edges, no foreign keys into `nodes`

/// DDL for the node and relation tables.
///
/// Safe to run on every open.
pub const GRAPH_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    id      TEXT PRIMARY KEY,
    value   TEXT NOT NULL
);

-- No uniqueness: duplicate edges are kept as separate rows.
CREATE TABLE IF NOT EXISTS relations (
    name     TEXT NOT NULL,
    from_id  TEXT NOT NULL,
    to_id    TEXT NOT NULL
);

-- Query and delete predicates
CREATE INDEX IF NOT EXISTS idx_relations_from_id
    ON relations(from_id);
CREATE INDEX IF NOT EXISTS idx_relations_name
    ON relations(name);
"#;
