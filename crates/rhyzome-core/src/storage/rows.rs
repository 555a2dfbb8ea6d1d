use serde::{Deserialize, Serialize};

/// A directed, named edge between two node ids.
///
/// Neither end has to exist in the node table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub from_id: String,
    pub to_id: String,
}

impl Relation {
    pub fn new(
        from_id: impl Into<String>,
        name: impl Into<String>,
        to_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}
