//! Graph walks built on [`Store::query_relations_from`].

use super::store::{Store, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Visit order for [`Store::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalkOrder {
    #[default]
    #[serde(rename = "bfs")]
    BreadthFirst,
    #[serde(rename = "dfs")]
    DepthFirst,
}

impl WalkOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "bfs",
            Self::DepthFirst => "dfs",
        }
    }
}

impl Store {
    /// Ids reachable from `start` over relations of any name, `start` first.
    ///
    /// Each id appears once. Ids are followed whether or not a node with that
    /// id exists.
    pub fn walk(&self, start: &str, order: WalkOrder) -> Result<Vec<String>, StoreError> {
        let mut seen = HashSet::from([start.to_string()]);
        let mut frontier = VecDeque::from([start.to_string()]);
        let mut visited = Vec::new();

        loop {
            let next = match order {
                WalkOrder::BreadthFirst => frontier.pop_front(),
                WalkOrder::DepthFirst => frontier.pop_back(),
            };
            let Some(id) = next else { break };

            for relation in self.query_relations_from(&id)? {
                if seen.insert(relation.to_id.clone()) {
                    frontier.push_back(relation.to_id);
                }
            }
            visited.push(id);
        }

        Ok(visited)
    }
}
