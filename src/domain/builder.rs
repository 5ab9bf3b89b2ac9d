//! Forest builder: resolves flat parent references into nested trees.
//!
//! Rows arrive in arbitrary order; a child may be listed before its parent.
//! Every row is resolved into its root-to-node path first, then the paths
//! are replayed into an arena [`Forest`], creating intermediate levels on
//! first contact.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::debug;

use crate::domain::entities::{DuplicatePolicy, Node, RawRow};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::forest::Forest;
use crate::domain::validator::validate_rows;

/// Constructs hierarchical forests from flat cost-center rows.
#[derive(Debug, Default)]
pub struct ForestBuilder {
    policy: DuplicatePolicy,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Validate raw rows and assemble the forest.
    pub fn build(&self, rows: &[RawRow]) -> DomainResult<Forest> {
        let nodes = validate_rows(rows, self.policy)?;
        self.build_from_nodes(&nodes)
    }

    /// Assemble a forest from already-validated nodes.
    ///
    /// Root order in the result follows the first-seen order of rows whose
    /// path ends at that root; sibling order is first contact.
    pub fn build_from_nodes(&self, nodes: &[Node]) -> DomainResult<Forest> {
        // Index by id; overwriting implements last-write-wins, which only
        // matters under DuplicatePolicy::LastWins (Reject never gets here
        // with duplicates).
        let mut by_id: HashMap<&str, &Node> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            by_id.insert(node.id.as_str(), node);
        }

        let mut forest = Forest::new();
        for node in nodes {
            let path = resolve_path(&by_id, &node.id)?;
            debug!("path for {}: {:?}", node.id, path);

            let mut parent: Option<Index> = None;
            for id in path {
                let data = (*by_id.get(id).expect("path ids come from the index")).clone();
                let idx = forest.insert_node(data, parent);
                parent = Some(idx);
            }
        }

        Ok(forest)
    }
}

/// Walk `parent_id` references upward from `leaf_id` to a root, then return
/// the path root-first.
///
/// An empty or self-referencing parent terminates the walk (both mean
/// "root"). A reference to an id absent from the index fails with
/// [`DomainError::MissingParent`]; an id seen twice before reaching a root
/// fails with [`DomainError::CycleDetected`] instead of recursing forever.
fn resolve_path<'a>(
    by_id: &HashMap<&'a str, &'a Node>,
    leaf_id: &'a str,
) -> DomainResult<Vec<&'a str>> {
    let mut path = vec![leaf_id];
    let mut visited: HashSet<&str> = HashSet::from([leaf_id]);

    let mut current = *by_id
        .get(leaf_id)
        .expect("leaf ids come from the validated row set");

    while !current.is_root() {
        let parent_id = current.parent_id.as_str();
        let parent = by_id
            .get(parent_id)
            .ok_or_else(|| DomainError::MissingParent(parent_id.to_string()))?;

        if !visited.insert(parent.id.as_str()) {
            return Err(DomainError::CycleDetected(parent.id.clone()));
        }

        path.push(parent.id.as_str());
        current = parent;
    }

    path.reverse();
    Ok(path)
}
