//! Tree materialization: flat, parent-annotated views over a forest.

use crate::domain::entities::AnnotatedNode;
use crate::domain::forest::Forest;

/// Full pre-order walk: one entry per node, parents before children.
///
/// Each entry carries the actual resolved parent id (empty for roots), so
/// replaying the sequence against a store never references a parent that
/// does not exist yet.
pub fn materialize(forest: &Forest) -> Vec<AnnotatedNode> {
    forest
        .iter()
        .map(|(_, node)| {
            let parent_id = node
                .parent
                .and_then(|p| forest.get_node(p))
                .map(|p| p.data.id.clone())
                .unwrap_or_default();
            AnnotatedNode {
                id: node.data.id.clone(),
                name: node.data.name.clone(),
                parent_id,
                is_group: node.data.is_group,
            }
        })
        .collect()
}

/// Single-level view for interactive drill-down.
///
/// The whole forest is materialized on every call and filtered by resolved
/// parent id; `None` selects the roots. No caching between calls.
pub fn children_of(forest: &Forest, parent: Option<&str>) -> Vec<AnnotatedNode> {
    let target = parent.unwrap_or("");
    materialize(forest)
        .into_iter()
        .filter(|entry| entry.parent_id == target)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::ForestBuilder;
    use crate::domain::entities::Node;

    fn node(id: &str, parent_id: &str) -> Node {
        Node {
            id: id.to_string(),
            name: format!("Name {id}"),
            parent_id: parent_id.to_string(),
            is_group: parent_id.is_empty(),
        }
    }

    fn sample_forest() -> Forest {
        let nodes = vec![
            node("A", ""),
            node("B", "A"),
            node("C", "A"),
            node("D", "C"),
            node("X", ""),
        ];
        ForestBuilder::new().build_from_nodes(&nodes).unwrap()
    }

    #[test]
    fn one_entry_per_id_no_dangling_parents() {
        let forest = sample_forest();
        let entries = materialize(&forest);
        assert_eq!(entries.len(), 5);

        for entry in &entries {
            assert!(
                entry.parent_id.is_empty() || entries.iter().any(|e| e.id == entry.parent_id),
                "dangling parent {}",
                entry.parent_id
            );
        }
    }

    #[test]
    fn parents_precede_children() {
        let forest = sample_forest();
        let entries = materialize(&forest);
        let pos = |id: &str| entries.iter().position(|e| e.id == id).unwrap();
        assert!(pos("A") < pos("B"));
        assert!(pos("A") < pos("C"));
        assert!(pos("C") < pos("D"));
    }

    #[test]
    fn children_of_none_returns_roots() {
        let forest = sample_forest();
        let roots: Vec<String> = children_of(&forest, None).into_iter().map(|e| e.id).collect();
        assert_eq!(roots, vec!["A", "X"]);
    }

    #[test]
    fn children_of_parent_filters_single_level() {
        let forest = sample_forest();
        let kids: Vec<String> = children_of(&forest, Some("A"))
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(kids, vec!["B", "C"]);
    }
}
