//! Tests for ForestBuilder

use ccimport::domain::{DomainError, DuplicatePolicy, ForestBuilder, RawRow};

fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_two_level_rows_when_building_then_nests_child_under_root() {
    // Arrange
    let rows = vec![row(&["A", "Root", "", "1"]), row(&["B", "Child", "A", "0"])];

    // Act
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Assert
    assert_eq!(forest.roots().len(), 1);
    let a = forest.find("A").unwrap();
    let b = forest.find("B").unwrap();
    let root = forest.get_node(a).unwrap();
    assert_eq!(root.data.name, "Root");
    assert!(root.data.is_group);
    assert_eq!(root.children, vec![b]);
    assert_eq!(forest.get_node(b).unwrap().parent, Some(a));
}

#[test]
fn given_child_listed_before_parent_when_building_then_resolves_forward_reference() {
    // Arrange
    let rows = vec![
        row(&["LEAF", "Leaf", "MID", "0"]),
        row(&["MID", "Middle", "TOP", "1"]),
        row(&["TOP", "Top", "", "1"]),
    ];

    // Act
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Assert
    assert_eq!(forest.roots().len(), 1);
    assert_eq!(forest.depth(), 3);
    let mid = forest.find("MID").unwrap();
    let top = forest.find("TOP").unwrap();
    assert_eq!(forest.get_node(mid).unwrap().parent, Some(top));
}

#[test]
fn given_missing_parent_when_building_then_error_names_offending_id() {
    // Arrange
    let rows = vec![row(&["B", "Orphan", "GHOST", "0"])];

    // Act
    let err = ForestBuilder::new().build(&rows).unwrap_err();

    // Assert
    assert_eq!(err, DomainError::MissingParent("GHOST".to_string()));
    assert!(err.to_string().contains("GHOST"));
}

#[test]
fn given_self_referencing_row_when_building_then_treated_as_root() {
    // Arrange
    let rows = vec![
        row(&["A", "Self Root", "A", "1"]),
        row(&["B", "Child", "A", "0"]),
    ];

    // Act
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Assert
    assert_eq!(forest.roots().len(), 1);
    let a = forest.find("A").unwrap();
    assert!(forest.get_node(a).unwrap().parent.is_none());
}

#[test]
fn given_genuine_cycle_when_building_then_fails_with_cycle_error() {
    // Arrange: A -> B -> A, neither self-referencing
    let rows = vec![row(&["A", "One", "B", "1"]), row(&["B", "Two", "A", "1"])];

    // Act
    let err = ForestBuilder::new().build(&rows).unwrap_err();

    // Assert
    assert!(matches!(err, DomainError::CycleDetected(_)));
}

#[test]
fn given_disjoint_trees_when_building_then_keeps_first_seen_root_order() {
    // Arrange
    let rows = vec![
        row(&["X", "Second Tree", "", "0"]),
        row(&["A", "First Tree", "", "1"]),
        row(&["B", "Child", "A", "0"]),
    ];

    // Act
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Assert
    let roots: Vec<String> = forest
        .roots()
        .iter()
        .map(|&r| forest.get_node(r).unwrap().data.id.clone())
        .collect();
    assert_eq!(roots, vec!["X", "A"]);
}

#[test]
fn given_duplicate_ids_when_building_with_last_wins_then_keeps_last_payload() {
    // Arrange
    let rows = vec![
        row(&["A", "First", "", "1"]),
        row(&["A", "Second", "", "1"]),
    ];

    // Act
    let forest = ForestBuilder::with_policy(DuplicatePolicy::LastWins)
        .build(&rows)
        .unwrap();

    // Assert
    assert_eq!(forest.len(), 1);
    let a = forest.find("A").unwrap();
    assert_eq!(forest.get_node(a).unwrap().data.name, "Second");
}

#[test]
fn given_duplicate_ids_when_building_with_reject_then_fails() {
    // Arrange
    let rows = vec![
        row(&["A", "First", "", "1"]),
        row(&["A", "Second", "", "1"]),
    ];

    // Act
    let err = ForestBuilder::new().build(&rows).unwrap_err();

    // Assert
    assert!(matches!(err, DomainError::Shape { .. }));
}
