//! Tests for flat materialized views over a built forest

use ccimport::domain::{children_of, materialize, ForestBuilder, RawRow};

fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_forward_references_when_materialized_then_parents_precede_children() {
    // Arrange: children listed before their parents in the artifact
    let rows = vec![
        row(&["LEAF", "Leaf", "MID", "0"]),
        row(&["MID", "Mid", "TOP", "1"]),
        row(&["TOP", "Top", "", "1"]),
    ];

    // Act
    let forest = ForestBuilder::new().build(&rows).unwrap();
    let entries = materialize(&forest);

    // Assert
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["TOP", "MID", "LEAF"]);
    assert_eq!(entries[0].parent_id, "");
    assert_eq!(entries[1].parent_id, "TOP");
    assert_eq!(entries[2].parent_id, "MID");
}

#[test]
fn given_self_parent_row_when_materialized_then_annotated_as_root() {
    // Arrange: "A" names itself as parent, which marks it a root
    let rows = vec![row(&["A", "Alpha", "A", "1"]), row(&["B", "Beta", "A", "0"])];

    // Act
    let forest = ForestBuilder::new().build(&rows).unwrap();
    let entries = materialize(&forest);

    // Assert
    assert_eq!(entries[0].id, "A");
    assert_eq!(entries[0].parent_id, "");
    assert_eq!(entries[1].parent_id, "A");
}

#[test]
fn given_two_roots_when_listing_children_of_none_then_both_roots_in_row_order() {
    // Arrange
    let rows = vec![
        row(&["A", "Alpha", "", "1"]),
        row(&["B", "Beta", "A", "0"]),
        row(&["X", "Xenon", "", "1"]),
    ];
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Act
    let roots: Vec<String> = children_of(&forest, None).into_iter().map(|e| e.id).collect();

    // Assert
    assert_eq!(roots, vec!["A", "X"]);
}

#[test]
fn given_nested_chart_when_listing_children_then_only_direct_children_returned() {
    // Arrange: grandchild must not appear under the grandparent
    let rows = vec![
        row(&["A", "Alpha", "", "1"]),
        row(&["B", "Beta", "A", "1"]),
        row(&["C", "Gamma", "B", "0"]),
    ];
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Act
    let under_a: Vec<String> = children_of(&forest, Some("A"))
        .into_iter()
        .map(|e| e.id)
        .collect();

    // Assert
    assert_eq!(under_a, vec!["B"]);
}

#[test]
fn given_unknown_parent_filter_when_listing_children_then_empty() {
    // Arrange
    let rows = vec![row(&["A", "Alpha", "", "1"])];
    let forest = ForestBuilder::new().build(&rows).unwrap();

    // Act / Assert
    assert!(children_of(&forest, Some("NOPE")).is_empty());
}
