//! Row validation: shape checks and field normalization.
//!
//! Collects every violation (not just the first) into one aggregated report
//! so the caller can fix the whole artifact in a single pass. Any violation
//! fails the batch atomically; there is no partial import.

use std::collections::HashMap;

use itertools::Itertools;

use crate::domain::entities::{parse_flag, DuplicatePolicy, Node, RawRow, COLUMN_COUNT};
use crate::domain::error::{DomainError, DomainResult};

/// Artifact line number of a data row (line 1 is the discarded header).
fn line_no(row_index: usize) -> usize {
    row_index + 2
}

/// Validate raw rows into trimmed `Node`s.
///
/// Row order is preserved. Under [`DuplicatePolicy::LastWins`] duplicate ids
/// pass through unchanged; the builder's index step resolves them.
pub fn validate_rows(rows: &[RawRow], policy: DuplicatePolicy) -> DomainResult<Vec<Node>> {
    if rows.is_empty() {
        return Err(DomainError::NoData);
    }

    // The uniform-width check reports against the widest row observed,
    // which makes "expected 4, found 5" messages possible for over-wide data.
    let max_width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if max_width != COLUMN_COUNT {
        return Err(DomainError::Shape {
            report: format!(
                "expected {} columns (ID, Cost Center Name, Parent Cost Center, Is Group), \
                 found {}, please check the template",
                COLUMN_COUNT, max_width
            ),
        });
    }

    let mut violations: Vec<String> = Vec::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut nodes = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        if row.len() < COLUMN_COUNT {
            violations.push(format!(
                "row {}: expected {} columns, found {}",
                line_no(i),
                COLUMN_COUNT,
                row.len()
            ));
            continue;
        }

        let id = row[0].trim().to_string();
        let name = row[1].trim().to_string();
        let parent_id = row[2].trim().to_string();
        let is_group = parse_flag(&row[3]);

        if id.is_empty() {
            violations.push(format!("row {}: ID is required", line_no(i)));
            continue;
        }
        if name.is_empty() {
            violations.push(format!("row {}: Cost Center Name is required", line_no(i)));
            continue;
        }

        if let Some(&seen_at) = first_seen.get(&id) {
            if policy == DuplicatePolicy::Reject {
                violations.push(format!(
                    "row {}: duplicate ID '{}' (first used in row {})",
                    line_no(i),
                    id,
                    line_no(seen_at)
                ));
                continue;
            }
        } else {
            first_seen.insert(id.clone(), i);
        }

        nodes.push(Node {
            id,
            name,
            parent_id,
            is_group,
        });
    }

    if !violations.is_empty() {
        return Err(DomainError::Shape {
            report: violations.iter().join("\n"),
        });
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_is_distinct_error() {
        assert_eq!(
            validate_rows(&[], DuplicatePolicy::Reject),
            Err(DomainError::NoData)
        );
    }

    #[test]
    fn narrow_rows_report_max_width() {
        let rows = vec![row(&["A", "Root", ""])];
        let err = validate_rows(&rows, DuplicatePolicy::Reject).unwrap_err();
        match err {
            DomainError::Shape { report } => {
                assert!(report.contains("expected 4"));
                assert!(report.contains("found 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn violations_are_aggregated_with_line_numbers() {
        let rows = vec![
            row(&["", "No Id", "", "0"]),
            row(&["B", "", "", "0"]),
            row(&["C", "Fine", "", "1"]),
        ];
        let err = validate_rows(&rows, DuplicatePolicy::Reject).unwrap_err();
        match err {
            DomainError::Shape { report } => {
                let lines: Vec<&str> = report.lines().collect();
                assert_eq!(lines.len(), 2);
                assert!(lines[0].starts_with("row 2:"));
                assert!(lines[1].starts_with("row 3:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fields_are_trimmed() {
        let rows = vec![row(&[" A ", " Root ", "  ", " 1 "])];
        let nodes = validate_rows(&rows, DuplicatePolicy::Reject).unwrap();
        assert_eq!(nodes[0].id, "A");
        assert_eq!(nodes[0].name, "Root");
        assert_eq!(nodes[0].parent_id, "");
        assert!(nodes[0].is_group);
    }

    #[test]
    fn duplicates_rejected_by_default_policy() {
        let rows = vec![row(&["A", "One", "", "1"]), row(&["A", "Two", "", "1"])];
        let err = validate_rows(&rows, DuplicatePolicy::Reject).unwrap_err();
        match err {
            DomainError::Shape { report } => assert!(report.contains("duplicate ID 'A'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicates_pass_through_under_last_wins() {
        let rows = vec![row(&["A", "One", "", "1"]), row(&["A", "Two", "", "1"])];
        let nodes = validate_rows(&rows, DuplicatePolicy::LastWins).unwrap();
        assert_eq!(nodes.len(), 2);
    }
}
