//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

/// One decoded artifact row, not yet validated.
///
/// Nominally four cells: `(id, name, parent_id, is_group)`. Shape problems
/// (short rows, blank required cells) are the validator's concern.
pub type RawRow = Vec<String>;

/// Number of columns every artifact row must carry.
pub const COLUMN_COUNT: usize = 4;

/// Artifact header, discarded on read and written on template export.
pub const COLUMN_HEADER: [&str; COLUMN_COUNT] =
    ["ID", "Cost Center Name", "Parent Cost Center", "Is Group"];

/// A validated cost-center record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Caller-supplied key, unique within one import; doubles as the
    /// persistent key in the store.
    pub id: String,
    /// Display label, non-empty.
    pub name: String,
    /// Id of the parent record; empty string means root.
    pub parent_id: String,
    /// Group nodes may have children.
    pub is_group: bool,
}

impl Node {
    /// Roots have no parent; a self-referencing parent is a synonym for root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty() || self.parent_id == self.id
    }
}

/// Flat, parent-annotated entry produced by the materializer.
///
/// `parent_id` is the actual resolved parent id (empty for roots), so a
/// pre-order sequence of these is safe for ordered creation in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedNode {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub is_group: bool,
}

/// What to do when two rows carry the same id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Report duplicates in the aggregated validation error.
    #[default]
    Reject,
    /// Silently keep the last occurrence.
    LastWins,
}

/// Lenient parsing for the `Is Group` cell: a leading integer prefix counts,
/// anything else is 0. "1" and "1x" are truthy, "" and "yes" are not.
pub fn parse_flag(cell: &str) -> bool {
    let cell = cell.trim();
    let digit_len = cell.chars().take_while(|c| c.is_ascii_digit()).count();
    cell[..digit_len].parse::<u64>().map(|n| n != 0).unwrap_or(false)
}
