//! I/O boundary traits for testability
//!
//! These traits abstract the external collaborators (artifact decoding, the
//! persistent node store, the financial ledger), allowing services to be
//! tested with in-memory implementations.

use std::io;
use std::path::Path;

/// One node as handed to the persistent store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Caller-supplied key, also the persistent key
    pub key: String,
    /// Display label
    pub label: String,
    /// Owning company
    pub company: String,
    /// Resolved parent key, None for roots
    pub parent: Option<String>,
    /// Group nodes may have children
    pub is_group: bool,
    /// Bypass the store's root-name rule (root label must equal the
    /// company name); set for parentless nodes since custom ids are allowed
    pub relaxed: bool,
}

/// The three default-node reference fields a company carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSlot {
    Primary,
    RoundOff,
    Depreciation,
}

impl DefaultSlot {
    pub const ALL: [DefaultSlot; 3] = [
        DefaultSlot::Primary,
        DefaultSlot::RoundOff,
        DefaultSlot::Depreciation,
    ];
}

/// Artifact decoding abstraction.
///
/// Returns data rows as ordered string arrays, header row discarded.
/// Byte-level format concerns live entirely behind this seam.
pub trait RowSource: Send + Sync {
    fn read_rows(&self, path: &Path) -> io::Result<Vec<Vec<String>>>;
}

/// Persistent tree-node store abstraction.
///
/// `begin`/`commit`/`rollback` bracket one import attempt; `commit` is the
/// durable flush, so an aborted import must leave prior state observable.
pub trait NodeStore: Send + Sync {
    /// Create a node; the parent, if any, must already exist.
    fn create_node(&self, record: &NodeRecord) -> io::Result<()>;

    /// Delete a single node by key.
    fn delete_node(&self, company: &str, key: &str) -> io::Result<()>;

    /// Existing node keys for a company, deepest first, safe for ordered
    /// deletion under referential constraints.
    fn node_keys_deepest_first(&self, company: &str) -> io::Result<Vec<String>>;

    /// Key of the company's root node (no parent), if one exists.
    fn root_node(&self, company: &str) -> io::Result<Option<String>>;

    fn set_default_node(&self, company: &str, slot: DefaultSlot, key: &str) -> io::Result<()>;

    fn clear_default_nodes(&self, company: &str) -> io::Result<()>;

    fn begin(&self) -> io::Result<()>;

    fn commit(&self) -> io::Result<()>;

    fn rollback(&self) -> io::Result<()>;
}

/// Financial ledger abstraction: entries referencing a company's tree nodes
/// block a destructive import unless forcibly deleted.
pub trait LedgerStore: Send + Sync {
    fn count_entries(&self, company: &str) -> io::Result<usize>;

    /// Delete all entries referencing the company's nodes; returns the count.
    fn delete_entries(&self, company: &str) -> io::Result<usize>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// CSV artifact decoder.
///
/// Flexible row widths are passed through untouched; width policy belongs
/// to the validator, which wants the real maximum for its error message.
#[derive(Debug, Default)]
pub struct CsvRowSource;

impl RowSource for CsvRowSource {
    fn read_rows(&self, path: &Path) -> io::Result<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(csv_to_io)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_to_io)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        // Header row is required and discarded
        if !rows.is_empty() {
            rows.remove(0);
        }
        Ok(rows)
    }
}

fn csv_to_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => io_err,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{other:?}")),
    }
}
