//! Store implementations: in-memory (tests) and JSON-file-backed (CLI).
//!
//! Both enforce the store-side rules the orchestrator relies on: parents
//! must exist before children, keys are unique per company, and a
//! non-relaxed root's label must equal the company name. Transactions are
//! snapshot-based; `JsonStore` only touches disk on commit, so an aborted
//! import leaves the persisted state untouched.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infrastructure::traits::{DefaultSlot, LedgerStore, NodeRecord, NodeStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredNode {
    key: String,
    label: String,
    parent: Option<String>,
    is_group: bool,
    depth: usize,
}

/// One financial ledger entry referencing a tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub node_key: String,
    pub remark: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DefaultRefs {
    primary: Option<String>,
    round_off: Option<String>,
    depreciation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CompanyState {
    nodes: Vec<StoredNode>,
    defaults: DefaultRefs,
    ledger: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    companies: BTreeMap<String, CompanyState>,
}

#[derive(Debug, Default)]
struct StoreInner {
    state: StoreState,
    snapshot: Option<StoreState>,
}

/// In-memory node + ledger store with snapshot transactions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger entry referencing one of the company's nodes. Entries
    /// normally come from the surrounding accounting system; this exists so
    /// conflict handling is testable.
    pub fn seed_ledger_entry(&self, company: &str, node_key: &str, remark: &str) {
        let mut inner = self.inner.write().unwrap();
        inner
            .state
            .companies
            .entry(company.to_string())
            .or_default()
            .ledger
            .push(LedgerEntry {
                node_key: node_key.to_string(),
                remark: remark.to_string(),
            });
    }

    /// Node keys for a company, in creation order.
    pub fn node_keys(&self, company: &str) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        inner
            .state
            .companies
            .get(company)
            .map(|c| c.nodes.iter().map(|n| n.key.clone()).collect())
            .unwrap_or_default()
    }

    /// Resolved parent of a stored node.
    pub fn parent_of(&self, company: &str, key: &str) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner
            .state
            .companies
            .get(company)?
            .nodes
            .iter()
            .find(|n| n.key == key)?
            .parent
            .clone()
    }

    /// The company's default-node reference for a slot.
    pub fn default_node(&self, company: &str, slot: DefaultSlot) -> Option<String> {
        let inner = self.inner.read().unwrap();
        let defaults = &inner.state.companies.get(company)?.defaults;
        match slot {
            DefaultSlot::Primary => defaults.primary.clone(),
            DefaultSlot::RoundOff => defaults.round_off.clone(),
            DefaultSlot::Depreciation => defaults.depreciation.clone(),
        }
    }

    fn load_state(&self, state: StoreState) {
        self.inner.write().unwrap().state = state;
    }

    fn state_clone(&self) -> StoreState {
        self.inner.read().unwrap().state.clone()
    }
}

impl NodeStore for MemoryStore {
    fn create_node(&self, record: &NodeRecord) -> io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        let company = inner
            .state
            .companies
            .entry(record.company.clone())
            .or_default();

        if company.nodes.iter().any(|n| n.key == record.key) {
            return Err(invalid(format!("node '{}' already exists", record.key)));
        }

        let depth = match &record.parent {
            Some(parent_key) => {
                let parent = company
                    .nodes
                    .iter()
                    .find(|n| n.key == *parent_key)
                    .ok_or_else(|| invalid(format!("parent node '{parent_key}' not found")))?;
                if !parent.is_group {
                    debug!("creating child under non-group node '{}'", parent_key);
                }
                parent.depth + 1
            }
            None => {
                // Store rule: a root's label must equal the company name,
                // unless the caller asked for relaxed validation.
                if !record.relaxed && record.label != record.company {
                    return Err(invalid(format!(
                        "root node label '{}' must equal company name '{}'",
                        record.label, record.company
                    )));
                }
                0
            }
        };

        company.nodes.push(StoredNode {
            key: record.key.clone(),
            label: record.label.clone(),
            parent: record.parent.clone(),
            is_group: record.is_group,
            depth,
        });
        Ok(())
    }

    fn delete_node(&self, company: &str, key: &str) -> io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        let state = inner
            .state
            .companies
            .get_mut(company)
            .ok_or_else(|| invalid(format!("unknown company '{company}'")))?;

        // Referential constraint: children must go first
        if state.nodes.iter().any(|n| n.parent.as_deref() == Some(key)) {
            return Err(invalid(format!("node '{key}' still has children")));
        }

        let before = state.nodes.len();
        state.nodes.retain(|n| n.key != key);
        if state.nodes.len() == before {
            return Err(invalid(format!("node '{key}' not found")));
        }
        Ok(())
    }

    fn node_keys_deepest_first(&self, company: &str) -> io::Result<Vec<String>> {
        let inner = self.inner.read().unwrap();
        let Some(state) = inner.state.companies.get(company) else {
            return Ok(Vec::new());
        };

        let mut indexed: Vec<(usize, &StoredNode)> = state.nodes.iter().enumerate().collect();
        // Deepest first; ties broken by reverse creation order
        indexed.sort_by(|(ia, a), (ib, b)| b.depth.cmp(&a.depth).then(ib.cmp(ia)));
        Ok(indexed.into_iter().map(|(_, n)| n.key.clone()).collect())
    }

    fn root_node(&self, company: &str) -> io::Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .state
            .companies
            .get(company)
            .and_then(|c| c.nodes.iter().find(|n| n.parent.is_none()))
            .map(|n| n.key.clone()))
    }

    fn set_default_node(&self, company: &str, slot: DefaultSlot, key: &str) -> io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        let state = inner
            .state
            .companies
            .get_mut(company)
            .ok_or_else(|| invalid(format!("unknown company '{company}'")))?;

        if !state.nodes.iter().any(|n| n.key == key) {
            return Err(invalid(format!("node '{key}' not found")));
        }

        let field = match slot {
            DefaultSlot::Primary => &mut state.defaults.primary,
            DefaultSlot::RoundOff => &mut state.defaults.round_off,
            DefaultSlot::Depreciation => &mut state.defaults.depreciation,
        };
        *field = Some(key.to_string());
        Ok(())
    }

    fn clear_default_nodes(&self, company: &str) -> io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        if let Some(state) = inner.state.companies.get_mut(company) {
            state.defaults = DefaultRefs::default();
        }
        Ok(())
    }

    fn begin(&self) -> io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        let snapshot = inner.state.clone();
        inner.snapshot = Some(snapshot);
        Ok(())
    }

    fn commit(&self) -> io::Result<()> {
        self.inner.write().unwrap().snapshot = None;
        Ok(())
    }

    fn rollback(&self) -> io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        if let Some(snapshot) = inner.snapshot.take() {
            inner.state = snapshot;
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn count_entries(&self, company: &str) -> io::Result<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .state
            .companies
            .get(company)
            .map(|c| c.ledger.len())
            .unwrap_or(0))
    }

    fn delete_entries(&self, company: &str) -> io::Result<usize> {
        let mut inner = self.inner.write().unwrap();
        let Some(state) = inner.state.companies.get_mut(company) else {
            return Ok(0);
        };
        let count = state.ledger.len();
        state.ledger.clear();
        Ok(count)
    }
}

/// JSON-file-backed store for the CLI.
///
/// Loads the whole state on open and writes it back on `commit`, which is
/// the durable flush point of an import attempt.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    mem: MemoryStore,
}

impl JsonStore {
    pub fn open(path: &Path) -> io::Result<Self> {
        let mem = MemoryStore::new();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let state: StoreState = serde_json::from_str(&content)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            mem.load_state(state);
        }
        Ok(Self {
            path: path.to_path_buf(),
            mem,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed a ledger entry and persist immediately (outside any import).
    pub fn seed_ledger_entry(&self, company: &str, node_key: &str, remark: &str) -> io::Result<()> {
        self.mem.seed_ledger_entry(company, node_key, remark);
        self.persist()
    }

    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.mem.state_clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(&self.path, content)
    }
}

impl NodeStore for JsonStore {
    fn create_node(&self, record: &NodeRecord) -> io::Result<()> {
        self.mem.create_node(record)
    }

    fn delete_node(&self, company: &str, key: &str) -> io::Result<()> {
        self.mem.delete_node(company, key)
    }

    fn node_keys_deepest_first(&self, company: &str) -> io::Result<Vec<String>> {
        self.mem.node_keys_deepest_first(company)
    }

    fn root_node(&self, company: &str) -> io::Result<Option<String>> {
        self.mem.root_node(company)
    }

    fn set_default_node(&self, company: &str, slot: DefaultSlot, key: &str) -> io::Result<()> {
        self.mem.set_default_node(company, slot, key)
    }

    fn clear_default_nodes(&self, company: &str) -> io::Result<()> {
        self.mem.clear_default_nodes(company)
    }

    fn begin(&self) -> io::Result<()> {
        self.mem.begin()
    }

    fn commit(&self) -> io::Result<()> {
        self.mem.commit()?;
        self.persist()
    }

    fn rollback(&self) -> io::Result<()> {
        self.mem.rollback()
    }
}

impl LedgerStore for JsonStore {
    fn count_entries(&self, company: &str) -> io::Result<usize> {
        self.mem.count_entries(company)
    }

    fn delete_entries(&self, company: &str) -> io::Result<usize> {
        self.mem.delete_entries(company)
    }
}
