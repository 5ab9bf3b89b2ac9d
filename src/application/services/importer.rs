//! Import orchestration service
//!
//! One import attempt is a small state machine: CheckConflicts →
//! ResetTarget → Ingest → Materialize & Create → Finalize → Commit. Any
//! failure after the transaction opens rolls the store back, so a half-built
//! tree is never left behind. The preview/validate operations run the same
//! ingest pipeline without touching the store.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{children_of, materialize, AnnotatedNode, DuplicatePolicy, Forest, ForestBuilder, RawRow};
use crate::infrastructure::traits::{DefaultSlot, LedgerStore, NodeRecord, NodeStore, RowSource};

/// Result of a committed import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Nodes created in the store
    pub created: usize,
    /// Key selected as the company's primary default node
    pub default_node: Option<String>,
    /// Ledger entries removed by a forced import; advisory, not an error
    pub deleted_ledger_entries: Option<usize>,
}

/// Result of a dry-run validation: reaching this struct means importable.
#[derive(Debug, Clone, Copy)]
pub struct ValidationReport {
    pub nodes: usize,
    pub roots: usize,
    pub depth: usize,
}

/// Conflict pre-check answer.
#[derive(Debug, Clone, Copy)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub count: usize,
}

/// Orchestrates destructive chart imports against the external stores.
pub struct ImportService {
    source: Arc<dyn RowSource>,
    nodes: Arc<dyn NodeStore>,
    ledger: Arc<dyn LedgerStore>,
    policy: DuplicatePolicy,
    // Companies with an import in flight; guards full-replace runs against
    // interleaving within this process
    in_flight: Mutex<HashSet<String>>,
}

impl ImportService {
    pub fn new(
        source: Arc<dyn RowSource>,
        nodes: Arc<dyn NodeStore>,
        ledger: Arc<dyn LedgerStore>,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            source,
            nodes,
            ledger,
            policy,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Decode the artifact into raw rows, enforcing the extension policy.
    ///
    /// CSV decodes in-process; xlsx/xls are recognized but their decoding is
    /// a collaborator this build does not carry; everything else is refused.
    fn read_artifact(&self, file: &Path) -> ApplicationResult<Vec<RawRow>> {
        let extension = file
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => self
                .source
                .read_rows(file)
                .with_path_context("read artifact", file),
            "xlsx" | "xls" => Err(ApplicationError::SpreadsheetUnavailable(file.to_path_buf())),
            _ => Err(ApplicationError::UnsupportedFormat { extension }),
        }
    }

    /// Read, validate, and assemble the artifact's forest without mutating
    /// any persisted state.
    pub fn load_forest(&self, file: &Path) -> ApplicationResult<Forest> {
        let rows = self.read_artifact(file)?;
        let forest = ForestBuilder::with_policy(self.policy).build(&rows)?;
        debug!("loaded forest: {} nodes, depth {}", forest.len(), forest.depth());
        Ok(forest)
    }

    /// Dry-run validation: succeeds iff the artifact is importable.
    pub fn validate_artifact(&self, file: &Path) -> ApplicationResult<ValidationReport> {
        let forest = self.load_forest(file)?;
        Ok(ValidationReport {
            nodes: forest.len(),
            roots: forest.roots().len(),
            depth: forest.depth(),
        })
    }

    /// Full materialized pre-order listing of the artifact.
    pub fn preview(&self, file: &Path) -> ApplicationResult<Vec<AnnotatedNode>> {
        Ok(materialize(&self.load_forest(file)?))
    }

    /// Single-level drill-down; `None` selects the roots.
    pub fn children(
        &self,
        file: &Path,
        parent: Option<&str>,
    ) -> ApplicationResult<Vec<AnnotatedNode>> {
        Ok(children_of(&self.load_forest(file)?, parent))
    }

    /// Count ledger entries that would block a destructive import.
    pub fn check_conflicts(&self, company: &str) -> ApplicationResult<ConflictReport> {
        let count = self
            .ledger
            .count_entries(company)
            .with_context(format!("count ledger entries for '{company}'"))?;
        Ok(ConflictReport {
            has_conflicts: count > 0,
            count,
        })
    }

    /// Run one full import attempt, replacing the company's chart.
    pub fn import(
        &self,
        file: &Path,
        company: &str,
        force: bool,
    ) -> ApplicationResult<ImportOutcome> {
        let _guard = self.acquire(company)?;
        info!("import: file={}, company={}, force={}", file.display(), company, force);

        // CheckConflicts: abort before any mutation unless forced
        let conflicts = self.check_conflicts(company)?;
        let mut deleted_ledger_entries = None;
        if conflicts.has_conflicts {
            if !force {
                return Err(ApplicationError::Conflict {
                    count: conflicts.count,
                });
            }
            let deleted = self
                .ledger
                .delete_entries(company)
                .with_context(format!("delete ledger entries for '{company}'"))?;
            info!("deleted {} ledger entries for '{}'", deleted, company);
            deleted_ledger_entries = Some(deleted);
        }

        // ResetTarget through Finalize run inside one store transaction
        self.nodes
            .begin()
            .with_context("begin store transaction")?;

        match self.replace_chart(file, company) {
            Ok((created, default_node)) => {
                self.nodes.commit().with_context("commit import")?;
                info!("import committed: {} nodes for '{}'", created, company);
                Ok(ImportOutcome {
                    created,
                    default_node,
                    deleted_ledger_entries,
                })
            }
            Err(e) => {
                // Best effort; the original error is the one worth surfacing
                if let Err(rb) = self.nodes.rollback() {
                    debug!("rollback failed: {}", rb);
                }
                Err(e)
            }
        }
    }

    /// Steps 2–5: reset, ingest, create pre-order, select the default node.
    fn replace_chart(
        &self,
        file: &Path,
        company: &str,
    ) -> ApplicationResult<(usize, Option<String>)> {
        self.nodes
            .clear_default_nodes(company)
            .with_context(format!("clear default nodes for '{company}'"))?;

        let existing = self
            .nodes
            .node_keys_deepest_first(company)
            .with_context(format!("list nodes for '{company}'"))?;
        debug!("deleting {} existing nodes", existing.len());
        for key in existing {
            self.nodes
                .delete_node(company, &key)
                .with_context(format!("delete node '{key}'"))?;
        }

        let forest = self.load_forest(file)?;

        let mut created = 0;
        for entry in materialize(&forest) {
            let parent = (!entry.parent_id.is_empty()).then(|| entry.parent_id.clone());
            // Custom ids are allowed, so every root bypasses the store's
            // root-name-equals-company rule
            let relaxed = parent.is_none();
            self.nodes
                .create_node(&NodeRecord {
                    key: entry.id.clone(),
                    label: entry.name.clone(),
                    company: company.to_string(),
                    parent,
                    is_group: entry.is_group,
                    relaxed,
                })
                .with_context(format!("create node '{}'", entry.id))?;
            created += 1;
        }

        let default_node = self
            .nodes
            .root_node(company)
            .with_context(format!("select root node for '{company}'"))?;
        if let Some(root) = &default_node {
            self.nodes
                .set_default_node(company, DefaultSlot::Primary, root)
                .with_context(format!("set default node '{root}'"))?;
        }

        Ok((created, default_node))
    }

    fn acquire(&self, company: &str) -> ApplicationResult<ImportGuard<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(company.to_string()) {
            return Err(ApplicationError::ImportInProgress {
                company: company.to_string(),
            });
        }
        Ok(ImportGuard {
            in_flight: &self.in_flight,
            company: company.to_string(),
        })
    }
}

/// Releases the per-company import lock on drop.
struct ImportGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    company: String,
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.lock().unwrap().remove(&self.company);
    }
}
