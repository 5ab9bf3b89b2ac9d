//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (RowSource, NodeStore,
//! LedgerStore) but are themselves concrete structs, not traits.

mod importer;
mod template;

pub use importer::{ConflictReport, ImportOutcome, ImportService, ValidationReport};
pub use template::{TemplateArtifact, TemplateFormat, TemplateService, SAMPLE_ROWS};
