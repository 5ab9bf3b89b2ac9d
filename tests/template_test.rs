//! Round-trip test: the exported template must import cleanly

use std::sync::Arc;

use tempfile::TempDir;

use ccimport::application::services::{ImportService, TemplateFormat, TemplateService};
use ccimport::domain::DuplicatePolicy;
use ccimport::infrastructure::traits::{CsvRowSource, DefaultSlot};
use ccimport::infrastructure::MemoryStore;

#[test]
fn given_rendered_template_when_imported_then_sample_chart_is_created() {
    // Arrange: write the rendered template to disk as a user would
    let artifact = TemplateService::new().render(TemplateFormat::Csv).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes).unwrap();

    let store = Arc::new(MemoryStore::new());
    let svc = ImportService::new(
        Arc::new(CsvRowSource),
        store.clone(),
        store.clone(),
        DuplicatePolicy::Reject,
    );

    // Act
    let outcome = svc.import(&path, "Acme", false).unwrap();

    // Assert: the sample chart lands exactly as the template describes
    assert_eq!(outcome.created, 5);
    assert_eq!(outcome.default_node.as_deref(), Some("ROOT001"));
    assert_eq!(
        store.node_keys("Acme"),
        vec!["ROOT001", "SALES001", "SALES-IT", "SALES-EU", "ADMIN001"]
    );
    assert_eq!(
        store.parent_of("Acme", "SALES-IT").as_deref(),
        Some("SALES001")
    );
    assert!(store.parent_of("Acme", "ROOT001").is_none());
    assert_eq!(
        store.default_node("Acme", DefaultSlot::Primary).as_deref(),
        Some("ROOT001")
    );
}

#[test]
fn given_template_when_rendered_then_filename_carries_csv_extension() {
    // Act
    let artifact = TemplateService::new().render(TemplateFormat::Csv).unwrap();

    // Assert
    assert!(artifact.filename.ends_with(".csv"));
    assert!(!artifact.bytes.is_empty());
}
