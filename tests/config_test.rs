//! Integration tests for Settings loading with layered merge semantics.
//!
//! Precedence: compiled defaults < global config file < CCIMPORT_* env vars.
//! Env-var tests serialize on a mutex since the process environment is shared.

use std::path::PathBuf;
use std::sync::Mutex;

use ccimport::config::Settings;
use ccimport::domain::DuplicatePolicy;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with the given env vars set, restoring the environment after.
fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let _guard = ENV_LOCK.lock().unwrap();
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    f();
    for (key, _) in vars {
        std::env::remove_var(key);
    }
}

#[test]
fn given_no_overrides_when_loading_then_compiled_defaults_apply() {
    // Arrange / Act
    let mut settings = Settings::default();
    with_env_vars(&[], || {
        settings = Settings::load().unwrap();
    });

    // Assert
    assert_eq!(settings.duplicate_policy, DuplicatePolicy::Reject);
    let name = settings.store_path.file_name().unwrap().to_string_lossy();
    assert!(name.ends_with("store.json"));
}

#[test]
fn given_env_store_path_when_loading_then_it_overrides_defaults() {
    // Arrange
    let mut settings = Settings::default();

    // Act
    with_env_vars(&[("CCIMPORT_STORE_PATH", "/tmp/other-store.json")], || {
        settings = Settings::load().unwrap();
    });

    // Assert
    assert_eq!(settings.store_path, PathBuf::from("/tmp/other-store.json"));
}

#[test]
fn given_env_duplicate_policy_when_loading_then_policy_switches() {
    // Arrange
    let mut settings = Settings::default();

    // Act
    with_env_vars(&[("CCIMPORT_DUPLICATE_POLICY", "last-wins")], || {
        settings = Settings::load().unwrap();
    });

    // Assert
    assert_eq!(settings.duplicate_policy, DuplicatePolicy::LastWins);
}

#[test]
fn given_invalid_env_duplicate_policy_when_loading_then_config_error() {
    // Act
    let mut result = Ok(Settings::default());
    with_env_vars(&[("CCIMPORT_DUPLICATE_POLICY", "keep-both")], || {
        result = Settings::load();
    });

    // Assert
    let err = result.unwrap_err();
    assert!(err.to_string().contains("duplicate_policy"));
}

#[test]
fn given_settings_template_when_rendered_then_it_documents_both_keys() {
    // Act
    let template = Settings::template();

    // Assert: a commented-out template must still name every key
    assert!(template.contains("store_path"));
    assert!(template.contains("duplicate_policy"));
    assert!(template.lines().all(|l| l.is_empty() || l.starts_with('#')));
}
