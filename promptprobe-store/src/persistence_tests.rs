//! Config persistence tests.
//!
//! Tests file I/O, defaults for missing files, and validation on load.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::{Config, CredentialSourceKind};
use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});

    save_json(&nested_path, &data).await.unwrap();
    assert!(nested_path.exists());
    assert!(!nested_path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/config.json");

    let result: Result<serde_json::Value, StoreError> = load_json(&file_path).await;
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_load_corrupt_json() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");
    tokio::fs::write(&file_path, "{ not json").await.unwrap();

    let result = Config::load_from(&file_path).await;
    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

// ============================================================================
// Config Round-Trip Tests
// ============================================================================

#[tokio::test]
async fn test_missing_config_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");

    let config = Config::load_from(&file_path).await.unwrap();
    assert_eq!(config, Config::default());
    assert!(!file_path.exists());
}

#[tokio::test]
async fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("promptprobe").join("config.json");

    let mut config = Config::default();
    config.upstream.models = vec!["gemini-2.0-flash".into()];
    config.credential.source = CredentialSourceKind::Keychain;
    config.probe.deadline_secs = Some(45);
    config.probe.preamble = Some("Answer step by step.".into());
    config.generation.temperature = 0.2;

    config.save_to(&file_path).await.unwrap();
    let loaded = Config::load_from(&file_path).await.unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_save_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");

    let mut config = Config::default();
    config.upstream.templates.clear();

    assert!(config.save_to(&file_path).await.is_err());
    assert!(!file_path.exists());
}

#[tokio::test]
async fn test_load_rejects_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");
    tokio::fs::write(&file_path, r#"{"upstream":{"models":[]}}"#)
        .await
        .unwrap();

    let result = Config::load_from(&file_path).await;
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_saved_config_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");

    Config::default().save_to(&file_path).await.unwrap();

    let mode = std::fs::metadata(&file_path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}
