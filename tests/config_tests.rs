//! Tests for Config
//!
//! These tests verify:
//! - Defaults and builder
//! - config.txt overrides (pointer, prodname)
//! - Name override precedence
//! - Derived file layout
//! - Database name validation

use std::fs;

use jsonsets::config::{Config, PointerMode};
use jsonsets::JsonSetsError;
use tempfile::TempDir;

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.name, "dbj");
    assert_eq!(config.pointer_mode, PointerMode::Inner);
}

#[test]
fn test_builder() {
    let config = Config::builder()
        .root_dir("/srv/store")
        .name("shop")
        .pointer_mode(PointerMode::Global)
        .build();

    assert_eq!(config.root_dir.to_str(), Some("/srv/store"));
    assert_eq!(config.name, "shop");
    assert_eq!(config.pointer_mode, PointerMode::Global);
}

#[test]
fn test_derived_paths() {
    let config = Config::builder().root_dir("/srv/store").name("shop").build();

    assert!(config.sets_dir().ends_with(".sets"));
    assert!(config.prod_dir().ends_with(".prod"));
    assert!(config.prod_path().ends_with(".prod/shop.json"));
    assert!(config.log_path().ends_with("jsonsets.log"));
    assert!(config.config_path().ends_with("config.txt"));
}

#[test]
fn test_pointer_mode_names() {
    assert_eq!("inner_var".parse::<PointerMode>().unwrap(), PointerMode::Inner);
    assert_eq!("global_var".parse::<PointerMode>().unwrap(), PointerMode::Global);
    assert!("shared".parse::<PointerMode>().is_err());
    assert_eq!(PointerMode::Global.to_string(), "global_var");
}

// =============================================================================
// config.txt Overrides
// =============================================================================

#[test]
fn test_overrides_anywhere_in_text() {
    let config = Config::builder()
        .apply_overrides("# store settings\nprodname=shop\nsomething else\npointer=global_var\n")
        .unwrap()
        .build();

    assert_eq!(config.name, "shop");
    assert_eq!(config.pointer_mode, PointerMode::Global);
}

#[test]
fn test_unknown_pointer_keeps_default() {
    let config = Config::builder()
        .apply_overrides("pointer=shared_var")
        .unwrap()
        .build();

    assert_eq!(config.pointer_mode, PointerMode::Inner);
}

#[test]
fn test_empty_prodname_keeps_default() {
    let config = Config::builder().apply_overrides("prodname=").unwrap().build();

    assert_eq!(config.name, "dbj");
}

#[test]
fn test_prodname_stops_at_unsupported_characters() {
    let config = Config::builder()
        .apply_overrides("prodname=my-store")
        .unwrap()
        .build();

    assert_eq!(config.name, "my");
}

#[test]
fn test_from_root_without_config_file() {
    let temp = TempDir::new().unwrap();

    let config = Config::from_root(temp.path(), None).unwrap();

    assert_eq!(config.root_dir, temp.path());
    assert_eq!(config.name, "dbj");
    assert_eq!(config.pointer_mode, PointerMode::Inner);
}

#[test]
fn test_from_root_reads_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.txt"), "pointer=global_var\nprodname=inventory").unwrap();

    let config = Config::from_root(temp.path(), None).unwrap();

    assert_eq!(config.name, "inventory");
    assert_eq!(config.pointer_mode, PointerMode::Global);
}

#[test]
fn test_name_override_wins() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.txt"), "prodname=inventory").unwrap();

    let config = Config::from_root(temp.path(), Some("archive")).unwrap();

    assert_eq!(config.name, "archive");
    assert!(config.prod_path().ends_with(".prod/archive.json"));
}

#[test]
fn test_name_override_must_be_plain() {
    let temp = TempDir::new().unwrap();

    for bad in ["../x", "a/b", "", "my-store"] {
        let err = Config::from_root(temp.path(), Some(bad)).unwrap_err();
        assert!(matches!(err, JsonSetsError::Config(_)), "{:?} accepted", bad);
    }
    assert!(!temp.path().join("x.json").exists());
}

#[test]
fn test_validate_builder_name() {
    assert!(Config::builder().name("shop_2").build().validate().is_ok());
    assert!(Config::builder().name("../x").build().validate().is_err());
}
