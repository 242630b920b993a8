//! # Configuration Tests: BuildConfig
//!
//! Validates defaults, TOML loading, builder overrides and validation.

use huffhist_core::{BuildConfig, HistError, DEFAULT_BLOCK_SIZE};
use std::io::Write;
use std::time::Instant;

/// Verifies that `BuildConfig::default()` returns sane values.
#[test]
fn test_build_config_defaults() {
    let t = Instant::now();

    let config = BuildConfig::default();

    assert_eq!(config.workers, num_cpus::get(), "Default workers should match the CPU count");
    assert!(config.workers >= 1);
    assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE, "Default block_size should be 64 KiB");
    assert_eq!(DEFAULT_BLOCK_SIZE, 65_536);
    assert!(!config.pin_workers, "pin_workers should default to false");
    assert!(config.validate().is_ok());

    let overhead = t.elapsed();
    println!("test_build_config_defaults: Testing Overhead = {:?}", overhead);
}

/// Verifies that a partial TOML document keeps defaults for missing keys.
#[test]
fn test_build_config_from_toml() {
    let t = Instant::now();

    let config = BuildConfig::from_toml_str("workers = 12\nblock_size = 4096\n").unwrap();
    assert_eq!(config.workers, 12);
    assert_eq!(config.block_size, 4096);
    assert!(!config.pin_workers);

    let config = BuildConfig::from_toml_str("pin_workers = true").unwrap();
    assert!(config.pin_workers);
    assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);

    let overhead = t.elapsed();
    println!("test_build_config_from_toml: Testing Overhead = {:?}", overhead);
}

/// Unknown keys and wrong types are configuration errors.
#[test]
fn test_build_config_rejects_bad_toml() {
    let t = Instant::now();

    assert!(matches!(BuildConfig::from_toml_str("threads = 4"), Err(HistError::Config(_))));
    assert!(matches!(BuildConfig::from_toml_str("workers = \"many\""), Err(HistError::Config(_))));

    let overhead = t.elapsed();
    println!("test_build_config_rejects_bad_toml: Testing Overhead = {:?}", overhead);
}

/// Loads the configuration from a file on disk.
#[test]
fn test_build_config_from_file() {
    let t = Instant::now();

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create tempfile");
    writeln!(file, "workers = 3").unwrap();
    writeln!(file, "block_size = 1").unwrap();

    let config = BuildConfig::from_file(file.path()).unwrap();
    assert_eq!(config, BuildConfig::default().with_workers(3).with_block_size(1));

    let missing = BuildConfig::from_file(std::path::Path::new("/nonexistent/huffhist.toml"));
    assert!(matches!(missing, Err(HistError::Io(_))));

    let overhead = t.elapsed();
    println!("test_build_config_from_file: Testing Overhead = {:?}", overhead);
}

/// Verifies the builder chain and `validate`.
#[test]
fn test_build_config_builder_and_validation() {
    let t = Instant::now();

    let config = BuildConfig::default()
        .with_workers(0)
        .with_block_size(128)
        .with_pinning(true);
    assert!(config.pin_workers);
    assert!(matches!(config.validate(), Err(HistError::InvalidWorkerCount(0))));
    assert!(matches!(
        config.with_workers(2).with_block_size(0).validate(),
        Err(HistError::InvalidBlockSize(0))
    ));

    let overhead = t.elapsed();
    println!("test_build_config_builder_and_validation: Testing Overhead = {:?}", overhead);
}
