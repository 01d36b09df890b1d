// SPDX-License-Identifier: Apache-2.0

//! Printer configuration persistence
//!
//! The configuration lives in a JSON file (`sqlprint.json` by convention).
//! Environment variables can override individual policy fields on top.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{PrintError, PrintResult};
use crate::interceptor::PrinterConfig;

pub const CONFIG_FILE_NAME: &str = "sqlprint.json";

pub const ENV_ENABLED: &str = "SQLPRINT_ENABLED";
pub const ENV_ONLY_WARN_SLOW: &str = "SQLPRINT_ONLY_WARN_SLOW";
pub const ENV_WARN_THRESHOLD_MS: &str = "SQLPRINT_WARN_THRESHOLD_MS";
pub const ENV_WARN_MARKER: &str = "SQLPRINT_WARN_MARKER";

/// Loads configuration from `path`; a missing file yields the defaults
pub fn load_config(path: &Path) -> PrintResult<PrinterConfig> {
    if !path.exists() {
        debug!("No printer config file at {:?}, using defaults", path);
        return Ok(PrinterConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: PrinterConfig = serde_json::from_str(&content)?;

    info!("Loaded printer configuration from {:?}", path);
    Ok(config)
}

/// Writes configuration to `path` as pretty JSON
pub fn save_config(path: &Path, config: &PrinterConfig) -> PrintResult<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    debug!("Saved printer configuration to {:?}", path);
    Ok(())
}

/// Applies `SQLPRINT_*` environment overrides
pub fn apply_env_overrides(config: PrinterConfig) -> PrintResult<PrinterConfig> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Applies overrides from an arbitrary key lookup
pub fn apply_overrides<F>(mut config: PrinterConfig, lookup: F) -> PrintResult<PrinterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_ENABLED) {
        config.enabled = parse_bool(ENV_ENABLED, &value)?;
    }
    if let Some(value) = lookup(ENV_ONLY_WARN_SLOW) {
        config.only_warn_slow = parse_bool(ENV_ONLY_WARN_SLOW, &value)?;
    }
    if let Some(value) = lookup(ENV_WARN_THRESHOLD_MS) {
        config.warn_threshold_ms = value.trim().parse::<u64>().map_err(|e| {
            PrintError::config(format!("{}: invalid value '{}': {}", ENV_WARN_THRESHOLD_MS, value, e))
        })?;
    }
    if let Some(value) = lookup(ENV_WARN_MARKER) {
        config.warn_marker = value;
    }
    Ok(config)
}

fn parse_bool(key: &str, value: &str) -> PrintResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PrintError::config(format!(
            "{}: expected a boolean, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::StatementFilter;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, PrinterConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = PrinterConfig::new()
            .only_warn_slow(false)
            .warn_threshold_ms(250)
            .filter(StatementFilter::Exclude {
                pattern: "^health".to_string(),
            });

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"warn_threshold_ms": 50}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.warn_threshold_ms, 50);
        assert!(config.enabled);
        assert!(config.only_warn_slow);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_config(&path), Err(PrintError::Json(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_ENABLED, "off"),
            (ENV_WARN_THRESHOLD_MS, " 1200 "),
            (ENV_WARN_MARKER, "!! "),
        ]);
        let config = apply_overrides(PrinterConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();

        assert!(!config.enabled);
        assert!(config.only_warn_slow);
        assert_eq!(config.warn_threshold_ms, 1200);
        assert_eq!(config.warn_marker, "!! ");
    }

    #[test]
    fn test_invalid_override() {
        let err = apply_overrides(PrinterConfig::default(), |key| {
            (key == ENV_ONLY_WARN_SLOW).then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, PrintError::Config { .. }));
    }
}
