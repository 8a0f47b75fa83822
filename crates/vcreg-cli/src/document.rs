//! Reading and writing JSON/YAML documents. The format is chosen by file
//! extension: `.yaml` and `.yml` are YAML, everything else is JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Parse a document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&raw).with_context(|| format!("failed to parse YAML {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("failed to parse JSON {}", path.display()))
    }
}

/// Serialize and write a document.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        let mut s = serde_json::to_string_pretty(value)?;
        s.push('\n');
        s
    };
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
