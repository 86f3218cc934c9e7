// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::Config;
use crate::error::ConfigError;
use crate::validate::validate;
use std::path::Path;

/// Reads, parses, and structurally validates a TOML config file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let config: Config = toml::from_str(&text)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_duplicate_node_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("antler.toml");
        std::fs::write(
            &path,
            r#"
            [[nodes]]
            id = "client"
            platform = "linux-amd64"
            launcher = "local"

            [[nodes]]
            id = "client"
            platform = "linux-amd64"
            launcher = "local"
            "#,
        )
        .unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousNodeId(_)));
    }
}
