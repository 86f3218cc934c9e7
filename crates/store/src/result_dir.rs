// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamped result directories, and the `latest` symlink that always
//! points at the most recently promoted one.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct ResultDir {
    root: PathBuf,
}

impl ResultDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ResultDir { root: root.into() }
    }

    /// The directory a new result for `timestamp` would be promoted to.
    pub fn path_for(&self, timestamp: DateTime<Utc>) -> PathBuf {
        self.root.join(timestamp.format("%Y%m%dT%H%M%S%.3fZ").to_string())
    }

    pub fn latest_link(&self) -> PathBuf {
        self.root.join("latest")
    }

    /// The most recently promoted result directory, if any, found by
    /// resolving the `latest` symlink.
    pub async fn previous(&self) -> Option<PathBuf> {
        fs::read_link(self.latest_link()).await.ok().map(|target| {
            if target.is_relative() {
                self.root.join(target)
            } else {
                target
            }
        })
    }

    /// Atomically promotes `workspace` into the timestamped slot and
    /// repoints `latest` at it. `workspace` must already be a final
    /// directory name under `self.root` (e.g. produced via `rename`, not
    /// moved across filesystems).
    pub async fn promote(&self, workspace: &Path, timestamp: DateTime<Utc>) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root).await.map_err(|e| StoreError::io(&self.root, e))?;
        let dest = self.path_for(timestamp);
        fs::rename(workspace, &dest).await.map_err(|e| StoreError::io(&dest, e))?;

        let link = self.latest_link();
        let tmp_link = self.root.join("latest.tmp");
        let _ = fs::remove_file(&tmp_link).await;
        #[cfg(unix)]
        tokio::fs::symlink(&dest, &tmp_link).await.map_err(|e| StoreError::io(&tmp_link, e))?;
        fs::rename(&tmp_link, &link).await.map_err(|e| StoreError::io(&link, e))?;

        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn promote_moves_workspace_and_updates_latest() {
        let dir = tempdir().unwrap();
        let results = ResultDir::new(dir.path());
        let workspace = dir.path().join("scratch");
        fs::create_dir_all(&workspace).await.unwrap();
        fs::write(workspace.join("marker"), b"1").await.unwrap();

        let timestamp = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let promoted = results.promote(&workspace, timestamp).await.unwrap();

        assert!(promoted.join("marker").exists());
        let latest = fs::read_link(results.latest_link()).await.unwrap();
        assert_eq!(dir.path().join(latest), promoted);
    }

    #[tokio::test]
    async fn previous_resolves_through_the_latest_symlink() {
        let dir = tempdir().unwrap();
        let results = ResultDir::new(dir.path());
        assert!(results.previous().await.is_none());

        let workspace = dir.path().join("scratch");
        fs::create_dir_all(&workspace).await.unwrap();
        let timestamp = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let promoted = results.promote(&workspace, timestamp).await.unwrap();

        assert_eq!(results.previous().await.unwrap(), promoted);
    }
}
