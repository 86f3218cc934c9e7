// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::StoreError;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// A scratch directory a Test's files are written into before the whole
/// result is promoted. Every name gets a `name~` temp file; `Writer::close`
/// either hard-links it against the previous result (when the content is
/// byte-identical) or renames it into its final name.
pub struct Workspace {
    root: PathBuf,
    previous: Option<PathBuf>,
    open_names: Mutex<HashSet<String>>,
}

impl Workspace {
    pub async fn create(root: impl Into<PathBuf>, previous: Option<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| StoreError::io(&root, e))?;
        Ok(Workspace { root, previous, open_names: Mutex::new(HashSet::new()) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens a writer for `name`. Fails if a writer for the same name is
    /// already open, since every file in a result is written exactly once.
    pub async fn create_writer(&self, name: &str) -> Result<Writer, StoreError> {
        {
            let mut open = self.open_names.lock().expect("workspace lock poisoned");
            if !open.insert(name.to_string()) {
                return Err(StoreError::AlreadyOpen(name.to_string()));
            }
        }
        let tmp_path = self.root.join(format!("{name}~"));
        let file = fs::File::create(&tmp_path).await.map_err(|e| StoreError::io(&tmp_path, e))?;
        Ok(Writer {
            name: name.to_string(),
            final_path: self.root.join(name),
            tmp_path,
            previous: self.previous.clone(),
            file,
            hasher: Sha256::new(),
        })
    }
}

#[derive(Debug)]
pub struct Writer {
    name: String,
    final_path: PathBuf,
    tmp_path: PathBuf,
    previous: Option<PathBuf>,
    file: fs::File,
    hasher: Sha256,
}

impl Writer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.hasher.update(bytes);
        self.file.write_all(bytes).await.map_err(|e| StoreError::io(&self.tmp_path, e))
    }

    /// Finalizes the file: hard-links it against an identical file from the
    /// previous result directory when one exists, otherwise renames the
    /// temp file into place.
    pub async fn close(self) -> Result<(), StoreError> {
        self.file.sync_all().await.map_err(|e| StoreError::io(&self.tmp_path, e))?;
        drop(self.file);

        let digest = format!("{:x}", self.hasher.finalize());
        if let Some(previous_root) = &self.previous {
            let candidate = previous_root.join(&self.name);
            if let Ok(previous_digest) = digest_file(&candidate).await {
                if previous_digest == digest {
                    fs::remove_file(&self.tmp_path).await.map_err(|e| StoreError::io(&self.tmp_path, e))?;
                    fs::hard_link(&candidate, &self.final_path).await.map_err(|e| StoreError::io(&self.final_path, e))?;
                    debug!(name = %self.name, "hard-linked against previous result");
                    return Ok(());
                }
            }
        }

        fs::rename(&self.tmp_path, &self.final_path).await.map_err(|e| StoreError::io(&self.final_path, e))
    }
}

async fn digest_file(path: &Path) -> Result<String, std::io::Error> {
    let bytes = fs::read(path).await?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
