// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps a file extension to an encode/decode pipeline. `zstd` and `gzip`
//! are built in; additional extensions can be registered with an external
//! command's argv, so a report stage never needs to know which codec it's
//! dealing with.

use crate::error::StoreError;
use std::collections::HashMap;
use std::path::Path;
use tokio::process::Command;

enum Codec {
    Zstd,
    Gzip,
    External { encode_argv: Vec<String>, decode_argv: Vec<String> },
}

pub struct CodecRegistry {
    codecs: HashMap<String, Codec>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut codecs = HashMap::new();
        codecs.insert("zst".to_string(), Codec::Zstd);
        codecs.insert("gz".to_string(), Codec::Gzip);
        CodecRegistry { codecs }
    }
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_external(&mut self, extension: &str, encode_argv: Vec<String>, decode_argv: Vec<String>) {
        self.codecs.insert(extension.to_string(), Codec::External { encode_argv, decode_argv });
    }

    fn extension(path: &Path) -> Option<&str> {
        path.extension().and_then(|ext| ext.to_str())
    }

    /// Encodes `bytes`, writing the result to a `tmp` file and atomically
    /// renaming it into `dest` on success.
    pub async fn encode_to_file(&self, dest: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let extension = Self::extension(dest).ok_or_else(|| StoreError::UnknownCodec("<none>".into()))?;
        let codec = self.codecs.get(extension).ok_or_else(|| StoreError::UnknownCodec(extension.to_string()))?;

        let encoded = match codec {
            Codec::Zstd => zstd::encode_all(bytes, 0).map_err(|e| StoreError::io(dest, e))?,
            Codec::Gzip => run_external(&["gzip".into(), "-c".into()], bytes).await?,
            Codec::External { encode_argv, .. } => run_external(encode_argv, bytes).await?,
        };

        let tmp = dest.with_extension(format!("{extension}.tmp"));
        tokio::fs::write(&tmp, &encoded).await.map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, dest).await.map_err(|e| StoreError::io(dest, e))
    }

    pub async fn decode_file(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        let extension = Self::extension(path).ok_or_else(|| StoreError::UnknownCodec("<none>".into()))?;
        let codec = self.codecs.get(extension).ok_or_else(|| StoreError::UnknownCodec(extension.to_string()))?;
        let bytes = tokio::fs::read(path).await.map_err(|e| StoreError::io(path, e))?;

        match codec {
            Codec::Zstd => zstd::decode_all(bytes.as_slice()).map_err(|e| StoreError::io(path, e)),
            Codec::Gzip => run_external(&["gzip".into(), "-dc".into()], &bytes).await,
            Codec::External { decode_argv, .. } => run_external(decode_argv, &bytes).await,
        }
    }
}

async fn run_external(argv: &[String], input: &[u8]) -> Result<Vec<u8>, StoreError> {
    use tokio::io::AsyncWriteExt;

    let (program, args) = argv.split_first().ok_or_else(|| StoreError::UnknownCodec("<empty argv>".into()))?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .map_err(|e| StoreError::io(program, e))?;

    let mut stdin = child.stdin.take().expect("piped stdin");
    let input = input.to_vec();
    let write_task = tokio::spawn(async move {
        let _ = stdin.write_all(&input).await;
    });

    let output = child.wait_with_output().await.map_err(|e| StoreError::io(program, e))?;
    let _ = write_task.await;

    if !output.status.success() {
        return Err(StoreError::CodecFailed(output.status));
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn zstd_round_trips_through_a_file() {
        let dir = tempdir().unwrap();
        let registry = CodecRegistry::new();
        let dest = dir.path().join("events.jsonl.zst");

        registry.encode_to_file(&dest, b"hello world").await.unwrap();
        let decoded = registry.decode_file(&dest).await.unwrap();
        assert_eq!(decoded, b"hello world");
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let registry = CodecRegistry::new();
        let err = registry.encode_to_file(&dir.path().join("events.mystery"), b"x").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownCodec(_)));
    }
}
