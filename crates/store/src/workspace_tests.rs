// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::MetadataExt;
use tempfile::tempdir;

#[tokio::test]
async fn write_then_close_renames_into_place_with_no_previous_result() {
    let dir = tempdir().unwrap();
    let workspace = Workspace::create(dir.path().join("new"), None).await.unwrap();

    let mut writer = workspace.create_writer("stream.jsonl").await.unwrap();
    writer.write(b"hello").await.unwrap();
    writer.close().await.unwrap();

    let contents = tokio::fs::read(dir.path().join("new").join("stream.jsonl")).await.unwrap();
    assert_eq!(contents, b"hello");
    assert!(!dir.path().join("new").join("stream.jsonl~").exists());
}

#[tokio::test]
async fn identical_content_hard_links_against_previous_result() {
    let dir = tempdir().unwrap();
    let previous = dir.path().join("2026-01-01T00-00-00");
    tokio::fs::create_dir_all(&previous).await.unwrap();
    tokio::fs::write(previous.join("data.bin"), b"payload").await.unwrap();

    let workspace = Workspace::create(dir.path().join("new"), Some(previous.clone())).await.unwrap();
    let mut writer = workspace.create_writer("data.bin").await.unwrap();
    writer.write(b"payload").await.unwrap();
    writer.close().await.unwrap();

    let previous_meta = tokio::fs::metadata(previous.join("data.bin")).await.unwrap();
    let new_meta = tokio::fs::metadata(dir.path().join("new").join("data.bin")).await.unwrap();
    assert_eq!(previous_meta.ino(), new_meta.ino());
}

#[tokio::test]
async fn differing_content_is_written_fresh_not_linked() {
    let dir = tempdir().unwrap();
    let previous = dir.path().join("2026-01-01T00-00-00");
    tokio::fs::create_dir_all(&previous).await.unwrap();
    tokio::fs::write(previous.join("data.bin"), b"old").await.unwrap();

    let workspace = Workspace::create(dir.path().join("new"), Some(previous.clone())).await.unwrap();
    let mut writer = workspace.create_writer("data.bin").await.unwrap();
    writer.write(b"new").await.unwrap();
    writer.close().await.unwrap();

    let previous_meta = tokio::fs::metadata(previous.join("data.bin")).await.unwrap();
    let new_meta = tokio::fs::metadata(dir.path().join("new").join("data.bin")).await.unwrap();
    assert_ne!(previous_meta.ino(), new_meta.ino());
}

#[tokio::test]
async fn opening_the_same_name_twice_fails() {
    let dir = tempdir().unwrap();
    let workspace = Workspace::create(dir.path().join("new"), None).await.unwrap();
    let _writer = workspace.create_writer("log.txt").await.unwrap();
    let err = workspace.create_writer("log.txt").await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyOpen(_)));
}
