// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generates a `register_embedded_workers` function that `include_bytes!`s
//! every file under `worker-bins/`, named by the platform tag a launcher
//! should use to pick it. Builds with an empty registry when the directory
//! doesn't exist, which is the common case until a release pipeline has
//! cross-compiled worker binaries to drop there.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let worker_bins_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("worker-bins");
    println!("cargo:rerun-if-changed={}", worker_bins_dir.display());

    let mut registrations = String::new();
    if let Ok(entries) = fs::read_dir(&worker_bins_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(platform) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let path_str = path.to_string_lossy().to_string();
            registrations.push_str(&format!(
                "    registry.register(antler_core::PlatformTag::from({platform:?}), include_bytes!({path_str:?}));\n"
            ));
        }
    }

    let source = format!("pub fn register_embedded_workers(registry: &mut antler_launch::BinaryRegistry) {{\n{registrations}}}\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR set by cargo");
    let dest = Path::new(&out_dir).join("embedded_workers.rs");
    fs::write(&dest, source).expect("failed to write generated worker registry");
}
