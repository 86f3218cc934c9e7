// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The embedded worker binaries a launcher can ship to a peer, keyed by
//! platform tag. Populated at build time via `include_bytes!` by whatever
//! binary links this crate; tests populate it with arbitrary byte slices.

use crate::error::LaunchError;
use antler_core::PlatformTag;
use std::collections::HashMap;

#[derive(Default)]
pub struct BinaryRegistry {
    blobs: HashMap<PlatformTag, &'static [u8]>,
}

impl BinaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, platform: PlatformTag, blob: &'static [u8]) {
        self.blobs.insert(platform, blob);
    }

    pub fn size(&self, platform: &PlatformTag) -> Result<u64, LaunchError> {
        self.blobs
            .get(platform)
            .map(|blob| blob.len() as u64)
            .ok_or_else(|| LaunchError::UnknownPlatform(platform.clone()))
    }

    pub fn bytes(&self, platform: &PlatformTag) -> Result<&'static [u8], LaunchError> {
        self.blobs.get(platform).copied().ok_or_else(|| LaunchError::UnknownPlatform(platform.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_platform_reports_unknown() {
        let registry = BinaryRegistry::new();
        let err = registry.size(&PlatformTag::from("linux-amd64")).unwrap_err();
        assert!(matches!(err, LaunchError::UnknownPlatform(_)));
    }

    #[test]
    fn registered_platform_reports_its_size() {
        static BLOB: &[u8] = b"worker-binary-bytes";
        let mut registry = BinaryRegistry::new();
        registry.register(PlatformTag::from("linux-amd64"), BLOB);
        assert_eq!(registry.size(&PlatformTag::from("linux-amd64")).unwrap(), BLOB.len() as u64);
    }
}
