// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newtype identifiers threaded through the transport, node, and engine.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(NodeId, "A node's stable string identifier, unique within a test.");
string_id!(FlowId, "Names a producer/consumer pair across the event stream.");
string_id!(PlatformTag, "Selects which embedded worker binary a launcher ships.");

/// A Test's compound identifier: ordered key/value pairs. Order is
/// preserved (not a `HashMap`) so two Tests with the same keys in a
/// different order are still considered distinct identities for display, but
/// equal for duplicate-detection once sorted by `antler-config`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TestId(pub Vec<(String, String)>);

impl TestId {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// A sorted, canonical form used for duplicate-ID validation.
    pub fn canonical(&self) -> Vec<(String, String)> {
        let mut pairs = self.0.clone();
        pairs.sort();
        pairs
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_canonical_ignores_insertion_order() {
        let a = TestId::new([("b".into(), "2".into()), ("a".into(), "1".into())]);
        let b = TestId::new([("a".into(), "1".into()), ("b".into(), "2".into())]);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn node_id_displays_as_inner_string() {
        let id = NodeId::from("client");
        assert_eq!(id.to_string(), "client");
    }
}
