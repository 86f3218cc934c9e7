// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test filters for `list`/`run`/`report`: each argument is either a bare
//! value regex (matches against any value in the Test's id) or a
//! `key=value` pair-regex (matches a specific key's value). Multiple
//! filters combine by logical AND.

use anyhow::{Context, Result};
use antler_core::TestId;
use regex::Regex;

enum Filter {
    Value(Regex),
    Pair { key: String, value: Regex },
}

/// A parsed set of `list`/`run`/`report` filter arguments.
pub struct Filters(Vec<Filter>);

impl Filters {
    pub fn parse(args: &[String]) -> Result<Self> {
        let filters = args.iter().map(|arg| parse_one(arg)).collect::<Result<Vec<_>>>()?;
        Ok(Filters(filters))
    }

    /// True if every filter matches some part of `id`.
    pub fn matches(&self, id: &TestId) -> bool {
        self.0.iter().all(|filter| match filter {
            Filter::Value(re) => id.0.iter().any(|(_, v)| re.is_match(v)),
            Filter::Pair { key, value } => id.0.iter().any(|(k, v)| k == key && value.is_match(v)),
        })
    }
}

fn parse_one(arg: &str) -> Result<Filter> {
    match arg.split_once('=') {
        Some((key, value)) => {
            let re = Regex::new(value).with_context(|| format!("invalid filter regex {value:?}"))?;
            Ok(Filter::Pair { key: key.to_string(), value: re })
        }
        None => {
            let re = Regex::new(arg).with_context(|| format!("invalid filter regex {arg:?}"))?;
            Ok(Filter::Value(re))
        }
    }
}
