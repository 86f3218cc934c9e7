// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level grouping hierarchy Tests are organized under. A group's
//! `after` stack is the shared report pipeline every Test beneath it tees
//! its own "after" pipeline's output into.

use crate::report_stage::ReportStageConfig;
use crate::test::TestConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GroupConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub after: Vec<ReportStageConfig>,
    #[serde(default)]
    pub tests: Vec<TestConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl GroupConfig {
    /// Every Test reachable under this group, depth-first.
    pub fn tests(&self) -> Vec<&TestConfig> {
        let mut out = Vec::new();
        self.collect_tests(&mut out);
        out
    }

    fn collect_tests<'a>(&'a self, out: &mut Vec<&'a TestConfig>) {
        out.extend(self.tests.iter());
        for group in &self.groups {
            group.collect_tests(out);
        }
    }

    /// Every Test reachable under this group, paired with its immediate
    /// enclosing group's "after" report stack.
    pub fn tests_with_group_after(&self) -> Vec<(&TestConfig, &[ReportStageConfig])> {
        let mut out = Vec::new();
        self.collect_tests_with_after(&mut out);
        out
    }

    fn collect_tests_with_after<'a>(&'a self, out: &mut Vec<(&'a TestConfig, &'a [ReportStageConfig])>) {
        for test in &self.tests {
            out.push((test, self.after.as_slice()));
        }
        for group in &self.groups {
            group.collect_tests_with_after(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antler_core::TestId;
    use antler_tree::{Run, RunnerSpec};

    fn leaf_test(name: &str) -> TestConfig {
        TestConfig {
            id: TestId::new([("test".into(), name.into())]),
            output_path: format!("results/{name}"),
            data_file: None,
            run: Run::Leaf(RunnerSpec::Sleep { duration: antler_core::Duration::ZERO }),
            during: Vec::new(),
            after: Vec::new(),
            timeout: None,
        }
    }

    #[test]
    fn pairs_each_test_with_its_immediate_group_after_stack() {
        let inner = GroupConfig {
            name: "inner".into(),
            after: vec![ReportStageConfig::Index],
            tests: vec![leaf_test("b")],
            groups: Vec::new(),
        };
        let root = GroupConfig { name: "root".into(), after: vec![ReportStageConfig::Analyze], tests: vec![leaf_test("a")], groups: vec![inner] };

        let pairs = root.tests_with_group_after();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1, &[ReportStageConfig::Analyze][..]);
        assert_eq!(pairs[1].1, &[ReportStageConfig::Index][..]);
    }
}
