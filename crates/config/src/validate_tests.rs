use super::*;
use crate::group::GroupConfig;
use crate::node::{LauncherConfig, NodeConfig};
use crate::test::TestConfig;
use antler_core::{NodeId, PlatformTag, TestId};
use antler_tree::{Run, RunnerSpec};

fn node(id: &str) -> NodeConfig {
    NodeConfig { id: NodeId::from(id), platform: PlatformTag::from("linux-amd64"), launcher: LauncherConfig::Local }
}

fn test(id: &[(&str, &str)], output_path: &str, run: Run) -> TestConfig {
    TestConfig {
        id: TestId::new(id.iter().map(|(k, v)| (k.to_string(), v.to_string()))),
        output_path: output_path.to_string(),
        data_file: None,
        run,
        during: Vec::new(),
        after: Vec::new(),
        timeout: None,
    }
}

fn sleep_run() -> Run {
    Run::Leaf(RunnerSpec::Sleep { duration: antler_core::Duration::ZERO })
}

#[test]
fn accepts_a_well_formed_config() {
    let config = Config {
        nodes: vec![node("client")],
        root: GroupConfig {
            tests: vec![test(&[("proto", "bbr")], "results/bbr", Run::Child { node: NodeId::from("client"), run: Box::new(sleep_run()) })],
            ..Default::default()
        },
    };
    assert!(validate(&config).is_ok());
}

#[test]
fn rejects_duplicate_test_ids_regardless_of_pair_order() {
    let config = Config {
        nodes: vec![],
        root: GroupConfig {
            tests: vec![
                test(&[("proto", "bbr"), ("cc", "cubic")], "results/a", sleep_run()),
                test(&[("cc", "cubic"), ("proto", "bbr")], "results/b", sleep_run()),
            ],
            ..Default::default()
        },
    };
    assert!(matches!(validate(&config), Err(ConfigError::DuplicateTestId(_))));
}

#[test]
fn rejects_colliding_result_paths() {
    let config = Config {
        nodes: vec![],
        root: GroupConfig {
            tests: vec![test(&[("a", "1")], "results/shared", sleep_run()), test(&[("a", "2")], "results/shared", sleep_run())],
            ..Default::default()
        },
    };
    assert!(matches!(validate(&config), Err(ConfigError::DuplicateResultPath(_))));
}

#[test]
fn rejects_a_run_tree_referencing_an_undeclared_node() {
    let config = Config {
        nodes: vec![],
        root: GroupConfig {
            tests: vec![test(&[("a", "1")], "results/a", Run::Child { node: NodeId::from("ghost"), run: Box::new(sleep_run()) })],
            ..Default::default()
        },
    };
    assert!(matches!(validate(&config), Err(ConfigError::UnknownNode(_))));
}
