use std::sync::Arc;

use agentviz::constants::nodes::*;
use agentviz::{
    agent_type, Edge, NameResolver, Node, NodeCategory, PathRouter, ResolutionRule,
    TopologyConfig, TopologyStore, VizError,
};

fn builtin_router() -> PathRouter {
    PathRouter::with_default_hubs(Arc::new(TopologyStore::builtin()))
}

fn owned(path: &[&str]) -> Vec<String> {
    path.iter().map(|id| id.to_string()).collect()
}

#[test]
fn self_path_is_none() {
    let router = builtin_router();
    assert_eq!(router.find_path(CENTRAL, CENTRAL), None);
}

#[test]
fn direct_edge_in_either_direction() {
    let router = builtin_router();
    assert_eq!(
        router.find_path(ALARM, CENTRAL),
        Some(owned(&[ALARM, CENTRAL]))
    );
    assert_eq!(
        router.find_path(CENTRAL, ALARM),
        Some(owned(&[CENTRAL, ALARM]))
    );
}

#[test]
fn relays_through_hubs() {
    let router = builtin_router();
    assert_eq!(
        router.find_path(USER, ALARM),
        Some(owned(&[USER, CENTRAL, ALARM]))
    );
    assert_eq!(
        router.find_path(INFO_PROCESS, DATA_CLEAN),
        Some(owned(&[INFO_PROCESS, MULTI_AGENTS, DATA_CLEAN]))
    );
}

#[test]
fn first_qualifying_hub_wins() {
    let config = TopologyConfig {
        nodes: vec![
            Node::new("Left", "Left", NodeCategory::Specialized),
            Node::new("Right", "Right", NodeCategory::Specialized),
            Node::new(CENTRAL, "Central", NodeCategory::Central),
            Node::new(MULTI_AGENTS, "Multi", NodeCategory::Dispatcher),
        ],
        edges: vec![
            Edge::new("Left", MULTI_AGENTS),
            Edge::new(MULTI_AGENTS, "Right"),
            Edge::new("Left", CENTRAL),
            Edge::new(CENTRAL, "Right"),
        ],
    };
    let topology = Arc::new(TopologyStore::new(config).unwrap());

    let router = PathRouter::with_default_hubs(Arc::clone(&topology));
    assert_eq!(
        router.find_path("Left", "Right"),
        Some(owned(&["Left", CENTRAL, "Right"]))
    );

    let reversed = PathRouter::new(topology, vec![MULTI_AGENTS.into(), CENTRAL.into()]);
    assert_eq!(
        reversed.find_path("Left", "Right"),
        Some(owned(&["Left", MULTI_AGENTS, "Right"]))
    );
}

#[test]
fn unreachable_pair_has_no_path() {
    let router = builtin_router();
    assert_eq!(router.find_path(WALLET, MESSAGE_CALL), None);
    assert_eq!(router.find_path(CENTRAL, BLOCKCHAIN_API), None);
}

#[test]
fn resolver_checks_exact_then_alias_then_fragment() {
    let topology = TopologyStore::builtin();
    let resolver = NameResolver::with_default_rules(&topology).unwrap();

    assert_eq!(resolver.resolve(CENTRAL).as_deref(), Some(CENTRAL));
    assert_eq!(resolver.resolve("API").as_deref(), Some(BLOCKCHAIN_API));
    assert_eq!(resolver.resolve("LLM").as_deref(), Some(LLM_API));
    assert_eq!(resolver.resolve("Client").as_deref(), Some(USER));
    assert_eq!(
        resolver.resolve("SpecificCoinWhaleAgent-eth").as_deref(),
        Some(WHALE)
    );
    assert_eq!(resolver.resolve("FreqTxAgent#2").as_deref(), Some(TX));
    assert_eq!(resolver.resolve("my_UserAgent").as_deref(), Some(USER));
    assert_eq!(resolver.resolve("SomethingElse"), None);
    assert_eq!(resolver.resolve(""), None);
}

#[test]
fn resolver_is_deterministic() {
    let topology = TopologyStore::builtin();
    let resolver = NameResolver::with_default_rules(&topology).unwrap();
    let inputs = ["CEXAgent", "AutoTradeAgent", "API", "BasicCoinInfoAgent", "nobody"];

    let first: Vec<Option<String>> = inputs.iter().map(|raw| resolver.resolve(raw)).collect();
    for _ in 0..10 {
        let again: Vec<Option<String>> = inputs.iter().map(|raw| resolver.resolve(raw)).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn rules_must_target_existing_nodes() {
    let topology = TopologyStore::builtin();
    let err = NameResolver::new(
        &topology,
        vec![ResolutionRule::alias("Ghost", "GhostAgent")],
        Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(err, VizError::UnknownRuleTarget { .. }));
}

#[test]
fn custom_topology_keeps_applicable_rules_only() {
    let config = TopologyConfig {
        nodes: vec![
            Node::new(CENTRAL, "Central", NodeCategory::Central),
            Node::new(USER, "User", NodeCategory::User),
        ],
        edges: vec![Edge::new(USER, CENTRAL)],
    };
    let topology = TopologyStore::new(config).unwrap();
    let resolver = NameResolver::for_topology(&topology);

    assert_eq!(resolver.resolve("Client").as_deref(), Some(USER));
    assert_eq!(resolver.resolve("API"), None);
    assert!(resolver.rules().all(|rule| topology.contains(&rule.node_id)));
}

#[test]
fn agent_types_for_persisted_records() {
    assert_eq!(agent_type(CENTRAL), "central");
    assert_eq!(agent_type("SpecificCoinWhaleAgent"), "specialist");
    assert_eq!(agent_type("mystery"), "unknown");
}
