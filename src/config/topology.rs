use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::nodes::*;
use crate::error::{Result, VizError};
use crate::topology::{Edge, Node, NodeCategory};

/// 静态拓扑配置
///
/// 节点与边都在统一的数组中，可以完全由 JSON 驱动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl TopologyConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| VizError::Config(format!("failed to parse topology config: {e}")))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| VizError::Config(format!("failed to parse topology config value: {e}")))
    }

    /// 验证配置的完整性：节点 ID 唯一，边的端点都存在
    pub fn validate(&self) -> Result<()> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(VizError::DuplicateNode(node.id.clone()));
            }
        }

        for edge in &self.edges {
            if !node_ids.contains(edge.source.as_str()) || !node_ids.contains(edge.target.as_str())
            {
                return Err(VizError::DanglingEdge {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                });
            }
        }

        Ok(())
    }

    /// 区块链监控系统的内置拓扑
    pub fn builtin() -> Self {
        const SPECIALIST: &str = "#74b9ff";
        const EXECUTOR: &str = "#d6a2e8";
        const RESULT: &str = "#ffeaa7";

        let nodes = vec![
            Node::new(CEX_WITHDRAW, "CEX Withdraw Agents", NodeCategory::Specialized)
                .at(226.0, 137.0)
                .sized(140.0, 40.0)
                .with_color(SPECIALIST),
            Node::new(WHALE, "Specific Coin Whale Agent", NodeCategory::Specialized)
                .at(397.0, 137.0)
                .sized(140.0, 40.0)
                .with_color(SPECIALIST),
            Node::new(TX, "Freq. tx send/receive Agent", NodeCategory::Specialized)
                .at(226.0, 211.0)
                .sized(140.0, 40.0)
                .with_color(SPECIALIST),
            Node::new(CONTRACT_MONITOR, "Contract Monitor Agent", NodeCategory::Specialized)
                .at(397.0, 211.0)
                .sized(140.0, 40.0)
                .with_color(SPECIALIST),
            Node::new(BASIC_INFO, "Basic Coin Info. Agent", NodeCategory::Specialized)
                .at(311.0, 285.0)
                .sized(140.0, 40.0)
                .with_color(SPECIALIST),
            Node::new(INFO_PROCESS, "Info. process agent", NodeCategory::Processor)
                .at(125.0, 330.0)
                .sized(140.0, 40.0)
                .with_color(SPECIALIST),
            Node::new(MULTI_AGENTS, "MultiAgents", NodeCategory::Dispatcher)
                .at(276.0, 403.0)
                .with_color("#a29bfe"),
            Node::new(DATA_CLEAN, "DataClean Agent", NodeCategory::Cleaner)
                .at(376.0, 477.0)
                .with_color("#55efc4"),
            Node::new(CENTRAL, "Central Agent", NodeCategory::Central)
                .at(478.0, 550.0)
                .with_color("#ff7675"),
            Node::new(ALARM, "Alarm Agent", NodeCategory::Alarm)
                .at(629.0, 550.0)
                .with_color("#fd79a8"),
            Node::new(AUTO_TRADE, "AutoTrade Agent", NodeCategory::Executor)
                .at(629.0, 403.0)
                .with_color(EXECUTOR),
            Node::new(WALLET, "Wallet Agent", NodeCategory::Executor)
                .at(780.0, 330.0)
                .with_color(EXECUTOR),
            Node::new(CEX, "CEX Agent", NodeCategory::Executor)
                .at(780.0, 477.0)
                .with_color(EXECUTOR),
            Node::new(USER, "User", NodeCategory::User)
                .at(326.0, 699.0)
                .sized(100.0, 40.0)
                .with_color("#ffeaa7"),
            Node::new(BLOCKCHAIN_API, "Blockchain API", NodeCategory::ExternalService)
                .at(680.0, 142.0)
                .sized(150.0, 80.0)
                .with_color(SPECIALIST),
            Node::new(LLM_API, "LLM API", NodeCategory::ExternalService)
                .at(780.0, 175.0)
                .sized(120.0, 80.0)
                .with_color(SPECIALIST),
            Node::new(CEX_API, "CEX API", NodeCategory::ExternalService)
                .at(880.0, 142.0)
                .sized(120.0, 80.0)
                .with_color(SPECIALIST),
            Node::new(APPROVAL_TX, "Approval\nSubmit tx", NodeCategory::Result)
                .at(930.0, 330.0)
                .with_color(RESULT),
            Node::new(PLACE_ORDER, "Place Order", NodeCategory::Result)
                .at(930.0, 477.0)
                .with_color(RESULT),
            Node::new(MESSAGE_CALL, "Messages/Phone call", NodeCategory::Result)
                .at(930.0, 624.0)
                .sized(140.0, 40.0)
                .with_color(RESULT),
        ];

        let edges = [
            (INFO_PROCESS, MULTI_AGENTS),
            (MULTI_AGENTS, CEX_WITHDRAW),
            (MULTI_AGENTS, WHALE),
            (MULTI_AGENTS, TX),
            (MULTI_AGENTS, CONTRACT_MONITOR),
            (MULTI_AGENTS, BASIC_INFO),
            (MULTI_AGENTS, DATA_CLEAN),
            (DATA_CLEAN, CENTRAL),
            (USER, CENTRAL),
            (CENTRAL, AUTO_TRADE),
            (CENTRAL, ALARM),
            (AUTO_TRADE, WALLET),
            (AUTO_TRADE, CEX),
            (WALLET, APPROVAL_TX),
            (CEX, PLACE_ORDER),
            (ALARM, MESSAGE_CALL),
        ]
        .into_iter()
        .map(|(source, target)| Edge::new(source, target))
        .collect();

        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_topology_is_valid() {
        let config = TopologyConfig::builtin();
        assert_eq!(config.nodes.len(), 20);
        assert_eq!(config.edges.len(), 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let config = TopologyConfig::from_value(json!({
            "nodes": [
                {"id": "A", "name": "A", "category": "central", "position": {"x": 0.0, "y": 0.0}, "size": {"w": 1.0, "h": 1.0}},
                {"id": "A", "name": "A2", "category": "user", "position": {"x": 0.0, "y": 0.0}, "size": {"w": 1.0, "h": 1.0}}
            ],
            "edges": []
        }))
        .unwrap();
        assert!(matches!(config.validate(), Err(VizError::DuplicateNode(id)) if id == "A"));
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut config = TopologyConfig::builtin();
        config.edges.push(Edge::new(CENTRAL, "Nowhere"));
        assert!(matches!(
            config.validate(),
            Err(VizError::DanglingEdge { to, .. }) if to == "Nowhere"
        ));
    }
}
