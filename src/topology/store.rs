use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::config::TopologyConfig;
use crate::error::{Result, VizError};

use super::node::{Edge, Node, NodeCategory};

/// 只读的拓扑存储
///
/// 初始化后不再修改；节点顺序与配置顺序一致
#[derive(Debug, Clone)]
pub struct TopologyStore {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    adjacency: HashSet<(String, String)>,
}

impl TopologyStore {
    pub fn new(config: TopologyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    /// 内置拓扑（已在测试中验证）
    pub fn builtin() -> Self {
        Self::assemble(TopologyConfig::builtin())
    }

    fn assemble(config: TopologyConfig) -> Self {
        let index = config
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();
        let adjacency = config
            .edges
            .iter()
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect();

        Self {
            nodes: config.nodes,
            index,
            edges: config.edges,
            adjacency,
        }
    }

    pub fn list_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn list_edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn get_node(&self, id: &str) -> Result<&Node> {
        self.index
            .get(id)
            .map(|&idx| &self.nodes[idx])
            .ok_or_else(|| VizError::NodeNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// 不区分方向的边查询
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency.contains(&(a.to_string(), b.to_string()))
            || self.adjacency.contains(&(b.to_string(), a.to_string()))
    }

    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter_map(|edge| {
                if edge.source == id {
                    Some(edge.target.as_str())
                } else if edge.target == id {
                    Some(edge.source.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn alarm_node(&self) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.category == NodeCategory::Alarm)
    }

    /// 节点本身是告警节点，或与告警节点直接相连
    pub fn is_alarm_related(&self, id: &str) -> bool {
        match self.alarm_node() {
            Some(alarm) => alarm.id == id || self.has_edge(&alarm.id, id),
            None => false,
        }
    }

    pub fn random_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Edge> {
        if self.edges.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.edges.len());
        self.edges.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::nodes::*;

    #[test]
    fn edge_lookup_ignores_direction() {
        let store = TopologyStore::builtin();
        assert!(store.has_edge(CENTRAL, ALARM));
        assert!(store.has_edge(ALARM, CENTRAL));
        assert!(!store.has_edge(CENTRAL, INFO_PROCESS));
    }

    #[test]
    fn missing_node_reports_not_found() {
        let store = TopologyStore::builtin();
        assert!(matches!(
            store.get_node("Ghost"),
            Err(VizError::NodeNotFound(id)) if id == "Ghost"
        ));
    }

    #[test]
    fn alarm_relations() {
        let store = TopologyStore::builtin();
        assert_eq!(store.alarm_node().map(|n| n.id.as_str()), Some(ALARM));
        assert!(store.is_alarm_related(ALARM));
        assert!(store.is_alarm_related(MESSAGE_CALL));
        assert!(store.is_alarm_related(CENTRAL));
        assert!(!store.is_alarm_related(WALLET));
        assert!(!store.is_alarm_related(AUTO_TRADE));
    }

    #[test]
    fn neighbors_cover_both_directions() {
        let store = TopologyStore::builtin();
        let mut neighbors = store.neighbors(DATA_CLEAN);
        neighbors.sort();
        assert_eq!(neighbors, vec![CENTRAL, MULTI_AGENTS]);
    }
}
