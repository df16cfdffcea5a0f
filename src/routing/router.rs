use std::sync::Arc;

use crate::constants::nodes::DEFAULT_HUBS;
use crate::topology::TopologyStore;

/// 路径路由器
///
/// 直接边优先；否则按固定顺序尝试经由枢纽节点的两跳路径。
/// 这不是通用的最短路搜索，拓扑是星形的，两跳已经足够
#[derive(Clone, Debug)]
pub struct PathRouter {
    topology: Arc<TopologyStore>,
    hubs: Vec<String>,
}

impl PathRouter {
    pub fn new(topology: Arc<TopologyStore>, hubs: Vec<String>) -> Self {
        Self { topology, hubs }
    }

    pub fn with_default_hubs(topology: Arc<TopologyStore>) -> Self {
        Self::new(
            topology,
            DEFAULT_HUBS.iter().map(|hub| hub.to_string()).collect(),
        )
    }

    pub fn hubs(&self) -> &[String] {
        &self.hubs
    }

    /// 返回长度 >= 2 的节点序列；自环与不可达时返回 `None`
    pub fn find_path(&self, source: &str, target: &str) -> Option<Vec<String>> {
        if source == target {
            return None;
        }

        if self.topology.has_edge(source, target) {
            return Some(vec![source.to_string(), target.to_string()]);
        }

        self.hubs
            .iter()
            .find(|hub| {
                self.topology.has_edge(source, hub) && self.topology.has_edge(hub, target)
            })
            .map(|hub| vec![source.to_string(), hub.clone(), target.to_string()])
    }
}
