use serde::{Deserialize, Serialize};

use crate::constants::nodes::*;
use crate::error::{Result, VizError};
use crate::topology::TopologyStore;

/// 规则匹配方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// 名称与 pattern 完全相同
    Exact,
    /// 名称包含 pattern
    Contains,
}

/// 一条名称解析规则
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRule {
    pub pattern: String,
    pub node_id: String,
    pub kind: MatchKind,
}

impl ResolutionRule {
    pub fn alias(pattern: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            node_id: node_id.into(),
            kind: MatchKind::Exact,
        }
    }

    pub fn fragment(pattern: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            node_id: node_id.into(),
            kind: MatchKind::Contains,
        }
    }

    pub fn matches(&self, raw: &str) -> bool {
        match self.kind {
            MatchKind::Exact => raw == self.pattern,
            MatchKind::Contains => raw.contains(self.pattern.as_str()),
        }
    }
}

/// 名称解析器
///
/// 把消息流中的任意 agent 名称映射为拓扑中的规范节点 ID。
/// 顺序：规范 ID 精确匹配 → 别名表 → 子串片段表，首个命中即返回
#[derive(Clone, Debug)]
pub struct NameResolver {
    node_ids: Vec<String>,
    aliases: Vec<ResolutionRule>,
    fragments: Vec<ResolutionRule>,
}

impl NameResolver {
    pub fn new(
        topology: &TopologyStore,
        aliases: Vec<ResolutionRule>,
        fragments: Vec<ResolutionRule>,
    ) -> Result<Self> {
        for rule in aliases.iter().chain(fragments.iter()) {
            if !topology.contains(&rule.node_id) {
                return Err(VizError::UnknownRuleTarget {
                    pattern: rule.pattern.clone(),
                    node: rule.node_id.clone(),
                });
            }
        }

        Ok(Self {
            node_ids: topology
                .list_nodes()
                .iter()
                .map(|node| node.id.clone())
                .collect(),
            aliases,
            fragments,
        })
    }

    /// 使用内置别名表与片段表
    pub fn with_default_rules(topology: &TopologyStore) -> Result<Self> {
        Self::new(topology, default_aliases(), default_fragments())
    }

    /// 内置规则中只保留目标节点存在于该拓扑的部分，用于自定义拓扑
    pub fn for_topology(topology: &TopologyStore) -> Self {
        let keep = |rules: Vec<ResolutionRule>| -> Vec<ResolutionRule> {
            rules
                .into_iter()
                .filter(|rule| topology.contains(&rule.node_id))
                .collect()
        };
        Self {
            node_ids: topology
                .list_nodes()
                .iter()
                .map(|node| node.id.clone())
                .collect(),
            aliases: keep(default_aliases()),
            fragments: keep(default_fragments()),
        }
    }

    pub fn resolve(&self, raw: &str) -> Option<String> {
        if self.node_ids.iter().any(|id| id == raw) {
            return Some(raw.to_string());
        }

        self.aliases
            .iter()
            .chain(self.fragments.iter())
            .find(|rule| rule.matches(raw))
            .map(|rule| rule.node_id.clone())
    }

    pub fn rules(&self) -> impl Iterator<Item = &ResolutionRule> {
        self.aliases.iter().chain(self.fragments.iter())
    }
}

pub fn default_aliases() -> Vec<ResolutionRule> {
    vec![
        ResolutionRule::alias("API", BLOCKCHAIN_API),
        ResolutionRule::alias("LLM", LLM_API),
        ResolutionRule::alias("System", USER),
        ResolutionRule::alias("Client", USER),
    ]
}

pub fn default_fragments() -> Vec<ResolutionRule> {
    [
        ("InfoProcessAgent", INFO_PROCESS),
        ("CentralAgent", CENTRAL),
        ("DataCleanAgent", DATA_CLEAN),
        ("UserAgent", USER),
        ("CEXWithdrawAgent", CEX_WITHDRAW),
        ("SpecificCoinWhaleAgent", WHALE),
        ("FreqTxAgent", TX),
        ("ContractMonitorAgent", CONTRACT_MONITOR),
        ("BasicCoinInfoAgent", BASIC_INFO),
        ("AlarmAgent", ALARM),
        ("WalletAgent", WALLET),
        ("CEXAgent", CEX),
        ("AutoTradeAgent", AUTO_TRADE),
    ]
    .into_iter()
    .map(|(pattern, node)| ResolutionRule::fragment(pattern, node))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> NameResolver {
        NameResolver::with_default_rules(&TopologyStore::builtin()).unwrap()
    }

    #[test]
    fn canonical_ids_resolve_to_themselves() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("MultiAgents").as_deref(), Some(MULTI_AGENTS));
        assert_eq!(resolver.resolve("User").as_deref(), Some(USER));
    }

    #[test]
    fn aliases_win_over_fragments() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("API").as_deref(), Some(BLOCKCHAIN_API));
        assert_eq!(resolver.resolve("LLM").as_deref(), Some(LLM_API));
        assert_eq!(resolver.resolve("Client").as_deref(), Some(USER));
    }

    #[test]
    fn fragments_match_decorated_names() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve("SpecificCoinWhaleAgent-eth").as_deref(),
            Some(WHALE)
        );
        assert_eq!(resolver.resolve("my_FreqTxAgent_1").as_deref(), Some(TX));
        assert_eq!(resolver.resolve("CEXWithdrawAgent#2").as_deref(), Some(CEX_WITHDRAW));
        assert_eq!(resolver.resolve("UnknownXYZ"), None);
    }

    #[test]
    fn rule_with_unknown_target_is_rejected() {
        let topology = TopologyStore::builtin();
        let result = NameResolver::new(
            &topology,
            vec![ResolutionRule::alias("Ghost", "GhostNode")],
            Vec::new(),
        );
        assert!(matches!(result, Err(VizError::UnknownRuleTarget { .. })));
    }
}
