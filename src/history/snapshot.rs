use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::message::Interaction;

/// 历史快照的批量格式：`{ "messages": [...], "api_calls": [...] }`
#[derive(Debug, Default, Deserialize)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default)]
    pub api_calls: Vec<Value>,
}

impl HistorySnapshot {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 合并两类记录并按时间戳排序；无法解析的条目跳过
    pub fn into_interactions(self) -> Vec<Interaction> {
        let mut items: Vec<Interaction> = self
            .messages
            .into_iter()
            .chain(self.api_calls)
            .filter_map(|value| match Interaction::from_value(value) {
                Ok(interaction) => Some(interaction),
                Err(error) => {
                    warn!(%error, "skipping malformed snapshot entry");
                    None
                }
            })
            .collect();
        sort_by_timestamp(&mut items);
        items
    }
}

/// 稳定排序，时间戳相同的条目保持原有顺序
pub fn sort_by_timestamp(items: &mut [Interaction]) {
    items.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_and_sorts_both_lists() {
        let snapshot = HistorySnapshot::from_json(
            r#"{
                "messages": [
                    {"source": "CentralAgent", "target": "AlarmAgent", "timestamp": 30},
                    {"source": "User", "target": "CentralAgent", "timestamp": 10}
                ],
                "api_calls": [
                    {"source": "InfoProcessAgent", "target": "API", "type": "api_call", "timestamp": 20},
                    {"broken": true}
                ]
            }"#,
        )
        .unwrap();

        let items = snapshot.into_interactions();
        let stamps: Vec<f64> = items.iter().map(|i| i.timestamp).collect();
        assert_eq!(stamps, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn equal_timestamps_keep_arrival_order() {
        let mut items = vec![
            Interaction::new("a", "b", Default::default()).at(5.0),
            Interaction::new("c", "d", Default::default()).at(1.0),
            Interaction::new("e", "f", Default::default()).at(5.0),
        ];
        sort_by_timestamp(&mut items);
        let sources: Vec<&str> = items.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["c", "a", "e"]);
    }
}
