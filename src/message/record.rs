use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::record;
use crate::routing::agent_type;

use super::interaction::{now_seconds, Interaction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub agent_id: String,
    pub agent_type: String,
}

impl AgentRef {
    pub fn for_name(name: &str) -> Self {
        Self {
            agent_id: name.to_string(),
            agent_type: agent_type(name).to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub priority: String,
    pub processed: bool,
    pub client_generated: bool,
}

impl Default for RecordMetadata {
    fn default() -> Self {
        Self {
            priority: record::PRIORITY_NORMAL.to_string(),
            processed: false,
            client_generated: true,
        }
    }
}

/// 发往持久化服务的标准化交互记录
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedInteraction {
    pub version: String,
    pub protocol: String,
    pub message_id: String,
    pub timestamp: f64,
    pub source: AgentRef,
    pub target: AgentRef,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub metadata: RecordMetadata,
}

impl PersistedInteraction {
    /// 时间戳取转发时刻，而不是交互自身的时间戳
    pub fn from_interaction(interaction: &Interaction) -> Self {
        Self {
            version: record::VERSION.to_string(),
            protocol: record::PROTOCOL.to_string(),
            message_id: message_id(),
            timestamp: now_seconds(),
            source: AgentRef::for_name(&interaction.source),
            target: AgentRef::for_name(&interaction.target),
            kind: interaction.kind.as_str().to_string(),
            content: interaction.content_text(),
            metadata: RecordMetadata::default(),
        }
    }
}

/// 毫秒时间戳后接四位以内的随机数
pub fn message_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let suffix: u32 = rand::rng().random_range(0..10_000);
    format!("{millis}{suffix}")
}
