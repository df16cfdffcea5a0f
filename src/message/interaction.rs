use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::colors;
use crate::error::{Result, VizError};

/// 交互类型，线上格式为 snake_case 字符串
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    #[default]
    #[serde(alias = "agent_message")]
    Message,
    ApiCall,
    ApiResponse,
    System,
    Error,
    LlmRequest,
    LlmResponse,
    #[serde(other)]
    Other,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Message => "message",
            InteractionKind::ApiCall => "api_call",
            InteractionKind::ApiResponse => "api_response",
            InteractionKind::System => "system",
            InteractionKind::Error => "error",
            InteractionKind::LlmRequest => "llm_request",
            InteractionKind::LlmResponse => "llm_response",
            InteractionKind::Other => "other",
        }
    }

    /// 数据流动画的颜色
    pub fn color(&self) -> &'static str {
        match self {
            InteractionKind::Message => colors::MESSAGE,
            InteractionKind::ApiCall => colors::API_CALL,
            InteractionKind::ApiResponse => colors::API_RESPONSE,
            InteractionKind::System => colors::SYSTEM,
            _ => colors::FALLBACK,
        }
    }
}

/// 交互内容：纯文本或任意 JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InteractionContent {
    Text(String),
    Structured(Value),
}

impl InteractionContent {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Self::Text(text)),
            other => Some(Self::Structured(other)),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            InteractionContent::Text(text) => text.clone(),
            InteractionContent::Structured(value) => value.to_string(),
        }
    }
}

/// 一次 agent 交互
///
/// 创建后不可变；时间戳单位为秒
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InboundInteraction")]
pub struct Interaction {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<InteractionContent>,
    pub timestamp: f64,
}

impl Interaction {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            content: None,
            timestamp: now_seconds(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = Some(InteractionContent::Text(text.into()));
        self
    }

    pub fn with_content(mut self, value: Value) -> Self {
        self.content = InteractionContent::from_value(value);
        self
    }

    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// 解析入站 JSON；缺失必填字段或无法解析时返回 `MalformedPayload`
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| VizError::MalformedPayload(err.to_string()))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| VizError::MalformedPayload(err.to_string()))
    }

    pub fn content_text(&self) -> String {
        self.content
            .as_ref()
            .map(InteractionContent::as_text)
            .unwrap_or_default()
    }
}

/// 入站消息的线上格式，`content` 缺失时退回 `message`
#[derive(Debug, Deserialize)]
pub struct InboundInteraction {
    source: String,
    target: String,
    #[serde(rename = "type", default)]
    kind: Option<InteractionKind>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    timestamp: f64,
}

impl TryFrom<InboundInteraction> for Interaction {
    type Error = String;

    fn try_from(inbound: InboundInteraction) -> std::result::Result<Self, Self::Error> {
        if inbound.source.trim().is_empty() || inbound.target.trim().is_empty() {
            return Err("source and target must not be empty".to_string());
        }
        if !inbound.timestamp.is_finite() {
            return Err("timestamp must be a finite number".to_string());
        }

        let content = inbound
            .content
            .and_then(InteractionContent::from_value)
            .or_else(|| inbound.message.and_then(InteractionContent::from_value));

        Ok(Interaction {
            source: inbound.source,
            target: inbound.target,
            kind: inbound.kind.unwrap_or_default(),
            content,
            timestamp: inbound.timestamp,
        })
    }
}

pub fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
