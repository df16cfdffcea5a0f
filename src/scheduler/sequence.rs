use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::message::InteractionKind;

/// 守卫序列中的一步
///
/// `from` / `to` 是逻辑名称，执行时再经名称解析与路由
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub from: String,
    pub to: String,
    pub message: String,
    /// 本步动画结束后、下一步开始前的等待；`None` 使用默认值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub kind: InteractionKind,
}

impl SequenceStep {
    pub fn new(from: impl Into<String>, to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message: message.into(),
            delay_ms: None,
            kind: InteractionKind::Message,
        }
    }

    pub fn delay(mut self, millis: u64) -> Self {
        self.delay_ms = Some(millis);
        self
    }

    pub fn kind(mut self, kind: InteractionKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn delay_or(&self, default: Duration) -> Duration {
        self.delay_ms.map(Duration::from_millis).unwrap_or(default)
    }
}

/// 一次守卫序列的执行报告
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceReport {
    pub executed: usize,
    pub skipped: usize,
    /// 视图重置取消了进行中的动画
    pub cancelled: bool,
    pub timed_out: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceOutcome {
    Finished(SequenceReport),
    /// 已有序列在运行，本次请求被丢弃
    Rejected,
    /// 渲染面尚未就绪
    Unavailable,
}

impl SequenceOutcome {
    pub fn report(&self) -> Option<&SequenceReport> {
        match self {
            SequenceOutcome::Finished(report) => Some(report),
            _ => None,
        }
    }
}
