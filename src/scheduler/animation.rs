use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::topology::Position;

static NEXT_FLOW_ID: AtomicU64 = AtomicU64::new(1);

/// 数据流动画的唯一 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowId(u64);

impl FlowId {
    pub fn next() -> Self {
        Self(NEXT_FLOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flow-{}", self.0)
    }
}

/// 一次单跳数据流动画
#[derive(Clone, Debug)]
pub struct FlowAnimation {
    pub id: FlowId,
    pub source: String,
    pub target: String,
    pub color: String,
    pub started_at: Instant,
    pub duration: Duration,
    pub from: Position,
    pub to: Position,
}

/// 单跳结束的方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HopOutcome {
    Completed,
    Cancelled,
}

/// 单跳动画句柄，可等待其结束
#[derive(Debug)]
pub struct FlowHandle {
    id: FlowId,
    done: oneshot::Receiver<()>,
}

impl FlowHandle {
    pub(crate) fn new(id: FlowId, done: oneshot::Receiver<()>) -> Self {
        Self { id, done }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    /// 动画自然结束返回 `Completed`；被取消时发送端被丢弃，返回 `Cancelled`
    pub async fn finished(self) -> HopOutcome {
        match self.done.await {
            Ok(()) => HopOutcome::Completed,
            Err(_) => HopOutcome::Cancelled,
        }
    }
}

/// 多跳路径动画的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    Completed { hops: usize },
    /// 某一跳无法绘制（不是拓扑边或渲染面未就绪）
    Interrupted { hops: usize },
    Cancelled { hops: usize },
}

impl PathOutcome {
    pub fn hops(&self) -> usize {
        match self {
            PathOutcome::Completed { hops }
            | PathOutcome::Interrupted { hops }
            | PathOutcome::Cancelled { hops } => *hops,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PathOutcome::Completed { .. })
    }
}
