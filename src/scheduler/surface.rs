use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::topology::{Node, Position};

use super::animation::{FlowAnimation, FlowId};

/// 节点边框高亮样式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightStyle {
    /// 告警节点，伴随扩散脉冲
    Alert,
    /// 与告警节点相关的节点
    Related,
    /// 序列步骤中的源/目标节点
    Step,
}

impl HighlightStyle {
    pub fn color(&self) -> &'static str {
        use crate::constants::colors;
        match self {
            HighlightStyle::Alert => colors::ALERT_BORDER,
            HighlightStyle::Related => colors::RELATED_BORDER,
            HighlightStyle::Step => colors::STEP_BORDER,
        }
    }
}

/// 渲染面
///
/// 调度器只通过这个 trait 产生可见效果；真正的绘制由外部实现
pub trait RenderSurface: Send + Sync {
    fn draw_flow(&self, flow: &FlowAnimation);
    fn remove_flow(&self, id: FlowId);
    fn pulse(&self, node: &Node, at: Position, color: &str, duration: Duration);
    fn highlight(&self, node: &Node, style: HighlightStyle);
}

/// 渲染事件
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    FlowDrawn {
        id: FlowId,
        source: String,
        target: String,
        color: String,
    },
    FlowRemoved(FlowId),
    Pulse {
        node: String,
        color: String,
    },
    Highlight {
        node: String,
        style: HighlightStyle,
    },
}

/// 记录所有渲染事件，供测试与回放检查
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// 按顺序返回绘制过的 (source, target)
    pub fn hops(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::FlowDrawn { source, target, .. } => {
                    Some((source.clone(), target.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn pulses(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Pulse { node, .. } => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn highlights(&self) -> Vec<(String, HighlightStyle)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Highlight { node, style } => Some((node.clone(), *style)),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_flow(&self, flow: &FlowAnimation) {
        self.events.lock().push(SurfaceEvent::FlowDrawn {
            id: flow.id,
            source: flow.source.clone(),
            target: flow.target.clone(),
            color: flow.color.clone(),
        });
    }

    fn remove_flow(&self, id: FlowId) {
        self.events.lock().push(SurfaceEvent::FlowRemoved(id));
    }

    fn pulse(&self, node: &Node, _at: Position, color: &str, _duration: Duration) {
        self.events.lock().push(SurfaceEvent::Pulse {
            node: node.id.clone(),
            color: color.to_string(),
        });
    }

    fn highlight(&self, node: &Node, style: HighlightStyle) {
        self.events.lock().push(SurfaceEvent::Highlight {
            node: node.id.clone(),
            style,
        });
    }
}

/// 把渲染事件输出为日志，用于无界面的模拟运行
#[derive(Default, Clone, Copy)]
pub struct TracingSurface;

impl RenderSurface for TracingSurface {
    fn draw_flow(&self, flow: &FlowAnimation) {
        info!(
            flow = %flow.id,
            source = %flow.source,
            target = %flow.target,
            color = %flow.color,
            duration_ms = flow.duration.as_millis() as u64,
            "flow"
        );
    }

    fn remove_flow(&self, id: FlowId) {
        debug!(flow = %id, "flow removed");
    }

    fn pulse(&self, node: &Node, at: Position, color: &str, duration: Duration) {
        debug!(
            node = %node.id,
            x = at.x,
            y = at.y,
            color,
            duration_ms = duration.as_millis() as u64,
            "pulse"
        );
    }

    fn highlight(&self, node: &Node, style: HighlightStyle) {
        info!(node = %node.id, style = ?style, color = style.color(), "highlight");
    }
}
