use crate::constants::layout::{BASE_HEIGHT, BASE_WIDTH};

use super::node::{Node, Position};

/// 画布缩放
///
/// 节点坐标以 1000x800 的设计画布为基准，容器尺寸变化时按比例缩放，
/// 节点尺寸保持不变
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Layout {
    pub fn fit(width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self {
            scale_x: width / BASE_WIDTH,
            scale_y: height / BASE_HEIGHT,
        }
    }

    pub fn position(&self, node: &Node) -> Position {
        Position::new(
            node.position.x * self.scale_x,
            node.position.y * self.scale_y,
        )
    }

    /// 数据流与脉冲的锚点
    pub fn center(&self, node: &Node) -> Position {
        let origin = self.position(node);
        Position::new(origin.x + node.size.w / 2.0, origin.y + node.size.h / 2.0)
    }
}
