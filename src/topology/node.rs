use serde::{Deserialize, Serialize};

/// 节点在设计画布上的坐标
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// 节点角色分类
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeCategory {
    Central,
    Specialized,
    Processor,
    Dispatcher,
    Cleaner,
    Alarm,
    Executor,
    User,
    ExternalService,
    Result,
}

impl NodeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCategory::Central => "central",
            NodeCategory::Specialized => "specialized",
            NodeCategory::Processor => "processor",
            NodeCategory::Dispatcher => "dispatcher",
            NodeCategory::Cleaner => "cleaner",
            NodeCategory::Alarm => "alarm",
            NodeCategory::Executor => "executor",
            NodeCategory::User => "user",
            NodeCategory::ExternalService => "external-service",
            NodeCategory::Result => "result",
        }
    }
}

/// 拓扑中的一个命名节点
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub category: NodeCategory,
    pub position: Position,
    pub size: Size,
    #[serde(default = "Node::default_color")]
    pub color: String,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category: NodeCategory,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category,
            position: Position::default(),
            size: Size::new(120.0, 40.0),
            color: Self::default_color(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn sized(mut self, w: f64, h: f64) -> Self {
        self.size = Size::new(w, h);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn is_external_service(&self) -> bool {
        self.category == NodeCategory::ExternalService
    }

    fn default_color() -> String {
        crate::constants::colors::FALLBACK.to_string()
    }
}

/// 有向边；路径搜索时按无向处理
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
