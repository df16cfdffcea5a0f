// 拓扑模块

mod layout;
mod node;
mod store;

pub use layout::Layout;
pub use node::{Edge, Node, NodeCategory, Position, Size};
pub use store::TopologyStore;
