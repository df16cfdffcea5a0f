// 名称解析与路径路由

mod agent_type;
mod resolver;
mod router;

pub use agent_type::agent_type;
pub use resolver::{default_aliases, default_fragments, MatchKind, NameResolver, ResolutionRule};
pub use router::PathRouter;
