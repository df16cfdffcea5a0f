// 交互消息与持久化记录

mod interaction;
mod record;

pub use interaction::{
    now_seconds, InboundInteraction, Interaction, InteractionContent, InteractionKind,
};
pub use record::{message_id, AgentRef, PersistedInteraction, RecordMetadata};
