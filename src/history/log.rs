use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::message::{Interaction, PersistedInteraction};

use super::sink::HistorySink;

/// 交互日志
///
/// 内存中的历史只追加、不修改；每条记录同时以 fire-and-forget 的方式
/// 转发给持久化端，转发失败只记日志
pub struct InteractionLog {
    history: RwLock<Vec<Interaction>>,
    sink: Option<Arc<dyn HistorySink>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self {
            history: RwLock::new(Vec::new()),
            sink: None,
        }
    }

    pub fn with_sink(sink: Arc<dyn HistorySink>) -> Self {
        Self {
            history: RwLock::new(Vec::new()),
            sink: Some(sink),
        }
    }

    pub fn record(&self, interaction: Interaction) {
        let record = self
            .sink
            .as_ref()
            .map(|sink| (Arc::clone(sink), PersistedInteraction::from_interaction(&interaction)));

        self.history.write().push(interaction);

        if let Some((sink, record)) = record {
            forward(sink, record);
        }
    }

    pub fn history(&self) -> Vec<Interaction> {
        self.history.read().clone()
    }

    pub fn last(&self) -> Option<Interaction> {
        self.history.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::new()
    }
}

fn forward(sink: Arc<dyn HistorySink>, record: PersistedInteraction) {
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let message_id = record.message_id.clone();
                match sink.persist(record).await {
                    Ok(()) => debug!(%message_id, "interaction persisted"),
                    Err(error) => warn!(%message_id, %error, "failed to persist interaction"),
                }
            });
        }
        Err(_) => {
            warn!(
                message_id = %record.message_id,
                "no async runtime available, interaction not persisted"
            );
        }
    }
}
