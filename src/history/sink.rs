use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;
use crate::message::PersistedInteraction;

/// 交互记录的外部持久化端
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn persist(&self, record: PersistedInteraction) -> Result<()>;
}

/// 内存实现
#[derive(Default)]
pub struct MemorySink {
    records: RwLock<Vec<PersistedInteraction>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<PersistedInteraction> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl HistorySink for MemorySink {
    async fn persist(&self, record: PersistedInteraction) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }
}

#[cfg(feature = "http-sink")]
pub mod http {
    use super::*;
    use crate::error::VizError;

    /// 通过 HTTP POST 保存记录
    pub struct HttpSink {
        client: reqwest::Client,
        endpoint: String,
    }

    impl HttpSink {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
            }
        }

        pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
            Self {
                client,
                endpoint: endpoint.into(),
            }
        }
    }

    #[async_trait]
    impl HistorySink for HttpSink {
        async fn persist(&self, record: PersistedInteraction) -> Result<()> {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&record)
                .send()
                .await
                .map_err(|e| VizError::Persistence(e.to_string()))?;
            response
                .error_for_status()
                .map_err(|e| VizError::Persistence(e.to_string()))?;
            Ok(())
        }
    }
}
