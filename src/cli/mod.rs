use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::VizConfig;
use crate::error::{Result, VizError};
use crate::history::{HistorySink, HistorySnapshot};
use crate::message::Interaction;
use crate::topology::TopologyStore;

#[derive(Clone, Debug, Serialize)]
pub struct TopologyRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub neighbors: Vec<String>,
}

pub fn topology_rows(topology: &TopologyStore) -> Vec<TopologyRow> {
    topology
        .list_nodes()
        .iter()
        .map(|node| TopologyRow {
            id: node.id.clone(),
            name: node.display_name.clone(),
            category: node.category.as_str().to_string(),
            neighbors: topology
                .neighbors(&node.id)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// 读取配置文件并应用环境变量覆盖；未给出路径时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<VizConfig> {
    let config = match path {
        Some(path) => VizConfig::from_file(path)?,
        None => VizConfig::default(),
    };
    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// 读取历史文件
///
/// 接受快照格式 `{ "messages": [...], "api_calls": [...] }`，
/// 也接受交互数组；结果按时间戳排序
pub fn load_history_file(path: &Path) -> Result<Vec<Interaction>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let snapshot = match value {
        Value::Array(items) => HistorySnapshot {
            messages: items,
            api_calls: Vec::new(),
        },
        Value::Object(_) => serde_json::from_value::<HistorySnapshot>(value)?,
        _ => {
            return Err(VizError::MalformedPayload(format!(
                "history file `{}` must contain an object or an array",
                path.display()
            )))
        }
    };
    Ok(snapshot.into_interactions())
}

/// 根据配置构建历史记录落地端；未配置端点时只保留内存历史
pub fn history_sink(config: &VizConfig) -> Option<Arc<dyn HistorySink>> {
    let endpoint = config.history_endpoint.as_deref()?;

    #[cfg(feature = "http-sink")]
    {
        tracing::info!(endpoint, "Persisting interactions over HTTP");
        Some(Arc::new(crate::history::HttpSink::new(endpoint)))
    }

    #[cfg(not(feature = "http-sink"))]
    {
        tracing::warn!(
            endpoint,
            "history_endpoint is set but the http-sink feature is disabled; keeping history in memory"
        );
        None
    }
}
