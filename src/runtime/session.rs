use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::constants::{colors, nodes};
use crate::error::{Result, VizError};
use crate::message::Interaction;
use crate::scheduler::{CycleGuard, FlowHandle, HopOutcome};

use super::driver::SimulationDriver;
use super::engine::{Visualization, VisualizationEngine};

static KEY_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[A-Za-z]{3}|\d{3}").ok());

/// 提取连续三个字母或三个数字的片段，按出现顺序返回
pub fn extract_key_patterns(text: &str) -> Vec<String> {
    KEY_PATTERN
        .as_ref()
        .map(|pattern| {
            pattern
                .find_iter(text)
                .map(|found| found.as_str().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// 用户提交的请求
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub message: String,
}

/// 请求处理端的响应
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_response: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 展示给用户的回复
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionReply {
    Error(String),
    Formatted(String),
    /// 既无错误也无格式化文本时，展示原始 JSON
    Raw(String),
}

impl SubmissionResponse {
    pub fn formatted(text: impl Into<String>) -> Self {
        Self {
            formatted_response: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn reply(&self) -> SubmissionReply {
        if let Some(error) = &self.error {
            return SubmissionReply::Error(error.clone());
        }
        if let Some(text) = &self.formatted_response {
            return SubmissionReply::Formatted(text.clone());
        }
        SubmissionReply::Raw(serde_json::to_string_pretty(self).unwrap_or_default())
    }
}

/// 处理用户请求的外部服务
#[async_trait]
pub trait RequestProcessor: Send + Sync {
    async fn process(&self, request: SubmissionRequest) -> Result<SubmissionResponse>;

    /// 保存从请求中提取的关键片段，默认不做任何事
    async fn save_keys(&self, _keys: &[String]) -> Result<()> {
        Ok(())
    }

    /// 关键片段保存成功后触发的合约调用，返回服务端的 JSON 回复
    async fn call_contract(&self) -> Result<Value> {
        Ok(Value::Null)
    }
}

pub type DynRequestProcessor = Arc<dyn RequestProcessor>;

/// 离线回显，不依赖任何服务
#[derive(Default, Clone)]
pub struct LocalEchoProcessor;

#[async_trait]
impl RequestProcessor for LocalEchoProcessor {
    async fn process(&self, request: SubmissionRequest) -> Result<SubmissionResponse> {
        Ok(SubmissionResponse::formatted(format!("[Echo] {}", request.message)))
    }
}

/// 一个用户会话
///
/// 串起引擎、模拟驱动与请求处理端：首次提交激活驱动，
/// 在此之前收到的入站消息都被忽略。
/// 合约调用同一时刻只允许一个，进行中的触发直接丢弃
pub struct Session {
    engine: Arc<VisualizationEngine>,
    driver: SimulationDriver,
    processor: DynRequestProcessor,
    contract_guard: CycleGuard,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    pub fn new(engine: Arc<VisualizationEngine>, processor: DynRequestProcessor) -> Self {
        let driver = SimulationDriver::new(Arc::clone(&engine));
        Self {
            engine,
            driver,
            processor,
            contract_guard: CycleGuard::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn engine(&self) -> &Arc<VisualizationEngine> {
        &self.engine
    }

    pub fn driver(&self) -> &SimulationDriver {
        &self.driver
    }

    pub fn is_active(&self) -> bool {
        self.driver.is_active()
    }

    pub fn contract_guard(&self) -> &CycleGuard {
        &self.contract_guard
    }

    pub async fn submit(&self, text: &str) -> Result<SubmissionReply> {
        let message = text.trim();
        if message.is_empty() {
            return Err(VizError::EmptyRequest);
        }

        let keys = extract_key_patterns(message);
        if !keys.is_empty() {
            debug!(keys = ?keys, "extracted key patterns");
            self.spawn_key_save(keys);
        }

        if self.driver.activate() {
            info!("first submission, periodic simulation started");
        }

        let timing = *self.engine.scheduler().timing();
        self.engine.scheduler().animate_hop(
            nodes::USER,
            nodes::CENTRAL,
            colors::USER_REQUEST,
            timing.hop_duration(),
        );

        let response = self
            .processor
            .process(SubmissionRequest {
                message: message.to_string(),
            })
            .await;

        // 传输失败不广播；服务端返回的 error 字段仍然广播
        match response {
            Ok(response) => {
                self.schedule_fanout();
                Ok(response.reply())
            }
            Err(err) => {
                warn!(error = %err, "request processing failed");
                Ok(SubmissionReply::Error(format!("request failed: {err}")))
            }
        }
    }

    /// 后台保存关键片段，成功后触发合约调用
    fn spawn_key_save(&self, keys: Vec<String>) {
        let processor = Arc::clone(&self.processor);
        let guard = self.contract_guard.clone();

        self.track(tokio::spawn(async move {
            if let Err(err) = processor.save_keys(&keys).await {
                warn!(error = %err, "failed to save extracted keys");
                return;
            }

            let Some(_permit) = guard.try_acquire() else {
                info!("contract call already in progress, trigger dropped");
                return;
            };
            match processor.call_contract().await {
                Ok(reply) => info!(%reply, "contract call finished"),
                Err(err) => warn!(error = %err, "contract call failed"),
            }
        }));
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|handle| !handle.is_finished());
        tasks.push(task);
    }

    /// 中央节点向各下游节点广播，非拓扑边的目标自动跳过
    fn schedule_fanout(&self) {
        let engine = Arc::clone(&self.engine);
        let timing = *engine.scheduler().timing();
        let color = engine
            .topology()
            .get_node(nodes::CENTRAL)
            .map(|central| central.color.clone())
            .unwrap_or_else(|_| colors::MESSAGE.to_string());

        self.track(tokio::spawn(async move {
            sleep(timing.fanout_delay()).await;
            let handles: Vec<FlowHandle> = nodes::SUBMISSION_FANOUT
                .iter()
                .filter_map(|target| {
                    engine.scheduler().animate_hop(
                        nodes::CENTRAL,
                        target,
                        &color,
                        timing.hop_duration(),
                    )
                })
                .collect();
            let started = handles.len();
            let outcomes = join_all(handles.into_iter().map(FlowHandle::finished)).await;
            let completed = outcomes
                .iter()
                .filter(|outcome| **outcome == HopOutcome::Completed)
                .count();
            debug!(started, completed, "submission fan-out finished");
        }));
    }

    /// 处理入站的实时消息
    pub fn handle_inbound(&self, raw: &str) -> Option<Visualization> {
        if !self.is_active() {
            debug!("session not active yet, inbound message ignored");
            return None;
        }
        match Interaction::from_json(raw) {
            Ok(interaction) => Some(self.engine.process(interaction)),
            Err(err) => {
                warn!(error = %err, "discarding malformed inbound message");
                None
            }
        }
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.engine.resize(width, height);
    }

    pub fn reset_view(&self) -> usize {
        self.engine.reset_view()
    }

    /// 停止周期任务并取消所有动画
    pub fn teardown(&self) {
        self.driver.shutdown();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        let cancelled = self.engine.reset_view();
        info!(cancelled, "session torn down");
    }
}
