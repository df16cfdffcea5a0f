use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::VizConfig;
use crate::constants::colors;
use crate::error::Result;
use crate::history::{sort_by_timestamp, HistorySink, InteractionLog};
use crate::message::Interaction;
use crate::routing::{NameResolver, PathRouter};
use crate::scheduler::{AnimationScheduler, FlowId, HighlightStyle, RenderSurface};
use crate::topology::{Layout, TopologyStore};

/// 一条交互的可视化结果
#[derive(Clone, Debug, PartialEq)]
pub enum Visualization {
    /// 第一跳已经启动，其余跳在后台接续
    Animated { path: Vec<String>, flow: FlowId },
    /// 源或目标名称无法映射到节点
    Unresolved { source: String, target: String },
    NoPath { source: String, target: String },
    /// 渲染面未就绪
    Unavailable,
}

impl Visualization {
    pub fn is_animated(&self) -> bool {
        matches!(self, Visualization::Animated { .. })
    }
}

/// 一次随机数据流的结果
#[derive(Clone, Debug, PartialEq)]
pub enum RandomTick {
    Animated {
        source: String,
        target: String,
        color: String,
        flow: FlowId,
    },
    /// 边与告警节点相连，只高亮边框
    AlarmHighlight { source: String, target: String },
    Skipped,
}

/// 可视化引擎
///
/// 持有拓扑、名称解析、路由、交互日志与动画调度器，
/// 所有组件都挂在这个上下文对象上，不使用全局状态
pub struct VisualizationEngine {
    config: VizConfig,
    topology: Arc<TopologyStore>,
    resolver: Arc<NameResolver>,
    router: PathRouter,
    log: Arc<InteractionLog>,
    scheduler: AnimationScheduler,
}

impl VisualizationEngine {
    pub fn new(config: VizConfig, sink: Option<Arc<dyn HistorySink>>) -> Result<Self> {
        config.validate()?;

        let (topology, resolver) = match config.topology.clone() {
            Some(custom) => {
                let topology = TopologyStore::new(custom)?;
                let resolver = NameResolver::for_topology(&topology);
                (topology, resolver)
            }
            None => {
                let topology = TopologyStore::builtin();
                let resolver = NameResolver::with_default_rules(&topology)?;
                (topology, resolver)
            }
        };
        let topology = Arc::new(topology);
        let resolver = Arc::new(resolver);
        let router = PathRouter::with_default_hubs(Arc::clone(&topology));
        let log = Arc::new(match sink {
            Some(sink) => InteractionLog::with_sink(sink),
            None => InteractionLog::new(),
        });
        let scheduler = AnimationScheduler::new(
            Arc::clone(&topology),
            Arc::clone(&resolver),
            router.clone(),
            config.timing,
            Some(Arc::clone(&log)),
        );

        info!(
            nodes = topology.list_nodes().len(),
            edges = topology.list_edges().len(),
            "visualization engine initialized"
        );

        Ok(Self {
            config,
            topology,
            resolver,
            router,
            log,
            scheduler,
        })
    }

    /// 内置拓扑、默认时长、无持久化端
    pub fn builtin() -> Result<Self> {
        Self::new(VizConfig::default(), None)
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn topology(&self) -> &Arc<TopologyStore> {
        &self.topology
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn router(&self) -> &PathRouter {
        &self.router
    }

    pub fn log(&self) -> &Arc<InteractionLog> {
        &self.log
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn attach_surface(&self, surface: Arc<dyn RenderSurface>) {
        self.scheduler.attach_surface(surface);
    }

    /// 记录并可视化一条交互
    ///
    /// 无论能否绘制，交互都会先写入历史
    pub fn process(&self, interaction: Interaction) -> Visualization {
        let source = self.resolver.resolve(&interaction.source);
        let target = self.resolver.resolve(&interaction.target);
        let color = interaction.kind.color();
        let raw_source = interaction.source.clone();
        let raw_target = interaction.target.clone();

        self.log.record(interaction);

        let (Some(source), Some(target)) = (source, target) else {
            warn!(source = %raw_source, target = %raw_target, "cannot map interaction to topology nodes");
            return Visualization::Unresolved {
                source: raw_source,
                target: raw_target,
            };
        };

        let Some(path) = self.router.find_path(&source, &target) else {
            warn!(%source, %target, "no path between nodes, animation suppressed");
            return Visualization::NoPath { source, target };
        };

        match self
            .scheduler
            .dispatch_path(path.clone(), color, self.config.timing.hop_duration())
        {
            Some(flow) => {
                debug!(path = ?path, %flow, "interaction animated");
                Visualization::Animated { path, flow }
            }
            None => Visualization::Unavailable,
        }
    }

    /// 回放历史快照：按时间戳稳定排序后逐条处理
    pub fn load_snapshot(&self, mut items: Vec<Interaction>) -> Vec<Visualization> {
        sort_by_timestamp(&mut items);
        info!(count = items.len(), "replaying interaction history");
        items.into_iter().map(|item| self.process(item)).collect()
    }

    /// 随机选一条边播放数据流；任一端点与告警相关时只做边框高亮
    pub fn simulate_random_flow<R: Rng + ?Sized>(&self, rng: &mut R) -> RandomTick {
        if !self.scheduler.is_ready() {
            return RandomTick::Skipped;
        }
        let Some(edge) = self.topology.random_edge(rng).cloned() else {
            return RandomTick::Skipped;
        };

        if self.topology.is_alarm_related(&edge.source)
            || self.topology.is_alarm_related(&edge.target)
        {
            let alarm_id = self.topology.alarm_node().map(|alarm| alarm.id.clone());
            for endpoint in [&edge.source, &edge.target] {
                if alarm_id.as_deref() != Some(endpoint.as_str()) {
                    self.scheduler.highlight(endpoint, HighlightStyle::Related);
                }
            }
            if let Some(alarm_id) = alarm_id {
                self.scheduler.highlight(&alarm_id, HighlightStyle::Alert);
            }
            return RandomTick::AlarmHighlight {
                source: edge.source,
                target: edge.target,
            };
        }

        let color = colors::RANDOM_PALETTE[rng.random_range(0..colors::RANDOM_PALETTE.len())];
        match self.scheduler.animate_hop(
            &edge.source,
            &edge.target,
            color,
            self.config.timing.hop_duration(),
        ) {
            Some(handle) => RandomTick::Animated {
                source: edge.source,
                target: edge.target,
                color: color.to_string(),
                flow: handle.id(),
            },
            None => RandomTick::Skipped,
        }
    }

    pub fn resize(&self, width: f64, height: f64) {
        let layout = Layout::fit(width, height);
        debug!(width, height, scale_x = layout.scale_x, scale_y = layout.scale_y, "layout resized");
        self.scheduler.set_layout(layout);
    }

    /// 取消所有进行中的动画并恢复默认缩放
    pub fn reset_view(&self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        self.scheduler.set_layout(Layout::default());
        cancelled
    }
}
