use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::config::AnimationTiming;
use crate::history::InteractionLog;
use crate::message::{Interaction, InteractionKind};
use crate::routing::{NameResolver, PathRouter};
use crate::topology::{Layout, TopologyStore};

use super::animation::{FlowAnimation, FlowHandle, FlowId, HopOutcome, PathOutcome};
use super::guard::CycleGuard;
use super::sequence::{SequenceOutcome, SequenceReport, SequenceStep};
use super::surface::{HighlightStyle, RenderSurface};

struct ActiveFlow {
    animation: FlowAnimation,
    task: JoinHandle<()>,
}

struct SchedulerInner {
    topology: Arc<TopologyStore>,
    resolver: Arc<NameResolver>,
    router: PathRouter,
    timing: AnimationTiming,
    history: Option<Arc<InteractionLog>>,
    surface: RwLock<Option<Arc<dyn RenderSurface>>>,
    layout: RwLock<Layout>,
    active: Mutex<HashMap<FlowId, ActiveFlow>>,
    /// 等待回传的外部服务响应
    pending_echoes: Mutex<Vec<JoinHandle<()>>>,
    /// 多跳路径中第一跳之后的接续任务
    relays: Mutex<Vec<JoinHandle<()>>>,
}

/// 动画调度器
///
/// 持有所有进行中的数据流动画。每一跳是一个带计时的独立任务，
/// 自然结束时在目标节点产生脉冲并注销；视图重置时整体取消。
/// 渲染面未挂载时所有操作都是空操作
#[derive(Clone)]
pub struct AnimationScheduler {
    inner: Arc<SchedulerInner>,
}

impl AnimationScheduler {
    pub fn new(
        topology: Arc<TopologyStore>,
        resolver: Arc<NameResolver>,
        router: PathRouter,
        timing: AnimationTiming,
        history: Option<Arc<InteractionLog>>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                topology,
                resolver,
                router,
                timing,
                history,
                surface: RwLock::new(None),
                layout: RwLock::new(Layout::default()),
                active: Mutex::new(HashMap::new()),
                pending_echoes: Mutex::new(Vec::new()),
                relays: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn attach_surface(&self, surface: Arc<dyn RenderSurface>) {
        *self.inner.surface.write() = Some(surface);
    }

    /// 卸载渲染面前先取消所有进行中的动画
    pub fn detach_surface(&self) {
        self.cancel_all();
        *self.inner.surface.write() = None;
    }

    pub fn is_ready(&self) -> bool {
        self.inner.surface.read().is_some()
    }

    pub fn timing(&self) -> &AnimationTiming {
        &self.inner.timing
    }

    pub fn layout(&self) -> Layout {
        *self.inner.layout.read()
    }

    pub fn set_layout(&self, layout: Layout) {
        *self.inner.layout.write() = layout;
    }

    pub fn active_count(&self) -> usize {
        self.inner.active.lock().len()
    }

    /// 没有进行中的数据流，也没有待回传的响应或待接续的路径
    pub fn is_idle(&self) -> bool {
        // 与 complete_hop 相同的加锁顺序：先 active 再 pending_echoes
        let active = self.inner.active.lock();
        let echoes = self.inner.pending_echoes.lock();
        let relays = self.inner.relays.lock();
        active.is_empty()
            && echoes.iter().all(JoinHandle::is_finished)
            && relays.iter().all(JoinHandle::is_finished)
    }

    pub fn active_flows(&self) -> Vec<FlowAnimation> {
        let mut flows: Vec<FlowAnimation> = self
            .inner
            .active
            .lock()
            .values()
            .map(|flow| flow.animation.clone())
            .collect();
        flows.sort_by_key(|flow| flow.id);
        flows
    }

    fn surface(&self) -> Option<Arc<dyn RenderSurface>> {
        self.inner.surface.read().clone()
    }

    /// 启动一跳动画
    ///
    /// 不是拓扑边、渲染面未就绪或不在 tokio 运行时中时返回 `None`
    pub fn animate_hop(
        &self,
        source: &str,
        target: &str,
        color: &str,
        duration: Duration,
    ) -> Option<FlowHandle> {
        let Some(surface) = self.surface() else {
            debug!(source, target, "render surface not ready, hop skipped");
            return None;
        };
        if !self.inner.topology.has_edge(source, target) {
            debug!(source, target, "no topology edge, hop skipped");
            return None;
        }
        let (from_node, to_node) = match (
            self.inner.topology.get_node(source),
            self.inner.topology.get_node(target),
        ) {
            (Ok(from), Ok(to)) => (from, to),
            _ => return None,
        };
        let Ok(runtime) = Handle::try_current() else {
            warn!(source, target, "no async runtime, hop skipped");
            return None;
        };

        let layout = self.layout();
        let animation = FlowAnimation {
            id: FlowId::next(),
            source: source.to_string(),
            target: target.to_string(),
            color: color.to_string(),
            started_at: Instant::now(),
            duration,
            from: layout.center(from_node),
            to: layout.center(to_node),
        };
        let id = animation.id;
        let (done_tx, done_rx) = oneshot::channel();

        surface.draw_flow(&animation);

        let mut active = self.inner.active.lock();
        let scheduler = self.clone();
        let task = runtime.spawn(async move {
            sleep(duration).await;
            scheduler.complete_hop(id, done_tx);
        });
        active.insert(id, ActiveFlow { animation, task });

        Some(FlowHandle::new(id, done_rx))
    }

    fn complete_hop(&self, id: FlowId, done: oneshot::Sender<()>) {
        // 回传任务登记完之前不释放 active，避免外部看到短暂的空闲
        let mut active = self.inner.active.lock();
        let Some(flow) = active.remove(&id) else {
            // 已被取消
            return;
        };
        let animation = flow.animation;

        if let Some(surface) = self.surface() {
            surface.remove_flow(id);
            if let Ok(node) = self.inner.topology.get_node(&animation.target) {
                let at = self.layout().center(node);
                surface.pulse(node, at, &animation.color, self.inner.timing.pulse_duration());

                let from_external = self
                    .inner
                    .topology
                    .get_node(&animation.source)
                    .map(|source| source.is_external_service())
                    .unwrap_or(false);
                if node.is_external_service() && !from_external {
                    self.schedule_echo(&animation);
                }
            }
        }
        drop(active);

        let _ = done.send(());
    }

    fn schedule_echo(&self, animation: &FlowAnimation) {
        let scheduler = self.clone();
        let source = animation.target.clone();
        let target = animation.source.clone();
        let color = animation.color.clone();
        let duration = animation.duration;
        let delay = self.inner.timing.external_echo_delay();

        let task = tokio::spawn(async move {
            sleep(delay).await;
            scheduler.animate_hop(&source, &target, &color, duration);
        });

        let mut pending = self.inner.pending_echoes.lock();
        pending.retain(|handle| !handle.is_finished());
        pending.push(task);
    }

    /// 取消所有进行中的动画，不产生完成脉冲
    pub fn cancel_all(&self) -> usize {
        for echo in self.inner.pending_echoes.lock().drain(..) {
            echo.abort();
        }
        for relay in self.inner.relays.lock().drain(..) {
            relay.abort();
        }

        let mut drained: Vec<ActiveFlow> = self
            .inner
            .active
            .lock()
            .drain()
            .map(|(_, flow)| flow)
            .collect();
        drained.sort_by_key(|flow| flow.animation.id);

        let surface = self.surface();
        for flow in &drained {
            flow.task.abort();
            if let Some(surface) = &surface {
                surface.remove_flow(flow.animation.id);
            }
        }

        if !drained.is_empty() {
            info!(cancelled = drained.len(), "in-flight flows cancelled");
        }
        drained.len()
    }

    pub fn highlight(&self, node_id: &str, style: HighlightStyle) -> bool {
        let Some(surface) = self.surface() else {
            return false;
        };
        match self.inner.topology.get_node(node_id) {
            Ok(node) => {
                surface.highlight(node, style);
                true
            }
            Err(_) => false,
        }
    }

    /// 按顺序执行路径上的每一跳，上一跳结束后才开始下一跳
    pub async fn animate_path(&self, path: &[String], color: &str, per_hop: Duration) -> PathOutcome {
        let mut hops = 0;
        for pair in path.windows(2) {
            let Some(handle) = self.animate_hop(&pair[0], &pair[1], color, per_hop) else {
                return PathOutcome::Interrupted { hops };
            };
            match handle.finished().await {
                HopOutcome::Completed => hops += 1,
                HopOutcome::Cancelled => return PathOutcome::Cancelled { hops },
            }
        }
        PathOutcome::Completed { hops }
    }

    /// 同步启动第一跳，其余跳在后台任务中接续
    pub fn dispatch_path(&self, path: Vec<String>, color: &str, per_hop: Duration) -> Option<FlowId> {
        if path.len() < 2 {
            return None;
        }
        let first = self.animate_hop(&path[0], &path[1], color, per_hop)?;
        let id = first.id();

        if path.len() > 2 {
            let scheduler = self.clone();
            let color = color.to_string();
            let relay = tokio::spawn(async move {
                if first.finished().await == HopOutcome::Completed {
                    scheduler.animate_path(&path[1..], &color, per_hop).await;
                }
            });
            let mut relays = self.inner.relays.lock();
            relays.retain(|handle| !handle.is_finished());
            relays.push(relay);
        }

        Some(id)
    }

    /// 受守卫保护的多步序列
    ///
    /// 守卫被占用时直接丢弃本次请求；被接受的请求结束时先释放守卫，
    /// 再调用一次 `on_complete`
    pub async fn animate_guarded_sequence<F>(
        &self,
        guard: &CycleGuard,
        steps: &[SequenceStep],
        on_complete: F,
    ) -> SequenceOutcome
    where
        F: FnOnce(&SequenceReport) + Send,
    {
        if !self.is_ready() {
            debug!("render surface not ready, guarded sequence skipped");
            return SequenceOutcome::Unavailable;
        }
        let Some(permit) = guard.try_acquire() else {
            info!("guarded sequence already running, request dropped");
            return SequenceOutcome::Rejected;
        };

        let mut report = SequenceReport::default();
        match self.inner.timing.sequence_timeout() {
            Some(limit) => {
                if timeout(limit, self.run_steps(steps, &mut report)).await.is_err() {
                    warn!(timeout_ms = limit.as_millis() as u64, "guarded sequence timed out");
                    report.timed_out = true;
                }
            }
            None => self.run_steps(steps, &mut report).await,
        }

        drop(permit);
        on_complete(&report);
        SequenceOutcome::Finished(report)
    }

    async fn run_steps(&self, steps: &[SequenceStep], report: &mut SequenceReport) {
        let timing = self.inner.timing;

        for step in steps {
            let Some(path) = self.route_step(step) else {
                report.skipped += 1;
                sleep(timing.skipped_step_delay()).await;
                continue;
            };

            self.highlight(&path[0], HighlightStyle::Step);
            sleep(timing.step_lead()).await;
            if let Some(last) = path.last() {
                self.highlight(last, HighlightStyle::Step);
            }

            if step.kind == InteractionKind::Message {
                self.record_step(step);
            }

            match self
                .animate_path(&path, step.kind.color(), timing.hop_duration())
                .await
            {
                PathOutcome::Completed { .. } => report.executed += 1,
                PathOutcome::Interrupted { hops } => {
                    warn!(from = %step.from, to = %step.to, hops, "sequence step interrupted");
                    report.skipped += 1;
                }
                PathOutcome::Cancelled { .. } => {
                    info!(from = %step.from, to = %step.to, "sequence cancelled by view reset");
                    report.cancelled = true;
                    return;
                }
            }

            sleep(step.delay_or(timing.default_step_delay())).await;
        }
    }

    fn route_step(&self, step: &SequenceStep) -> Option<Vec<String>> {
        let source = self.inner.resolver.resolve(&step.from);
        let target = self.inner.resolver.resolve(&step.to);
        let (Some(source), Some(target)) = (source, target) else {
            warn!(from = %step.from, to = %step.to, "sequence step has unresolvable node, skipped");
            return None;
        };

        let path = self.inner.router.find_path(&source, &target);
        if path.is_none() {
            warn!(%source, %target, "no animatable path for sequence step, skipped");
        }
        path
    }

    fn record_step(&self, step: &SequenceStep) {
        if let Some(history) = &self.inner.history {
            history.record(
                Interaction::new(step.from.clone(), step.to.clone(), step.kind)
                    .with_text(step.message.clone()),
            );
        }
        debug!(from = %step.from, to = %step.to, message = %step.message, "sequence step");
    }
}
