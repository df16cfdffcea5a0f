use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::scheduler::{CycleGuard, SequenceOutcome};

use super::alarm::alarm_cycle_steps;
use super::engine::VisualizationEngine;

/// 模拟驱动的状态，进入 `Active` 后不再回到 `Idle`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Active,
}

/// 周期模拟驱动
///
/// 激活后启动两个后台任务：随机数据流与告警周期。
/// 只有 `shutdown` 会停止它们
pub struct SimulationDriver {
    engine: Arc<VisualizationEngine>,
    simulation: SimulationConfig,
    guard: CycleGuard,
    state: Mutex<DriverState>,
    shutdown_token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    completed_cycles: Arc<AtomicUsize>,
}

impl SimulationDriver {
    pub fn new(engine: Arc<VisualizationEngine>) -> Self {
        let simulation = engine.config().simulation;
        Self {
            engine,
            simulation,
            guard: CycleGuard::new(),
            state: Mutex::new(DriverState::Idle),
            shutdown_token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
            completed_cycles: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        let checked = simulation.with_fallbacks();
        if checked != simulation {
            warn!(
                random_flow_interval_ms = simulation.random_flow_interval_ms,
                alarm_interval_ms = simulation.alarm_interval_ms,
                "zero simulation period replaced with default"
            );
        }
        self.simulation = checked;
        self
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    pub fn state(&self) -> DriverState {
        *self.state.lock()
    }

    pub fn is_active(&self) -> bool {
        self.state() == DriverState::Active
    }

    pub fn guard(&self) -> &CycleGuard {
        &self.guard
    }

    pub fn completed_cycles(&self) -> usize {
        self.completed_cycles.load(Ordering::Acquire)
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// 首次调用时进入 `Active` 并启动后台任务；之后的调用返回 `false`
    pub fn activate(&self) -> bool {
        let mut state = self.state.lock();
        if *state == DriverState::Active {
            return false;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, simulation driver stays idle");
            return false;
        };
        *state = DriverState::Active;
        drop(state);

        info!(
            random_flow_interval_ms = self.simulation.random_flow_interval_ms,
            alarm_interval_ms = self.simulation.alarm_interval_ms,
            alarm_initial_delay_ms = self.simulation.alarm_initial_delay_ms,
            "simulation driver activated"
        );

        let random_flows = runtime.spawn(random_flow_loop(
            Arc::clone(&self.engine),
            self.simulation,
            self.shutdown_token.clone(),
        ));
        let alarms = runtime.spawn(alarm_loop(
            Arc::clone(&self.engine),
            self.guard.clone(),
            self.simulation,
            self.shutdown_token.clone(),
            Arc::clone(&self.completed_cycles),
        ));

        self.tasks.lock().extend([random_flows, alarms]);
        true
    }

    /// 立即执行一次告警周期
    pub async fn run_alarm_cycle(&self) -> SequenceOutcome {
        run_cycle(&self.engine, &self.guard, &self.completed_cycles).await
    }

    /// 停止所有后台任务，状态保持 `Active`
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        info!("simulation driver stopped");
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

/// 基准间隔加减抖动
fn jittered(base_ms: u64, jitter_ms: u64) -> Duration {
    if jitter_ms == 0 {
        return Duration::from_millis(base_ms);
    }
    let offset = rand::rng().random_range(0..=jitter_ms.saturating_mul(2));
    Duration::from_millis((base_ms + offset).saturating_sub(jitter_ms).max(1))
}

async fn random_flow_loop(
    engine: Arc<VisualizationEngine>,
    simulation: SimulationConfig,
    shutdown: CancellationToken,
) {
    loop {
        let wait = jittered(
            simulation.random_flow_interval_ms,
            simulation.random_flow_jitter_ms,
        );
        tokio::select! {
            _ = sleep(wait) => {
                let tick = engine.simulate_random_flow(&mut rand::rng());
                debug!(?tick, "random flow tick");
            }
            _ = shutdown.cancelled() => {
                debug!("random flow loop stopped");
                break;
            }
        }
    }
}

async fn alarm_loop(
    engine: Arc<VisualizationEngine>,
    guard: CycleGuard,
    simulation: SimulationConfig,
    shutdown: CancellationToken,
    completed: Arc<AtomicUsize>,
) {
    tokio::select! {
        _ = sleep(simulation.alarm_initial_delay()) => {}
        _ = shutdown.cancelled() => return,
    }

    let mut tick = interval(simulation.alarm_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                // 每个周期单独成任务，上一周期未结束时由守卫拒绝
                let engine = Arc::clone(&engine);
                let guard = guard.clone();
                let completed = Arc::clone(&completed);
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = run_cycle(&engine, &guard, &completed) => {}
                        _ = shutdown.cancelled() => {}
                    }
                });
            }
            _ = shutdown.cancelled() => {
                debug!("alarm loop stopped");
                break;
            }
        }
    }
}

async fn run_cycle(
    engine: &VisualizationEngine,
    guard: &CycleGuard,
    completed: &AtomicUsize,
) -> SequenceOutcome {
    info!("alarm agent requesting data update");
    let steps = alarm_cycle_steps();
    let outcome = engine
        .scheduler()
        .animate_guarded_sequence(guard, &steps, |report| {
            completed.fetch_add(1, Ordering::AcqRel);
            info!(
                executed = report.executed,
                skipped = report.skipped,
                cancelled = report.cancelled,
                timed_out = report.timed_out,
                "alarm cycle completed"
            );
        })
        .await;

    if outcome == SequenceOutcome::Rejected {
        debug!("previous alarm cycle still running");
    }
    outcome
}
