// 运行时模块：引擎、周期模拟与会话

mod alarm;
mod driver;
mod engine;
mod session;

pub use alarm::{alarm_cycle_steps, AlarmPhase};
pub use driver::{DriverState, SimulationDriver};
pub use engine::{RandomTick, Visualization, VisualizationEngine};
pub use session::{
    extract_key_patterns, DynRequestProcessor, LocalEchoProcessor, RequestProcessor, Session,
    SubmissionReply, SubmissionRequest, SubmissionResponse,
};
