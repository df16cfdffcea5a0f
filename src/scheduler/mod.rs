// 动画调度模块

mod animation;
mod guard;
mod scheduler;
mod sequence;
mod surface;

pub use animation::{FlowAnimation, FlowHandle, FlowId, HopOutcome, PathOutcome};
pub use guard::{CycleGuard, CyclePermit};
pub use scheduler::AnimationScheduler;
pub use sequence::{SequenceOutcome, SequenceReport, SequenceStep};
pub use surface::{HighlightStyle, RecordingSurface, RenderSurface, SurfaceEvent, TracingSurface};
