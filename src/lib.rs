pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod message;
pub mod routing;
pub mod runtime;
pub mod scheduler;
pub mod topology;
pub mod utils;

pub use config::{AnimationTiming, EnvConfig, RemoteConfig, SimulationConfig, TopologyConfig, VizConfig};
pub use error::{Result, VizError};
#[cfg(feature = "http-sink")]
pub use history::HttpSink;
pub use history::{HistorySink, HistorySnapshot, InteractionLog, MemorySink};
pub use message::{
    Interaction, InteractionContent, InteractionKind, PersistedInteraction,
};
pub use routing::{agent_type, NameResolver, PathRouter, ResolutionRule};
pub use runtime::{
    alarm_cycle_steps, extract_key_patterns, AlarmPhase, DriverState, LocalEchoProcessor,
    RandomTick, RequestProcessor, Session, SimulationDriver, SubmissionReply, SubmissionRequest,
    SubmissionResponse, Visualization, VisualizationEngine,
};
pub use scheduler::{
    AnimationScheduler, CycleGuard, FlowAnimation, FlowHandle, FlowId, HighlightStyle,
    HopOutcome, PathOutcome, RecordingSurface, RenderSurface, SequenceOutcome, SequenceReport,
    SequenceStep, SurfaceEvent, TracingSurface,
};
pub use topology::{Edge, Layout, Node, NodeCategory, Position, Size, TopologyStore};
pub use utils::{logging, validation};
