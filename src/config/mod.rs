pub mod env;
pub mod settings;
pub mod topology;

pub use env::EnvConfig;
pub use settings::{AnimationTiming, RemoteConfig, SimulationConfig, VizConfig};
pub use topology::TopologyConfig;
