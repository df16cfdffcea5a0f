// 交互历史模块

mod log;
mod sink;
mod snapshot;

pub use log::InteractionLog;
#[cfg(feature = "http-sink")]
pub use sink::http::HttpSink;
pub use sink::{HistorySink, MemorySink};
pub use snapshot::{sort_by_timestamp, HistorySnapshot};
