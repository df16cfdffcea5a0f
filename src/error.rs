use thiserror::Error;

pub type Result<T> = std::result::Result<T, VizError>;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("node `{0}` not found in topology")]
    NodeNotFound(String),
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("edge `{from}` -> `{to}` references an unknown node")]
    DanglingEdge { from: String, to: String },
    #[error("resolution rule `{pattern}` targets unknown node `{node}`")]
    UnknownRuleTarget { pattern: String, node: String },
    #[error("malformed interaction payload: {0}")]
    MalformedPayload(String),
    #[error("history persistence failed: {0}")]
    Persistence(String),
    #[error("request processing failed: {0}")]
    Request(String),
    #[error("request content is empty")]
    EmptyRequest,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::Serialization(err.to_string())
    }
}
