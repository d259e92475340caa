use rmcp::model::ErrorData;

/// Failure of a single `tools/call` invocation.
///
/// The display text is what the caller sees as the JSON-RPC error message,
/// so remote failures are rendered verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0}")]
    GitHub(#[from] octocrab::Error),

    #[error("{0} required")]
    MissingParam(&'static str),

    #[error("{0}")]
    InvalidParam(String),

    #[error("tool name required")]
    ToolNameRequired,

    #[error("tool not found")]
    UnknownTool,

    #[error("{0}")]
    Content(String),

    #[error("{0}")]
    Remote(String),
}

impl ToolError {
    pub fn to_rpc_error(&self) -> ErrorData {
        ErrorData::internal_error(self.to_string(), None)
    }
}
