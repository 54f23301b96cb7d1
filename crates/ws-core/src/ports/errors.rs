use thiserror::Error;

/// Failure talking to the REST collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        /// `message`/`error` field of the response body, when present.
        message: Option<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server-provided message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Failure loading an external widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetLoadError {
    #[error("failed to load script: {0}")]
    ScriptFailed(String),

    #[error("widget `{0}` not found in global scope")]
    NotFoundInGlobalScope(String),

    #[error("failed to fetch widget module: HTTP {0}")]
    HttpStatus(u16),

    #[error("failed to fetch widget module: {0}")]
    Fetch(String),

    #[error("failed to import widget module: {0}")]
    Import(String),

    #[error("widget module has no default export")]
    MissingDefaultExport,
}

impl From<ApiError> for WidgetLoadError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, .. } => WidgetLoadError::HttpStatus(status),
            other => WidgetLoadError::Fetch(other.to_string()),
        }
    }
}
