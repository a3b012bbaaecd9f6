use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("transport error: {0}")] Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")] Decode(#[from] serde_json::Error),
    #[error("rejected by service: {}", .0.as_deref().unwrap_or("no reason given"))] Rejected(Option<String>),
}

impl ServiceError {
    /// Text to show the user, falling back to `fallback` when the service
    /// refused without a reason.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ServiceError::Transport(_) | ServiceError::Decode(_) => "Error connecting to the server".to_string(),
            ServiceError::Rejected(Some(reason)) if !reason.trim().is_empty() => reason.clone(),
            ServiceError::Rejected(_) => fallback.to_string(),
        }
    }

    /// Like `user_message`, but a refusal always reads as `fixed`; the
    /// listing endpoints' own reasons are only logged.
    pub fn fixed_message(&self, fixed: &str) -> String {
        match self {
            ServiceError::Rejected(_) => fixed.to_string(),
            other => other.user_message(fixed),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard tool found on PATH")] Unavailable,
    #[error("clipboard tool {tool} failed: {reason}")] Failed { tool: String, reason: String },
    #[error("clipboard io error: {0}")] Io(#[from] std::io::Error),
    #[error("clipboard task failed: {0}")] Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_uses_service_reason() {
        let err = ServiceError::Rejected(Some("quota exceeded".into()));
        assert_eq!(err.user_message("Failed to generate response"), "quota exceeded");
    }

    #[test]
    fn rejected_without_reason_uses_fallback() {
        assert_eq!(ServiceError::Rejected(None).user_message("Failed to send email"), "Failed to send email");
        assert_eq!(ServiceError::Rejected(Some("  ".into())).user_message("Failed to send email"), "Failed to send email");
    }

    #[test]
    fn fixed_message_ignores_service_reason() {
        let err = ServiceError::Rejected(Some("sheet locked".into()));
        assert_eq!(err.fixed_message("Failed to fetch categories"), "Failed to fetch categories");
        let err: ServiceError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.fixed_message("Failed to fetch prompts"), "Error connecting to the server");
    }

    #[test]
    fn decode_failure_reads_as_connection_error() {
        let err: ServiceError = serde_json::from_str::<serde_json::Value>("not json").unwrap_err().into();
        assert_eq!(err.user_message("ignored"), "Error connecting to the server");
    }
}
