use thiserror::Error;

/// Main error type for plan generation and trip handling
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Backend returned no text payload")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("A plan generation is already in flight")]
    InFlight,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlanError>;

impl PlanError {
    /// Transport failure without an HTTP status (connection, TLS, body read).
    pub fn transport(message: impl Into<String>) -> Self {
        PlanError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Transport failure carrying the HTTP status the backend answered with.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        PlanError::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Check if a caller-side retry can help.
    ///
    /// Empty and malformed responses are hard failures: the prompt is the
    /// same on the next attempt, so the user is asked to retry instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlanError::Transport { status, .. } => match status {
                Some(code) => *code >= 500 || *code == 408,
                None => true,
            },
            PlanError::RateLimit { .. } => true,
            PlanError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlanError::Config(_) => "CONFIG_ERROR",
            PlanError::InvalidInput(_) => "INVALID_INPUT",
            PlanError::Transport { .. } => "TRANSPORT_ERROR",
            PlanError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            PlanError::Timeout(_) => "TIMEOUT_ERROR",
            PlanError::EmptyResponse => "EMPTY_RESPONSE",
            PlanError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            PlanError::Serialization(_) => "SERIALIZATION_ERROR",
            PlanError::InFlight => "IN_FLIGHT",
        }
    }

    /// Generic text safe to show end users; never includes backend output.
    pub fn user_message(&self) -> &'static str {
        match self {
            PlanError::Config(_) => "The planner is not configured. Please contact support.",
            PlanError::InvalidInput(_) => "Some trip details are invalid. Please check the form.",
            PlanError::InFlight => "Your itinerary is already being written. Please wait.",
            PlanError::RateLimit { .. } => {
                "The planner is busy right now. Please try again in a moment."
            }
            _ => "We could not write your itinerary this time. Please try again.",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
