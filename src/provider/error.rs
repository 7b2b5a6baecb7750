use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned error status: {status}")]
    Status { status: StatusCode },
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("payload has no state vectors")]
    MissingStates,
    #[error("no usable flights in payload ({rejected} records rejected)")]
    Empty { rejected: usize },
    #[error("live provider disabled")]
    Disabled,
}

/// Coarse failure category carried into the fallback snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Schema,
    Empty,
    Disabled,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Request(_) | FetchError::Status { .. } => FailureKind::Transport,
            FetchError::Decode(_) | FetchError::MissingStates => FailureKind::Schema,
            FetchError::Empty { .. } => FailureKind::Empty,
            FetchError::Disabled => FailureKind::Disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let status = FetchError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
        };
        assert_eq!(status.kind(), FailureKind::Transport);
        assert_eq!(FetchError::MissingStates.kind(), FailureKind::Schema);
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(FetchError::from(decode).kind(), FailureKind::Schema);
        assert_eq!(FetchError::Empty { rejected: 3 }.kind(), FailureKind::Empty);
        assert_eq!(FailureKind::Transport.to_string(), "transport");
    }
}
