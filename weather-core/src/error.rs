use thiserror::Error;

/// Why a single weather lookup failed.
///
/// Kept `Clone` so the latest failure can sit inside [`SearchState`](crate::SearchState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Blank city name; no request was sent.
    #[error("Enter City Name")]
    EmptyInput,

    /// Provider answered with a non-2xx status.
    #[error("{}", rejection_text(.status, .message))]
    ProviderRejected { status: u16, message: Option<String> },

    /// Network, timeout or body decoding failure. The payload is for logs only.
    #[error("Error fetching weather data")]
    TransportFailure(String),
}

impl QueryError {
    /// Short classification used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::EmptyInput => "empty_input",
            QueryError::ProviderRejected { .. } => "provider_rejected",
            QueryError::TransportFailure(_) => "transport_failure",
        }
    }

    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        QueryError::TransportFailure(err.to_string())
    }
}

fn rejection_text(status: &u16, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(msg) if !msg.trim().is_empty() => msg.to_string(),
        _ => format!("Weather provider rejected the request (HTTP {status})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_prompts_for_city() {
        assert_eq!(QueryError::EmptyInput.to_string(), "Enter City Name");
    }

    #[test]
    fn provider_message_is_passed_through() {
        let err = QueryError::ProviderRejected {
            status: 404,
            message: Some("city not found".into()),
        };
        assert_eq!(err.to_string(), "city not found");
    }

    #[test]
    fn provider_rejection_without_message_mentions_status() {
        let err = QueryError::ProviderRejected { status: 401, message: None };
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[test]
    fn transport_failure_hides_detail() {
        let err = QueryError::transport("connection refused");
        assert_eq!(err.to_string(), "Error fetching weather data");
        assert_eq!(err.kind(), "transport_failure");
    }
}
