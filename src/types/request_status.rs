use std::fmt;

/// User-facing feedback about the most recent submission.
///
/// The status is display-only; nothing durable depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Nothing pending. Displays as the empty string.
    #[default]
    Idle,
    /// A completion request is outstanding.
    Sent,
    /// The last submission could not complete.
    Failed(String),
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Idle => Ok(()),
            RequestStatus::Sent => write!(f, "Request sent"),
            RequestStatus::Failed(reason) => write!(f, "Request failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(RequestStatus::Idle.to_string(), "");
        assert_eq!(RequestStatus::Sent.to_string(), "Request sent");
        assert_eq!(
            RequestStatus::Failed("Connection error: refused".to_string()).to_string(),
            "Request failed: Connection error: refused"
        );
    }
}
