/// Text exported in place of a reply when the response is malformed.
pub const MALFORMED_REPLY: &str = "Error: Unable to process the message.";

/// The outcome of a completion round trip that produced a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The first choice's text, trimmed.
    Text(String),
    /// The body had no usable choice; `raw` is the body as received.
    Malformed {
        /// HTTP status of the response.
        status: u16,
        /// Raw response body.
        raw: String,
    },
}

impl Reply {
    /// Returns true if the response had no usable choice.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Reply::Malformed { .. })
    }

    /// Borrows the exportable text.
    pub fn as_text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Malformed { .. } => MALFORMED_REPLY,
        }
    }

    /// Converts into the exportable text.
    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) => text,
            Reply::Malformed { .. } => MALFORMED_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_yields_placeholder() {
        let reply = Reply::Malformed {
            status: 401,
            raw: "{}".to_string(),
        };
        assert!(reply.is_malformed());
        assert_eq!(reply.as_text(), "Error: Unable to process the message.");
        assert_eq!(reply.into_text(), MALFORMED_REPLY);
    }

    #[test]
    fn text_passes_through() {
        let reply = Reply::Text("Why did...".to_string());
        assert!(!reply.is_malformed());
        assert_eq!(reply.into_text(), "Why did...");
    }
}
