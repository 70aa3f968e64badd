use std::fmt;

/// The bearer secret used to authenticate completion requests.
///
/// The value is opaque: any string, including the empty string, is a
/// credential. `Debug` never prints the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the raw secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if no secret has been saved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a display form that shows at most the last four characters.
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count == 0 {
            return "(none)".to_string();
        }
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = self.0.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for Credential {
    fn from(secret: &str) -> Self {
        Self(secret.to_string())
    }
}
