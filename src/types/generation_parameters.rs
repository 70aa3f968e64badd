use serde::Serialize;

use crate::error::{Error, Result};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 50;

/// Lowest accepted temperature.
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Highest accepted temperature.
pub const MAX_TEMPERATURE: f32 = 1.0;

/// Sampling parameters attached to every completion request.
///
/// The fields are private so that a value of this type is always within
/// bounds: temperature in `[0, 1]` and `max_tokens >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParameters {
    temperature: f32,
    max_tokens: u32,
}

impl GenerationParameters {
    /// Creates parameters after checking both bounds.
    pub fn new(temperature: f32, max_tokens: u32) -> Result<Self> {
        Ok(Self {
            temperature: check_temperature(temperature)?,
            max_tokens: check_max_tokens(max_tokens)?,
        })
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the token limit.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Replaces the temperature, leaving `self` untouched on error.
    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        self.temperature = check_temperature(temperature)?;
        Ok(())
    }

    /// Replaces the token limit, leaving `self` untouched on error.
    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<()> {
        self.max_tokens = check_max_tokens(max_tokens)?;
        Ok(())
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

fn check_temperature(value: f32) -> Result<f32> {
    if value.is_finite() && (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        Ok(value)
    } else {
        Err(Error::validation(
            format!("temperature must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}, got {value}"),
            Some("temperature".to_string()),
        ))
    }
}

fn check_max_tokens(value: u32) -> Result<u32> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(Error::validation(
            "max_tokens must be at least 1",
            Some("max_tokens".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = GenerationParameters::default();
        assert_eq!(params.temperature(), 0.7);
        assert_eq!(params.max_tokens(), 50);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(GenerationParameters::new(0.0, 1).is_ok());
        assert!(GenerationParameters::new(1.0, u32::MAX).is_ok());
        assert!(GenerationParameters::new(1.1, 50).unwrap_err().is_validation());
        assert!(GenerationParameters::new(-0.1, 50).is_err());
        assert!(GenerationParameters::new(f32::NAN, 50).is_err());
        assert!(GenerationParameters::new(0.5, 0).is_err());
    }

    #[test]
    fn failed_set_keeps_previous_value() {
        let mut params = GenerationParameters::default();
        assert!(params.set_temperature(2.0).is_err());
        assert_eq!(params.temperature(), 0.7);
        assert!(params.set_max_tokens(0).is_err());
        assert_eq!(params.max_tokens(), 50);

        params.set_temperature(0.2).unwrap();
        params.set_max_tokens(256).unwrap();
        assert_eq!(params.temperature(), 0.2);
        assert_eq!(params.max_tokens(), 256);
    }
}
