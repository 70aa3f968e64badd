//! Logging trait for completion client operations.
//!
//! This module provides the [`ClientLogger`] trait that captures the traffic
//! passing through the [`OpenAi`](crate::OpenAi) client, most importantly the
//! raw body of any response that did not carry a usable reply.

use crate::error::Error;
use crate::types::ChatCompletionRequest;

/// A trait for logging completion client operations.
///
/// # Example
///
/// ```rust,ignore
/// use amadeus::{ChatCompletionRequest, ClientLogger, Error};
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_malformed_response(&self, status: u16, raw: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "malformed ({status}): {raw}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, _request: &ChatCompletionRequest) {}

    /// Log the text extracted from a well-formed response.
    fn log_reply(&self, _status: u16, _text: &str) {}

    /// Log a response whose body carried no usable choice.
    ///
    /// This is called once per malformed response with the HTTP status and
    /// the body exactly as received.
    fn log_malformed_response(&self, status: u16, raw: &str);

    /// Log a request that failed before any response body was read.
    fn log_transport_error(&self, _error: &Error) {}
}

/// Writes diagnostics to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl ClientLogger for StderrLogger {
    fn log_malformed_response(&self, status: u16, raw: &str) {
        eprintln!("Error in AI response (HTTP {status}): {raw}");
    }

    fn log_transport_error(&self, error: &Error) {
        eprintln!("Completion request failed: {error}");
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl ClientLogger for NullLogger {
    fn log_malformed_response(&self, _status: u16, _raw: &str) {}
}
