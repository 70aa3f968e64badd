use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("amadeus.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("amadeus.client.request_errors");
pub(crate) static CLIENT_MALFORMED_RESPONSES: Counter =
    Counter::new("amadeus.client.malformed_responses");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("amadeus.client.request_duration_seconds");

pub(crate) static EXPORT_DOCUMENTS: Counter = Counter::new("amadeus.export.documents");
pub(crate) static EXPORT_ERRORS: Counter = Counter::new("amadeus.export.errors");

pub(crate) static CUE_PLAYS: Counter = Counter::new("amadeus.cue.plays");
pub(crate) static CUE_ERRORS: Counter = Counter::new("amadeus.cue.errors");

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("amadeus.chat.submissions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_MALFORMED_RESPONSES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&EXPORT_DOCUMENTS);
    collector.register_counter(&EXPORT_ERRORS);

    collector.register_counter(&CUE_PLAYS);
    collector.register_counter(&CUE_ERRORS);

    collector.register_counter(&CHAT_SUBMISSIONS);
}
