//! The interaction controller.
//!
//! [`Controller`] owns the transient front-end state (draft, message log,
//! request status, generation parameters, settings visibility) and sequences
//! one submission: log the message, mark the request sent, play the cue,
//! await the completion, export the reply, then clear the status and draft.
//!
//! A submission is split in two so that concurrent submissions can be
//! issued while earlier ones are still outstanding:
//! [`Controller::begin_submit`] runs the synchronous steps and snapshots the
//! credential and parameters; [`Submission::finish`] awaits the completion
//! and exports. Nothing serializes submissions against each other.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::Completion;
use crate::credential_store::CredentialStore;
use crate::cue::Cue;
use crate::error::{Error, Result};
use crate::export::Exporter;
use crate::observability::CHAT_SUBMISSIONS;
use crate::types::{Credential, GenerationParameters, Message, Reply, RequestStatus};

#[derive(Debug, Default)]
struct State {
    draft: String,
    messages: Vec<Message>,
    status: RequestStatus,
    params: GenerationParameters,
    settings_visible: bool,
    filename: Option<String>,
    in_flight: usize,
}

struct Inner {
    client: Arc<dyn Completion>,
    exporter: Arc<dyn Exporter>,
    cue: Arc<dyn Cue>,
    store: CredentialStore,
    state: Mutex<State>,
}

/// Cloneable handle to the front end's shared state and components.
///
/// # Example
///
/// ```
/// # use std::sync::Arc;
/// # use amadeus::chat::Controller;
/// # use amadeus::{Completion, Credential, CredentialStore, GenerationParameters};
/// # use amadeus::{PdfExporter, Reply, Result, SilentCue};
/// struct Shout;
///
/// #[async_trait::async_trait]
/// impl Completion for Shout {
///     async fn complete(
///         &self,
///         message: &str,
///         _: &Credential,
///         _: &GenerationParameters,
///     ) -> Result<Reply> {
///         Ok(Reply::Text(message.to_uppercase()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let store = CredentialStore::open(dir.path().join("storage.json")).unwrap();
/// let controller = Controller::new(
///     Arc::new(Shout),
///     Arc::new(PdfExporter::new(dir.path())),
///     Arc::new(SilentCue),
///     store,
/// );
/// let outcome = controller.send("hello").await.unwrap();
/// assert_eq!(outcome.text(), "HELLO");
/// assert!(outcome.path.ends_with("response.pdf"));
/// # });
/// ```
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

/// A submission whose synchronous steps have run.
///
/// The credential and parameters were captured when the submission began;
/// edits made afterwards do not affect it.
pub struct Submission {
    controller: Controller,
    message: String,
    credential: Credential,
    params: GenerationParameters,
    filename: Option<String>,
}

/// What a completed submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// The reply, possibly malformed.
    pub reply: Reply,
    /// Where the exported document was written.
    pub path: PathBuf,
}

impl SubmissionOutcome {
    /// The text that was exported.
    pub fn text(&self) -> &str {
        self.reply.as_text()
    }
}

impl Controller {
    /// Creates a controller with default parameters and hidden settings.
    ///
    /// The credential comes from `store`, which loaded it when opened.
    pub fn new(
        client: Arc<dyn Completion>,
        exporter: Arc<dyn Exporter>,
        cue: Arc<dyn Cue>,
        store: CredentialStore,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                exporter,
                cue,
                store,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Sets the initial generation parameters.
    pub fn with_parameters(self, params: GenerationParameters) -> Self {
        self.state().params = params;
        self
    }

    /// Sets the export file name used by later submissions.
    pub fn with_filename(self, filename: Option<String>) -> Self {
        self.state().filename = filename;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.inner.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the credential used by the next submission.
    pub fn credential(&self) -> Credential {
        self.inner.store.current()
    }

    /// Persists `value` and uses it for subsequent submissions.
    pub fn save_credential(&self, value: impl Into<Credential>) -> Result<()> {
        self.inner.store.save(value.into())
    }

    /// Returns the current draft message.
    pub fn draft(&self) -> String {
        self.state().draft.clone()
    }

    /// Replaces the draft message.
    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().draft = text.into();
    }

    /// Returns a snapshot of the message log, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    /// Returns the request status.
    pub fn status(&self) -> RequestStatus {
        self.state().status.clone()
    }

    /// Returns the number of submissions awaiting their completion.
    pub fn in_flight(&self) -> usize {
        self.state().in_flight
    }

    /// Returns the parameters the next submission will use.
    pub fn parameters(&self) -> GenerationParameters {
        self.state().params
    }

    /// Sets the temperature for subsequent submissions.
    pub fn set_temperature(&self, temperature: f32) -> Result<()> {
        self.state().params.set_temperature(temperature)
    }

    /// Sets the token limit for subsequent submissions.
    pub fn set_max_tokens(&self, max_tokens: u32) -> Result<()> {
        self.state().params.set_max_tokens(max_tokens)
    }

    /// Returns whether the settings panel is shown.
    pub fn settings_visible(&self) -> bool {
        self.state().settings_visible
    }

    /// Shows or hides the settings panel.
    pub fn set_settings_visible(&self, visible: bool) {
        self.state().settings_visible = visible;
    }

    /// Flips settings visibility and returns the new value.
    pub fn toggle_settings(&self) -> bool {
        let mut state = self.state();
        state.settings_visible = !state.settings_visible;
        state.settings_visible
    }

    /// Returns the export file name, if one was set.
    pub fn filename(&self) -> Option<String> {
        self.state().filename.clone()
    }

    /// Runs the synchronous half of a submission on the current draft.
    ///
    /// The draft is read as-is (an empty message is valid), appended to the
    /// log, the status becomes [`RequestStatus::Sent`], and the cue starts.
    pub fn begin_submit(&self) -> Submission {
        let (message, params, filename) = {
            let mut state = self.state();
            let message = state.draft.clone();
            state.messages.push(Message::outgoing(message.clone()));
            state.status = RequestStatus::Sent;
            state.in_flight += 1;
            (message, state.params, state.filename.clone())
        };
        CHAT_SUBMISSIONS.click();
        self.inner.cue.play();

        Submission {
            controller: self.clone(),
            message,
            credential: self.inner.store.current(),
            params,
            filename,
        }
    }

    /// Submits the current draft and waits for the export.
    pub async fn submit(&self) -> Result<SubmissionOutcome> {
        self.begin_submit().finish().await
    }

    /// Replaces the draft with `text` and submits it.
    pub async fn send(&self, text: impl Into<String>) -> Result<SubmissionOutcome> {
        self.set_draft(text);
        self.submit().await
    }

    fn settle(&self, status: RequestStatus, clear_draft: bool) {
        let mut state = self.state();
        state.status = status;
        state.in_flight = state.in_flight.saturating_sub(1);
        if clear_draft {
            state.draft.clear();
        }
    }

    fn fail(&self, err: Error) -> Error {
        self.settle(RequestStatus::Failed(err.to_string()), false);
        err
    }
}

impl Submission {
    /// The parameters captured when the submission began.
    pub fn parameters(&self) -> GenerationParameters {
        self.params
    }

    /// Awaits the completion, exports the reply and returns to idle.
    ///
    /// A malformed response still exports the placeholder text. A transport
    /// or export failure leaves [`RequestStatus::Failed`] displayed, keeps
    /// the draft, and returns the error.
    pub async fn finish(self) -> Result<SubmissionOutcome> {
        let Submission {
            controller,
            message,
            credential,
            params,
            filename,
        } = self;
        let inner = &controller.inner;

        let reply = match inner.client.complete(&message, &credential, &params).await {
            Ok(reply) => reply,
            Err(err) => return Err(controller.fail(err)),
        };

        let path = match inner
            .exporter
            .export_as_document(reply.as_text(), filename.as_deref())
        {
            Ok(path) => path,
            Err(err) => return Err(controller.fail(err)),
        };

        controller.settle(RequestStatus::Idle, true);
        Ok(SubmissionOutcome { reply, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::types::MALFORMED_REPLY;

    #[derive(Default)]
    struct ScriptedCompletion {
        replies: Mutex<VecDeque<Result<Reply>>>,
        calls: Mutex<Vec<(String, Credential, GenerationParameters)>>,
    }

    impl ScriptedCompletion {
        fn with(replies: Vec<Result<Reply>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Credential, GenerationParameters)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Completion for ScriptedCompletion {
        async fn complete(
            &self,
            message: &str,
            credential: &Credential,
            params: &GenerationParameters,
        ) -> Result<Reply> {
            self.calls
                .lock()
                .unwrap()
                .push((message.to_string(), credential.clone(), *params));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Reply::Text(format!("echo: {message}"))))
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        exports: Mutex<Vec<(String, Option<String>)>>,
    }

    impl Exporter for RecordingExporter {
        fn export_as_document(&self, text: &str, filename: Option<&str>) -> Result<PathBuf> {
            self.exports
                .lock()
                .unwrap()
                .push((text.to_string(), filename.map(str::to_string)));
            Ok(PathBuf::from(filename.unwrap_or(crate::export::DEFAULT_FILENAME)))
        }
    }

    #[derive(Default)]
    struct CountingCue {
        plays: AtomicUsize,
    }

    impl Cue for CountingCue {
        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        controller: Controller,
        client: Arc<ScriptedCompletion>,
        exporter: Arc<RecordingExporter>,
        cue: Arc<CountingCue>,
        _dir: tempfile::TempDir,
    }

    fn fixture(replies: Vec<Result<Reply>>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("storage.json")).unwrap();
        let client = ScriptedCompletion::with(replies);
        let exporter = Arc::new(RecordingExporter::default());
        let cue = Arc::new(CountingCue::default());
        let controller = Controller::new(client.clone(), exporter.clone(), cue.clone(), store);
        Fixture {
            controller,
            client,
            exporter,
            cue,
            _dir: dir,
        }
    }

    #[test]
    fn initial_state() {
        let f = fixture(vec![]);
        assert_eq!(f.controller.status(), RequestStatus::Idle);
        assert_eq!(f.controller.parameters(), GenerationParameters::default());
        assert!(f.controller.messages().is_empty());
        assert!(f.controller.credential().is_empty());
        assert!(!f.controller.settings_visible());
        assert_eq!(f.controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn begin_logs_message_and_plays_cue_before_completion() {
        let f = fixture(vec![]);
        f.controller.set_draft("hello");
        let submission = f.controller.begin_submit();

        let messages = f.controller.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(f.cue.plays.load(Ordering::SeqCst), 1);
        assert_eq!(f.controller.status(), RequestStatus::Sent);
        assert_eq!(f.controller.status().to_string(), "Request sent");
        assert!(f.client.calls().is_empty());

        submission.finish().await.unwrap();
        assert_eq!(f.controller.messages().len(), 1);
        assert_eq!(f.cue.plays.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_submission_exports_and_resets() {
        let f = fixture(vec![Ok(Reply::Text("Why did...".to_string()))]);
        f.controller.save_credential("sk-test").unwrap();

        let outcome = f.controller.send("hello").await.unwrap();
        assert_eq!(outcome.text(), "Why did...");
        assert_eq!(outcome.path, PathBuf::from("response.pdf"));

        assert_eq!(
            *f.exporter.exports.lock().unwrap(),
            vec![("Why did...".to_string(), None)]
        );
        let calls = f.client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "hello");
        assert_eq!(calls[0].1.expose(), "sk-test");
        assert_eq!(f.controller.status(), RequestStatus::Idle);
        assert_eq!(f.controller.status().to_string(), "");
        assert_eq!(f.controller.draft(), "");
        assert_eq!(f.controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn malformed_reply_exports_placeholder() {
        let f = fixture(vec![Ok(Reply::Malformed {
            status: 401,
            raw: r#"{"error":{}}"#.to_string(),
        })]);
        let outcome = f.controller.send("hello").await.unwrap();
        assert!(outcome.reply.is_malformed());
        assert_eq!(
            f.exporter.exports.lock().unwrap()[0].0,
            MALFORMED_REPLY.to_string()
        );
        assert_eq!(f.controller.status(), RequestStatus::Idle);
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let f = fixture(vec![Err(Error::connection("connection refused", None))]);
        let err = f.controller.send("hello").await.unwrap_err();
        assert!(err.is_connection());

        assert!(f.exporter.exports.lock().unwrap().is_empty());
        assert!(matches!(f.controller.status(), RequestStatus::Failed(_)));
        assert!(f.controller.status().to_string().starts_with("Request failed: "));
        assert_eq!(f.controller.draft(), "hello");
        assert_eq!(f.controller.messages().len(), 1);
        assert_eq!(f.controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn empty_message_is_submitted() {
        let f = fixture(vec![]);
        f.controller.submit().await.unwrap();
        assert_eq!(f.client.calls()[0].0, "");
        assert_eq!(f.controller.messages()[0].text, "");
    }

    #[tokio::test]
    async fn parameters_are_captured_at_issue_time() {
        let f = fixture(vec![
            Ok(Reply::Text("a".to_string())),
            Ok(Reply::Text("b".to_string())),
        ]);

        f.controller.set_draft("first");
        let a = f.controller.begin_submit();
        f.controller.set_temperature(0.2).unwrap();
        f.controller.set_max_tokens(10).unwrap();
        f.controller.set_draft("second");
        let b = f.controller.begin_submit();

        assert_eq!(a.parameters().temperature(), 0.7);
        assert_eq!(b.parameters().temperature(), 0.2);
        assert_eq!(f.controller.in_flight(), 2);

        // Resolve the later submission first.
        b.finish().await.unwrap();
        a.finish().await.unwrap();

        let calls = f.client.calls();
        assert_eq!(calls[0].0, "second");
        assert_eq!(calls[0].2, GenerationParameters::new(0.2, 10).unwrap());
        assert_eq!(calls[1].0, "first");
        assert_eq!(calls[1].2, GenerationParameters::default());
        assert_eq!(f.controller.messages().len(), 2);
        assert_eq!(f.cue.plays.load(Ordering::SeqCst), 2);
        assert_eq!(f.controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn concurrent_submissions_both_complete() {
        let f = fixture(vec![]);
        f.controller.set_draft("one");
        let a = f.controller.begin_submit();
        f.controller.set_draft("two");
        let b = f.controller.begin_submit();

        let (ra, rb) = futures::join!(a.finish(), b.finish());
        assert_eq!(ra.unwrap().text(), "echo: one");
        assert_eq!(rb.unwrap().text(), "echo: two");
        assert_eq!(f.exporter.exports.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn saved_credential_applies_to_next_submission() {
        let f = fixture(vec![]);
        f.controller.send("before").await.unwrap();
        f.controller.save_credential("sk-new").unwrap();
        f.controller.send("after").await.unwrap();

        let calls = f.client.calls();
        assert!(calls[0].1.is_empty());
        assert_eq!(calls[1].1.expose(), "sk-new");
    }

    #[tokio::test]
    async fn export_filename_is_forwarded() {
        let f = fixture(vec![]);
        let controller = f.controller.clone().with_filename(Some("joke.pdf".to_string()));
        let outcome = controller.send("hi").await.unwrap();
        assert_eq!(outcome.path, PathBuf::from("joke.pdf"));
        assert_eq!(
            f.exporter.exports.lock().unwrap()[0].1.as_deref(),
            Some("joke.pdf")
        );
    }

    #[test]
    fn settings_and_parameter_bounds() {
        let f = fixture(vec![]);
        assert!(f.controller.toggle_settings());
        assert!(f.controller.settings_visible());
        assert!(!f.controller.toggle_settings());
        f.controller.set_settings_visible(true);
        assert!(f.controller.settings_visible());

        assert!(f.controller.set_temperature(1.5).unwrap_err().is_validation());
        assert!(f.controller.set_max_tokens(0).is_err());
        assert_eq!(f.controller.parameters(), GenerationParameters::default());
    }
}
