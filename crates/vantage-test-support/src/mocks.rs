//! Recording fakes for every capability the executor touches.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use vantage_actions::capability::{
    DownloadCapability, HttpCapability, HttpReply, NotifyCapability, ProgressCapability,
    RouterCapability,
};
use vantage_actions::request::ActionRequest;
use vantage_api_models::ResponseType;

/// One request observed by [`ScriptedHttp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Endpoint the request targeted.
    pub endpoint: String,
    /// Query pairs as built.
    pub query: Vec<(String, String)>,
    /// Canonical form-body serialization.
    pub form: String,
    /// Declared response type of the invoked action.
    pub response_type: ResponseType,
}

/// HTTP fake replaying a scripted queue of replies while recording every
/// request it sees. An exhausted queue fails the request.
#[derive(Default)]
pub struct ScriptedHttp {
    replies: Mutex<VecDeque<anyhow::Result<HttpReply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedHttp {
    /// Fake with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply to hand out.
    ///
    /// # Panics
    ///
    /// Panics if the script mutex has been poisoned.
    pub fn push_reply(&self, reply: HttpReply) {
        self.replies
            .lock()
            .expect("script mutex poisoned")
            .push_back(Ok(reply));
    }

    /// Queue a transport failure.
    ///
    /// # Panics
    ///
    /// Panics if the script mutex has been poisoned.
    pub fn push_failure(&self, message: &str) {
        self.replies
            .lock()
            .expect("script mutex poisoned")
            .push_back(Err(anyhow!("{message}")));
    }

    /// Requests observed so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex has been poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl HttpCapability for ScriptedHttp {
    async fn post_action(
        &self,
        endpoint: &str,
        request: &ActionRequest,
        response_type: ResponseType,
    ) -> anyhow::Result<HttpReply> {
        self.requests
            .lock()
            .expect("request log mutex poisoned")
            .push(RecordedRequest {
                endpoint: endpoint.to_string(),
                query: request.query.clone(),
                form: request.to_form_string(),
                response_type,
            });

        self.replies
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left for {endpoint}")))
    }
}

/// Progress fake counting start/done signals.
#[derive(Default)]
pub struct RecordingProgress {
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl RecordingProgress {
    /// Fresh counter pair.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of start signals observed.
    #[must_use]
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of done signals observed.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl ProgressCapability for RecordingProgress {
    fn start(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn done(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Success toast.
    Success,
    /// Error toast.
    Error,
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity the notification was shown with.
    pub kind: NotificationKind,
    /// Message text.
    pub message: String,
}

/// Notifier fake recording every toast in order.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Fresh empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications observed so far.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex has been poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification log mutex poisoned")
            .clone()
    }

    /// The most recent notification, if any.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.all().into_iter().next_back()
    }
}

impl NotifyCapability for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .expect("notification log mutex poisoned")
            .push(Notification {
                kind: NotificationKind::Success,
                message: message.to_string(),
            });
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .expect("notification log mutex poisoned")
            .push(Notification {
                kind: NotificationKind::Error,
                message: message.to_string(),
            });
    }
}

/// One recorded router interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteCall {
    /// A URL opened in a new browsing context.
    Open(String),
    /// A location replacement.
    Replace(String),
    /// A client-side navigation.
    Visit(String),
}

/// Router fake recording every interaction in order.
#[derive(Default)]
pub struct RecordingRouter {
    calls: Mutex<Vec<RouteCall>>,
}

impl RecordingRouter {
    /// Fresh empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All router interactions observed so far.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex has been poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RouteCall> {
        self.calls.lock().expect("route log mutex poisoned").clone()
    }
}

impl RouterCapability for RecordingRouter {
    fn open(&self, url: &str) {
        self.calls
            .lock()
            .expect("route log mutex poisoned")
            .push(RouteCall::Open(url.to_string()));
    }

    fn replace(&self, url: &str) {
        self.calls
            .lock()
            .expect("route log mutex poisoned")
            .push(RouteCall::Replace(url.to_string()));
    }

    fn visit(&self, path: &str) {
        self.calls
            .lock()
            .expect("route log mutex poisoned")
            .push(RouteCall::Visit(path.to_string()));
    }
}

/// A file saved through the download fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Filename the payload was saved under.
    pub file_name: String,
    /// Saved payload.
    pub bytes: Vec<u8>,
}

/// A server-named download triggered through the download fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Source URL.
    pub url: String,
    /// Filename the download was saved under.
    pub file_name: String,
}

/// Download fake recording saves and fetches.
#[derive(Default)]
pub struct RecordingDownloads {
    saved: Mutex<Vec<SavedFile>>,
    fetched: Mutex<Vec<FetchedFile>>,
}

impl RecordingDownloads {
    /// Fresh empty logs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads saved so far.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex has been poisoned.
    #[must_use]
    pub fn saved(&self) -> Vec<SavedFile> {
        self.saved.lock().expect("save log mutex poisoned").clone()
    }

    /// Named downloads fetched so far.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex has been poisoned.
    #[must_use]
    pub fn fetched(&self) -> Vec<FetchedFile> {
        self.fetched
            .lock()
            .expect("fetch log mutex poisoned")
            .clone()
    }
}

impl DownloadCapability for RecordingDownloads {
    fn save(&self, bytes: &[u8], file_name: &str) -> anyhow::Result<()> {
        self.saved
            .lock()
            .expect("save log mutex poisoned")
            .push(SavedFile {
                file_name: file_name.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(())
    }

    fn fetch(&self, url: &str, file_name: &str) -> anyhow::Result<()> {
        self.fetched
            .lock()
            .expect("fetch log mutex poisoned")
            .push(FetchedFile {
                url: url.to_string(),
                file_name: file_name.to_string(),
            });
        Ok(())
    }
}
