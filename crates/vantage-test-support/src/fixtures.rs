//! Descriptor, snapshot, and reply builders plus an assembled context.

use std::sync::Arc;

use serde_json::Value;
use vantage_actions::capability::{ActionContext, HttpReply};
use vantage_actions::i18n::TranslationBundle;
use vantage_actions::snapshot::FilterSnapshot;
use vantage_api_models::{ActionDescriptor, ResponseType};
use vantage_events::EventBus;

use crate::mocks::{
    RecordingDownloads, RecordingNotifier, RecordingProgress, RecordingRouter, ScriptedHttp,
};

/// Handles onto the fakes inside a context built by [`scripted_context`].
pub struct ContextHandles {
    /// Scripted HTTP transport.
    pub http: Arc<ScriptedHttp>,
    /// Progress counter.
    pub progress: Arc<RecordingProgress>,
    /// Notification log.
    pub notifier: Arc<RecordingNotifier>,
    /// Router log.
    pub router: Arc<RecordingRouter>,
    /// Download logs.
    pub downloads: Arc<RecordingDownloads>,
    /// Event bus shared with the context.
    pub bus: EventBus,
}

/// Build an [`ActionContext`] wired entirely to recording fakes, returning
/// the handles needed to script and assert against them.
#[must_use]
pub fn scripted_context() -> (ActionContext, ContextHandles) {
    let http = Arc::new(ScriptedHttp::new());
    let progress = Arc::new(RecordingProgress::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let router = Arc::new(RecordingRouter::new());
    let downloads = Arc::new(RecordingDownloads::new());
    let bus = EventBus::new();

    let ctx = ActionContext {
        http: http.clone(),
        progress: progress.clone(),
        notifier: notifier.clone(),
        router: router.clone(),
        downloads: downloads.clone(),
        bus: bus.clone(),
        translations: TranslationBundle::new(),
    };

    let handles = ContextHandles {
        http,
        progress,
        notifier,
        router,
        downloads,
        bus,
    };

    (ctx, handles)
}

/// Descriptor for a confirmed JSON action.
#[must_use]
pub fn action(key: &str) -> ActionDescriptor {
    ActionDescriptor::new(key, key)
}

/// Descriptor for an action that skips the confirmation prompt.
#[must_use]
pub fn unconfirmed_action(key: &str) -> ActionDescriptor {
    let mut descriptor = ActionDescriptor::new(key, key);
    descriptor.without_confirmation = true;
    descriptor
}

/// Descriptor for a standalone action.
#[must_use]
pub fn standalone_action(key: &str) -> ActionDescriptor {
    let mut descriptor = ActionDescriptor::new(key, key);
    descriptor.standalone = true;
    descriptor
}

/// Descriptor for an action declaring a binary response.
#[must_use]
pub fn binary_action(key: &str) -> ActionDescriptor {
    let mut descriptor = ActionDescriptor::new(key, key);
    descriptor.without_confirmation = true;
    descriptor.response_type = ResponseType::Binary;
    descriptor
}

/// Snapshot for a plain `posts` index view.
#[must_use]
pub fn posts_snapshot() -> FilterSnapshot {
    FilterSnapshot::new("posts")
}

/// JSON reply with the given status.
///
/// # Panics
///
/// Panics if `body` cannot be serialized, which cannot happen for `Value`.
#[must_use]
pub fn json_reply(status: u16, body: &Value) -> HttpReply {
    HttpReply {
        status,
        content_type: Some("application/json".to_string()),
        content_disposition: None,
        body: serde_json::to_vec(body).expect("serialize json body"),
    }
}

/// Binary reply carrying arbitrary bytes and optional headers.
#[must_use]
pub fn binary_reply(
    status: u16,
    bytes: Vec<u8>,
    content_type: Option<&str>,
    content_disposition: Option<&str>,
) -> HttpReply {
    HttpReply {
        status,
        content_type: content_type.map(str::to_string),
        content_disposition: content_disposition.map(str::to_string),
        body: bytes,
    }
}
