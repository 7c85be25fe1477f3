//! Capability traits for the executor's outward side effects.
//!
//! The original design reached every collaborator through an implicit global
//! singleton. Here each concern is an injected capability on an explicit
//! [`ActionContext`], so tests can substitute fakes for all of them.

use std::sync::Arc;

use async_trait::async_trait;
use vantage_api_models::ResponseType;
use vantage_events::EventBus;

use crate::i18n::TranslationBundle;
use crate::request::ActionRequest;

/// Transport-level reply from the action endpoint.
///
/// The transport hands back raw bytes plus the two headers the dispatcher
/// cares about; decoding according to the action's declared response type
/// happens downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, when present.
    pub content_type: Option<String>,
    /// `Content-Disposition` header, when present.
    pub content_disposition: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Whether the status is in the 4xx range.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }
}

/// HTTP transport used to reach the action endpoint.
///
/// Implementations return `Ok` for any delivered response, whatever its
/// status; `Err` means the request produced no response at all.
#[async_trait]
pub trait HttpCapability: Send + Sync {
    /// POST the built request to the given endpoint.
    async fn post_action(
        &self,
        endpoint: &str,
        request: &ActionRequest,
        response_type: ResponseType,
    ) -> anyhow::Result<HttpReply>;
}

/// Global progress indicator start/stop signal.
pub trait ProgressCapability: Send + Sync {
    /// Signal that work has started.
    fn start(&self);
    /// Signal that work has completed, successfully or not.
    fn done(&self);
}

/// Toast-level notification surface.
pub trait NotifyCapability: Send + Sync {
    /// Show a success notification.
    fn success(&self, message: &str);
    /// Show an error notification.
    fn error(&self, message: &str);
}

/// Client-side router and browsing-context control.
pub trait RouterCapability: Send + Sync {
    /// Open a URL in a new browsing context.
    fn open(&self, url: &str);
    /// Replace the current location; the page is about to unload.
    fn replace(&self, url: &str);
    /// Perform an in-app navigation to the resolved path.
    fn visit(&self, path: &str);
}

/// File download surface (anchor-click downloads in a browser host).
pub trait DownloadCapability: Send + Sync {
    /// Save an in-memory payload under the given filename.
    fn save(&self, bytes: &[u8], file_name: &str) -> anyhow::Result<()>;
    /// Fetch a server-named URL as a download with the given filename.
    fn fetch(&self, url: &str, file_name: &str) -> anyhow::Result<()>;
}

/// Explicit context object carrying every capability the executor and
/// dispatcher touch. Cloning is cheap; all capabilities are shared.
#[derive(Clone)]
pub struct ActionContext {
    /// HTTP transport.
    pub http: Arc<dyn HttpCapability>,
    /// Progress indicator.
    pub progress: Arc<dyn ProgressCapability>,
    /// Notification surface.
    pub notifier: Arc<dyn NotifyCapability>,
    /// Router / browsing-context control.
    pub router: Arc<dyn RouterCapability>,
    /// Download surface.
    pub downloads: Arc<dyn DownloadCapability>,
    /// Typed event bus.
    pub bus: EventBus,
    /// Localized strings for the messages this component emits.
    pub translations: TranslationBundle,
}
