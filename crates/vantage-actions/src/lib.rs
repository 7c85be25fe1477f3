//! Client-side action execution for the Vantage admin panel.
//!
//! This crate implements the panel's bulk/standalone action protocol: it
//! derives a canonical request from the current selection and filter context
//! ([`request::ActionRequest`]), executes it against the action endpoint with
//! in-flight and failure handling ([`executor::ActionExecutor`]), and
//! interprets the server's response through a closed table of terminal UI
//! effects ([`dispatch`]).
//!
//! All outward side effects (HTTP, progress indication, notifications,
//! navigation, downloads) go through the capability traits in
//! [`capability`], bundled into an [`capability::ActionContext`], so every
//! collaborator can be substituted with a fake in tests.

pub mod capability;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod http;
pub mod i18n;
pub mod request;
pub mod selection;
pub mod snapshot;
pub mod state;

pub use capability::{
    ActionContext, DownloadCapability, HttpCapability, HttpReply, NotifyCapability,
    ProgressCapability, RouterCapability,
};
pub use dispatch::DispatchOutcome;
pub use error::{ActionError, ActionResult};
pub use executor::ActionExecutor;
pub use request::{ActionRequest, FormEntry};
pub use selection::{SelectedResource, SelectionState};
pub use snapshot::FilterSnapshot;
pub use state::ExecutionState;
