#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the Vantage action endpoint.
//!
//! These types describe the wire contract between the panel frontend and the
//! `POST {endpoint}` action route: the action descriptors loaded from the
//! host configuration, the closed set of response payload shapes the server
//! may return, and the field-keyed validation error bag surfaced on 4xx
//! responses. Everything here is plain data; interpretation of the shapes
//! lives in `vantage-actions`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transport decoding declared by an action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// The endpoint answers with a JSON document.
    #[default]
    Json,
    /// The endpoint answers with an opaque byte stream (file exports and
    /// similar). Legacy configurations spell this `blob`.
    #[serde(alias = "blob")]
    Binary,
}

/// A single input declared on an action, pre-serialized by the form layer.
///
/// The frontend form components reduce every field to an `(attribute, value)`
/// string pair before an action is submitted; the request builder appends
/// these verbatim to the outgoing form body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionField {
    /// Form attribute name the server validates against.
    pub attribute: String,
    /// Serialized field value.
    pub value: String,
}

impl ActionField {
    /// Build a field from any pair of string-likes.
    #[must_use]
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A server-defined operation invocable against a set of resources.
///
/// Descriptors are loaded once from the host configuration and never mutated
/// afterwards; the executor only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    /// Unique key identifying the action on the wire.
    pub uri_key: String,
    /// Human-readable action name.
    pub name: String,
    /// Input fields declared on the action.
    #[serde(default)]
    pub fields: Vec<ActionField>,
    /// Whether the action is invocable with zero selected resources.
    #[serde(default)]
    pub standalone: bool,
    /// Whether the action skips the confirmation prompt entirely.
    #[serde(default)]
    pub without_confirmation: bool,
    /// Whether the confirmation prompt should use destructive styling.
    #[serde(default)]
    pub destructive: bool,
    /// Prompt body shown before execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_text: Option<String>,
    /// Label for the confirm button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_button_text: Option<String>,
    /// Label for the cancel button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_button_text: Option<String>,
    /// Transport decoding for the action's response.
    #[serde(default)]
    pub response_type: ResponseType,
}

impl ActionDescriptor {
    /// Minimal descriptor with the given key, defaulting every flag off.
    #[must_use]
    pub fn new(uri_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri_key: uri_key.into(),
            name: name.into(),
            fields: Vec::new(),
            standalone: false,
            without_confirmation: false,
            destructive: false,
            confirm_text: None,
            confirm_button_text: None,
            cancel_button_text: None,
            response_type: ResponseType::Json,
        }
    }
}

/// Side-channel event descriptor carried by an action response.
///
/// Broadcast on the event bus independently of whichever terminal branch the
/// response otherwise matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SideChannelEvent {
    /// Event key subscribers filter on.
    pub key: String,
    /// Opaque payload forwarded to subscribers.
    #[serde(default)]
    pub payload: Value,
}

/// Opaque modal content stored for the response modal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ModalPayload(pub Value);

/// A server-named download the client fetches via a same-page anchor click.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedDownload {
    /// Location of the file to download.
    pub url: String,
    /// Filename to save the download under.
    pub name: String,
}

/// Redirect instruction, either replacing the page or opening a new context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedirectTarget {
    /// Destination URL.
    pub url: String,
    /// Open in a new browsing context instead of replacing the page.
    #[serde(default)]
    pub open_in_new_tab: bool,
}

/// Client-side navigation instruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitTarget {
    /// In-app path to navigate to.
    pub path: String,
    /// Query options appended to the resolved path.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Decoded JSON body of a successful action invocation.
///
/// Every field is optional; the dispatcher checks them in a fixed priority
/// order and an empty object falls through to the default message branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionResponse {
    /// Result message shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error message; overrides severity in every message-showing branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    /// Side-channel event broadcast before terminal dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<SideChannelEvent>,
    /// Modal content to display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal: Option<ModalPayload>,
    /// Named download to trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<NamedDownload>,
    /// Whether the targeted resources were deleted.
    #[serde(default)]
    pub deleted: bool,
    /// Redirect instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTarget>,
    /// In-app navigation instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<VisitTarget>,
}

/// Field-keyed validation errors returned by 4xx action responses.
///
/// Keys are form attribute names; each maps to the ordered list of messages
/// the server produced for that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Empty error bag.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Whether any field currently has errors.
    #[must_use]
    pub fn any(&self) -> bool {
        !self.0.is_empty()
    }

    /// Whether the given field has at least one error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// First error message recorded for the given field.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All error messages recorded for the given field.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Replace the recorded errors wholesale.
    pub fn record(&mut self, errors: BTreeMap<String, Vec<String>>) {
        self.0 = errors;
    }

    /// Drop the errors recorded for a single field.
    pub fn forget(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// Drop every recorded error.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<BTreeMap<String, Vec<String>>> for ValidationErrors {
    fn from(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self(errors)
    }
}

/// Wire envelope for validation failures: `{"errors": {field: [messages]}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorsEnvelope {
    /// Field-keyed validation errors.
    #[serde(default)]
    pub errors: ValidationErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_type_accepts_legacy_blob_spelling() {
        let parsed: ResponseType = serde_json::from_str("\"blob\"").expect("parse");
        assert_eq!(parsed, ResponseType::Binary);
        let parsed: ResponseType = serde_json::from_str("\"json\"").expect("parse");
        assert_eq!(parsed, ResponseType::Json);
    }

    #[test]
    fn descriptor_defaults_every_flag_off() {
        let descriptor: ActionDescriptor = serde_json::from_value(serde_json::json!({
            "uriKey": "publish-posts",
            "name": "Publish Posts",
        }))
        .expect("parse");

        assert!(!descriptor.standalone);
        assert!(!descriptor.without_confirmation);
        assert!(!descriptor.destructive);
        assert!(descriptor.fields.is_empty());
        assert_eq!(descriptor.response_type, ResponseType::Json);
    }

    #[test]
    fn descriptor_round_trips_camel_case_flags() {
        let descriptor: ActionDescriptor = serde_json::from_value(serde_json::json!({
            "uriKey": "export",
            "name": "Export",
            "withoutConfirmation": true,
            "responseType": "binary",
            "fields": [{"attribute": "format", "value": "csv"}],
        }))
        .expect("parse");

        assert!(descriptor.without_confirmation);
        assert_eq!(descriptor.response_type, ResponseType::Binary);
        assert_eq!(descriptor.fields[0].attribute, "format");
    }

    #[test]
    fn empty_response_object_parses_to_defaults() {
        let response: ActionResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(response, ActionResponse::default());
        assert!(!response.deleted);
    }

    #[test]
    fn response_shapes_decode_independently() {
        let response: ActionResponse = serde_json::from_value(serde_json::json!({
            "message": "Done",
            "deleted": true,
            "event": {"key": "refresh", "payload": {"count": 3}},
        }))
        .expect("parse");

        assert!(response.deleted);
        assert_eq!(response.message.as_deref(), Some("Done"));
        assert_eq!(response.event.as_ref().map(|e| e.key.as_str()), Some("refresh"));
        assert!(response.modal.is_none());
        assert!(response.redirect.is_none());
    }

    #[test]
    fn redirect_defaults_to_same_tab() {
        let response: ActionResponse = serde_json::from_value(serde_json::json!({
            "redirect": {"url": "https://example.test/next"},
        }))
        .expect("parse");

        let redirect = response.redirect.expect("redirect");
        assert!(!redirect.open_in_new_tab);
    }

    #[test]
    fn validation_errors_expose_first_and_has() {
        let envelope: ErrorsEnvelope = serde_json::from_value(serde_json::json!({
            "errors": {"name": ["required", "too short"]},
        }))
        .expect("parse");

        assert!(envelope.errors.any());
        assert!(envelope.errors.has("name"));
        assert!(!envelope.errors.has("email"));
        assert_eq!(envelope.errors.first("name"), Some("required"));
        assert_eq!(envelope.errors.get("name").len(), 2);
        assert!(envelope.errors.get("email").is_empty());
    }

    #[test]
    fn validation_errors_forget_and_clear() {
        let mut errors = ValidationErrors::new();
        errors.record(BTreeMap::from([
            ("name".to_string(), vec!["required".to_string()]),
            ("email".to_string(), vec!["invalid".to_string()]),
        ]));

        errors.forget("name");
        assert!(!errors.has("name"));
        assert!(errors.has("email"));

        errors.clear();
        assert!(!errors.any());
    }
}
