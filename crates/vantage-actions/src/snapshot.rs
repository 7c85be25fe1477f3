//! Immutable filter/query context snapshots.
//!
//! The original design derived search, filter, and trashed state through a
//! framework-managed reactive graph. Here the upstream state is captured
//! into an immutable [`FilterSnapshot`] and every derived value is recomputed
//! on demand from it, so there is no hidden incremental recomputation to
//! reason about.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use serde_json::Value;

/// Snapshot of the index view's query-string and relationship context at the
/// moment an action is invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSnapshot {
    /// Resource collection the index view lists.
    pub resource_name: String,
    /// Override for the action endpoint; defaults to the panel route.
    pub endpoint: Option<String>,
    /// Parent resource when the listing is a relationship panel.
    pub via_resource: Option<String>,
    /// Parent resource identifier.
    pub via_resource_id: Option<String>,
    /// Relationship name on the parent resource.
    pub via_relationship: Option<String>,
    /// Raw query-string parameters of the current page.
    pub query: BTreeMap<String, String>,
    /// Opaque encoded filter string for the current predicates.
    pub encoded_filters: String,
}

impl FilterSnapshot {
    /// Snapshot for a top-level resource index with no active context.
    #[must_use]
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            ..Self::default()
        }
    }

    /// Attach relationship-navigation context.
    #[must_use]
    pub fn with_via(
        mut self,
        resource: impl Into<String>,
        resource_id: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        self.via_resource = Some(resource.into());
        self.via_resource_id = Some(resource_id.into());
        self.via_relationship = Some(relationship.into());
        self
    }

    /// Record a raw query-string parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Encode and attach the active filter predicates.
    #[must_use]
    pub fn with_filters(mut self, filters: &Value) -> Self {
        self.encoded_filters = encode_filters(filters);
        self
    }

    /// Action endpoint for this view.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("/vantage-api/{}/action", self.resource_name))
    }

    /// Name of the search parameter scoped to this view: relationship panels
    /// use the relationship name, top-level indexes the resource name.
    #[must_use]
    pub fn search_parameter(&self) -> String {
        match &self.via_relationship {
            Some(relationship) => format!("{relationship}_search"),
            None => format!("{}_search", self.resource_name),
        }
    }

    /// Name of the trashed-state parameter scoped to this view.
    #[must_use]
    pub fn trashed_parameter(&self) -> String {
        match &self.via_relationship {
            Some(relationship) => format!("{relationship}_trashed"),
            None => format!("{}_trashed", self.resource_name),
        }
    }

    /// Current search text, empty when the parameter is absent.
    #[must_use]
    pub fn current_search(&self) -> &str {
        self.query
            .get(&self.search_parameter())
            .map_or("", String::as_str)
    }

    /// Current trashed-state flag, empty when the parameter is absent.
    #[must_use]
    pub fn current_trashed(&self) -> &str {
        self.query
            .get(&self.trashed_parameter())
            .map_or("", String::as_str)
    }
}

/// Serialize filter predicates into the opaque form passed between client and
/// server (base64 over the JSON document).
#[must_use]
pub fn encode_filters(filters: &Value) -> String {
    general_purpose::STANDARD.encode(filters.to_string())
}

/// Decode an opaque filter string back into its JSON document.
pub fn decode_filters(encoded: &str) -> anyhow::Result<Value> {
    let bytes = general_purpose::STANDARD.decode(encoded)?;
    Ok(serde_json::from_slice(&bytes)?)
}
