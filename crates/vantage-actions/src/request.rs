//! Canonical action request construction.
//!
//! The builder is a pure function of `(action, selection, snapshot)`: given
//! equal inputs it yields byte-identical serialized output. Ordering of both
//! query pairs and form entries is fixed.

use vantage_api_models::ActionDescriptor;

use crate::selection::SelectionState;
use crate::snapshot::FilterSnapshot;

/// Literal selection token meaning "every resource matching the filter".
pub const ALL_RESOURCES: &str = "all";

/// One entry of the multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    /// Form field name.
    pub name: String,
    /// Serialized value.
    pub value: String,
}

impl FormEntry {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A fully built action request: ordered query parameters plus the form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Query parameters in canonical order.
    pub query: Vec<(String, String)>,
    /// Form body entries in canonical order.
    pub entries: Vec<FormEntry>,
}

impl ActionRequest {
    /// Build the canonical request for invoking `action` against `selection`
    /// in the context captured by `snapshot`.
    ///
    /// When the selection is the "all" token, individual resource and pivot
    /// ids are omitted entirely; the server re-resolves the matching set from
    /// the query parameters. Pivot ids are only attached when the action is a
    /// pivot action and at least one selected resource carries one.
    #[must_use]
    pub fn build(
        action: &ActionDescriptor,
        pivot_action: bool,
        selection: &SelectionState,
        snapshot: &FilterSnapshot,
    ) -> Self {
        let query = vec![
            ("action".to_string(), action.uri_key.clone()),
            ("pivotAction".to_string(), pivot_action.to_string()),
            ("search".to_string(), snapshot.current_search().to_string()),
            ("filters".to_string(), snapshot.encoded_filters.clone()),
            ("trashed".to_string(), snapshot.current_trashed().to_string()),
            (
                "viaResource".to_string(),
                snapshot.via_resource.clone().unwrap_or_default(),
            ),
            (
                "viaResourceId".to_string(),
                snapshot.via_resource_id.clone().unwrap_or_default(),
            ),
            (
                "viaRelationship".to_string(),
                snapshot.via_relationship.clone().unwrap_or_default(),
            ),
        ];

        let mut entries = Vec::new();
        match selection {
            SelectionState::All => {
                entries.push(FormEntry::new("resources", ALL_RESOURCES));
            }
            SelectionState::Resources(resources) => {
                for resource in resources {
                    entries.push(FormEntry::new("resources[]", resource.id.clone()));
                }
                if pivot_action {
                    for pivot_id in selection.pivot_ids() {
                        entries.push(FormEntry::new("pivots[]", pivot_id));
                    }
                }
            }
        }

        for field in &action.fields {
            entries.push(FormEntry::new(field.attribute.clone(), field.value.clone()));
        }

        Self { query, entries }
    }

    /// Canonical query-string serialization (percent-encoded, fixed order).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.query
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Canonical form-body serialization, one `name=value` pair per entry.
    #[must_use]
    pub fn to_form_string(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{}={}",
                    urlencoding::encode(&entry.name),
                    urlencoding::encode(&entry.value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full canonical serialization: query string, newline, form body.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = self.to_query_string().into_bytes();
        bytes.push(b'\n');
        bytes.extend_from_slice(self.to_form_string().as_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectedResource;
    use vantage_api_models::ActionField;

    fn sample_action() -> ActionDescriptor {
        let mut action = ActionDescriptor::new("publish-posts", "Publish Posts");
        action.fields = vec![ActionField::new("notify", "true")];
        action
    }

    fn sample_snapshot() -> FilterSnapshot {
        FilterSnapshot::new("posts")
            .with_query_param("posts_search", "rust")
            .with_filters(&serde_json::json!([{"class": "status", "value": "draft"}]))
    }

    #[test]
    fn all_selection_serializes_the_literal_token_only() {
        let request = ActionRequest::build(
            &sample_action(),
            false,
            &SelectionState::All,
            &sample_snapshot(),
        );

        let resources: Vec<_> = request
            .entries
            .iter()
            .filter(|entry| entry.name.starts_with("resources"))
            .collect();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "resources");
        assert_eq!(resources[0].value, ALL_RESOURCES);
        assert!(!request.entries.iter().any(|entry| entry.name == "pivots[]"));
    }

    #[test]
    fn explicit_selection_serializes_each_resource() {
        let selection = SelectionState::Resources(vec![
            SelectedResource::new("1"),
            SelectedResource::with_pivot("2", "77"),
            SelectedResource::new("3"),
        ]);

        let request = ActionRequest::build(&sample_action(), true, &selection, &sample_snapshot());

        let ids: Vec<_> = request
            .entries
            .iter()
            .filter(|entry| entry.name == "resources[]")
            .map(|entry| entry.value.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let pivots: Vec<_> = request
            .entries
            .iter()
            .filter(|entry| entry.name == "pivots[]")
            .map(|entry| entry.value.as_str())
            .collect();
        assert_eq!(pivots, vec!["77"]);
    }

    #[test]
    fn pivots_are_omitted_for_non_pivot_actions() {
        let selection =
            SelectionState::Resources(vec![SelectedResource::with_pivot("2", "77")]);

        let request = ActionRequest::build(&sample_action(), false, &selection, &sample_snapshot());
        assert!(!request.entries.iter().any(|entry| entry.name == "pivots[]"));
    }

    #[test]
    fn action_fields_follow_the_selection_entries() {
        let request = ActionRequest::build(
            &sample_action(),
            false,
            &SelectionState::All,
            &sample_snapshot(),
        );

        let last = request.entries.last().expect("entries");
        assert_eq!(last.name, "notify");
        assert_eq!(last.value, "true");
    }

    #[test]
    fn query_parameters_are_ordered_and_complete() {
        let snapshot = sample_snapshot().with_via("users", "9", "authored");
        let request =
            ActionRequest::build(&sample_action(), false, &SelectionState::All, &snapshot);

        let keys: Vec<_> = request.query.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "action",
                "pivotAction",
                "search",
                "filters",
                "trashed",
                "viaResource",
                "viaResourceId",
                "viaRelationship",
            ]
        );
        assert_eq!(request.query[0].1, "publish-posts");
        assert_eq!(request.query[1].1, "false");
        assert_eq!(request.query[5].1, "users");
    }

    #[test]
    fn identical_inputs_yield_byte_identical_encodings() {
        let selection = SelectionState::Resources(vec![
            SelectedResource::new("1"),
            SelectedResource::with_pivot("2", "77"),
        ]);
        let snapshot = sample_snapshot();

        let first = ActionRequest::build(&sample_action(), true, &selection, &snapshot);
        let second = ActionRequest::build(&sample_action(), true, &selection, &snapshot);

        assert_eq!(first.encode(), second.encode());
        assert_eq!(first.to_query_string(), second.to_query_string());
    }
}
