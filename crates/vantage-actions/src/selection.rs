//! Resource selection model and action availability rules.

use vantage_api_models::ActionDescriptor;

/// A resource picked in the index view.
///
/// Resources reached through a many-to-many relation additionally carry the
/// identifier of the join record, which pivot actions operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedResource {
    /// Primary resource identifier.
    pub id: String,
    /// Join-record identifier when reached through a many-to-many relation.
    pub pivot_id: Option<String>,
}

impl SelectedResource {
    /// A plain selection with no pivot identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pivot_id: None,
        }
    }

    /// A selection carrying a pivot identifier.
    #[must_use]
    pub fn with_pivot(id: impl Into<String>, pivot_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pivot_id: Some(pivot_id.into()),
        }
    }
}

/// Current selection: either the literal "everything matching the filter"
/// token or an explicit ordered set of resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// All resources matching the current filter context. The server
    /// re-resolves the matching set from the request's query parameters.
    All,
    /// An explicit ordered set of selected resources.
    Resources(Vec<SelectedResource>),
}

impl SelectionState {
    /// Empty explicit selection.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Resources(Vec::new())
    }

    /// Whether this is the "all matching" token.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether nothing is selected. The "all" token always counts as a
    /// non-empty selection.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Resources(resources) => resources.is_empty(),
        }
    }

    /// Pivot identifiers carried by the selected resources, in order.
    #[must_use]
    pub fn pivot_ids(&self) -> Vec<&str> {
        match self {
            Self::All => Vec::new(),
            Self::Resources(resources) => resources
                .iter()
                .filter_map(|resource| resource.pivot_id.as_deref())
                .collect(),
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Regular actions offered for the current selection: anything non-standalone
/// once at least one resource is selected.
#[must_use]
pub fn available_actions<'a>(
    actions: &'a [ActionDescriptor],
    selection: &SelectionState,
) -> Vec<&'a ActionDescriptor> {
    actions
        .iter()
        .filter(|action| !selection.is_empty() && !action.standalone)
        .collect()
}

/// Standalone actions, offered regardless of selection.
#[must_use]
pub fn standalone_actions(actions: &[ActionDescriptor]) -> Vec<&ActionDescriptor> {
    actions.iter().filter(|action| action.standalone).collect()
}

/// Pivot actions offered for the current selection. With nothing selected
/// only the standalone subset remains.
#[must_use]
pub fn available_pivot_actions<'a>(
    pivot_actions: &'a [ActionDescriptor],
    selection: &SelectionState,
) -> Vec<&'a ActionDescriptor> {
    pivot_actions
        .iter()
        .filter(|action| {
            if selection.is_empty() {
                action.standalone
            } else {
                true
            }
        })
        .collect()
}
