//! Per-view execution state.

use vantage_api_models::{ModalPayload, ValidationErrors};

/// State machine backing one view's action panel.
///
/// Transitions are driven only by the executor and the dispatcher. Invariant:
/// no exit path from an invocation (success, failure, guard rejection, or
/// cancellation) leaves `working == true`.
#[derive(Debug, Clone, Default)]
pub struct ExecutionState {
    /// An invocation is currently in flight.
    pub working: bool,
    /// Validation errors from the most recent rejected invocation.
    pub errors: ValidationErrors,
    /// URI key of the currently selected action, empty when none.
    pub selected_action_key: String,
    /// The confirmation prompt is open.
    pub confirmation_open: bool,
    /// The response modal is open.
    pub response_modal_open: bool,
    /// Content for the response modal, set by the dispatcher.
    pub response_modal_data: Option<ModalPayload>,
}

impl ExecutionState {
    /// Fresh state with nothing selected and nothing open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
