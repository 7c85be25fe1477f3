//! Action selection, confirmation flow, and execution.

use tracing::{debug, warn};
use vantage_api_models::{ActionDescriptor, ErrorsEnvelope, ValidationErrors};

use crate::capability::{ActionContext, HttpReply};
use crate::dispatch::{self, DispatchOutcome};
use crate::error::{ActionError, ActionResult};
use crate::i18n::KEY_ACTION_PROBLEM;
use crate::request::ActionRequest;
use crate::selection::{self, SelectionState};
use crate::snapshot::FilterSnapshot;
use crate::state::ExecutionState;

/// Drives one view's action panel: which action is selected, whether a
/// confirmation prompt gates it, and the single in-flight invocation.
///
/// All collaborators are reached through the injected [`ActionContext`];
/// the executor itself owns only per-view state.
pub struct ActionExecutor {
    ctx: ActionContext,
    snapshot: FilterSnapshot,
    actions: Vec<ActionDescriptor>,
    pivot_actions: Vec<ActionDescriptor>,
    selection: SelectionState,
    state: ExecutionState,
}

impl ActionExecutor {
    /// Executor for the view described by `snapshot`, with no actions loaded.
    #[must_use]
    pub fn new(ctx: ActionContext, snapshot: FilterSnapshot) -> Self {
        Self {
            ctx,
            snapshot,
            actions: Vec::new(),
            pivot_actions: Vec::new(),
            selection: SelectionState::empty(),
            state: ExecutionState::new(),
        }
    }

    /// Load the regular actions offered by the host configuration.
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<ActionDescriptor>) -> Self {
        self.actions = actions;
        self
    }

    /// Load the pivot actions offered for the relationship.
    #[must_use]
    pub fn with_pivot_actions(mut self, pivot_actions: Vec<ActionDescriptor>) -> Self {
        self.pivot_actions = pivot_actions;
        self
    }

    /// Replace the current selection.
    pub fn set_selection(&mut self, selection: SelectionState) {
        self.selection = selection;
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current execution state, for view bindings and assertions.
    #[must_use]
    pub const fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Mutable execution state, for view bindings that own field edits.
    pub const fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    /// Regular actions offered for the current selection.
    #[must_use]
    pub fn available_actions(&self) -> Vec<&ActionDescriptor> {
        selection::available_actions(&self.actions, &self.selection)
    }

    /// Pivot actions offered for the current selection.
    #[must_use]
    pub fn available_pivot_actions(&self) -> Vec<&ActionDescriptor> {
        selection::available_pivot_actions(&self.pivot_actions, &self.selection)
    }

    /// Whether any pivot actions are offered right now.
    #[must_use]
    pub fn has_pivot_actions(&self) -> bool {
        !self.available_pivot_actions().is_empty()
    }

    /// Set the active action. No side effect beyond the state update.
    pub fn select_action(&mut self, key: impl Into<String>) {
        self.state.selected_action_key = key.into();
    }

    /// Descriptor for the currently selected action, if any.
    #[must_use]
    pub fn selected_action(&self) -> Option<&ActionDescriptor> {
        if self.state.selected_action_key.is_empty() {
            return None;
        }
        self.actions
            .iter()
            .chain(self.pivot_actions.iter())
            .find(|action| action.uri_key == self.state.selected_action_key)
    }

    fn selected_is_pivot(&self) -> bool {
        self.pivot_actions
            .iter()
            .any(|action| action.uri_key == self.state.selected_action_key)
    }

    /// Select an action and immediately run the confirmation strategy.
    pub async fn handle_action_click(
        &mut self,
        key: impl Into<String>,
    ) -> ActionResult<Option<DispatchOutcome>> {
        self.select_action(key);
        self.invoke().await
    }

    /// Run the selected action's confirmation strategy: execute immediately
    /// when the action skips confirmation, otherwise open the prompt and
    /// defer to [`Self::confirm`]. Returns `None` when deferred.
    pub async fn invoke(&mut self) -> ActionResult<Option<DispatchOutcome>> {
        let without_confirmation = self
            .selected_action()
            .ok_or(ActionError::NoActionSelected)?
            .without_confirmation;
        if without_confirmation {
            return self.execute().await.map(Some);
        }

        self.state.errors.clear();
        self.state.confirmation_open = true;
        Ok(None)
    }

    /// Explicit confirmation step for a prompted action.
    pub async fn confirm(&mut self) -> ActionResult<DispatchOutcome> {
        self.execute().await
    }

    /// Dismiss the confirmation prompt and reset the selected action.
    pub fn cancel(&mut self) {
        self.state.confirmation_open = false;
        self.state.selected_action_key.clear();
    }

    /// Open the response modal.
    pub fn open_response_modal(&mut self) {
        self.state.response_modal_open = true;
    }

    /// Close the response modal and drop its content.
    pub fn close_response_modal(&mut self) {
        self.state.response_modal_open = false;
        self.state.response_modal_data = None;
    }

    /// Execute the selected action against the current selection.
    ///
    /// Exactly one invocation may be pending per view; a second call while
    /// `working` is rejected with [`ActionError::InFlight`]. Whatever the
    /// outcome, `working` is false and the progress indicator is completed
    /// when this returns.
    pub async fn execute(&mut self) -> ActionResult<DispatchOutcome> {
        if self.state.working {
            return Err(ActionError::InFlight);
        }
        let action = self
            .selected_action()
            .cloned()
            .ok_or(ActionError::NoActionSelected)?;
        let pivot_action = self.selected_is_pivot();
        let request = ActionRequest::build(&action, pivot_action, &self.selection, &self.snapshot);
        let endpoint = self.snapshot.endpoint();

        debug!(
            action = %action.uri_key,
            resource = %self.snapshot.resource_name,
            pivot = pivot_action,
            "executing action"
        );

        self.state.working = true;
        self.ctx.progress.start();

        let sent = self
            .ctx
            .http
            .post_action(&endpoint, &request, action.response_type)
            .await;
        let outcome = self.settle(&action, sent);

        self.state.working = false;
        self.ctx.progress.done();
        outcome
    }

    /// Classify the transport result and run the dispatcher on success.
    fn settle(
        &mut self,
        action: &ActionDescriptor,
        sent: anyhow::Result<HttpReply>,
    ) -> ActionResult<DispatchOutcome> {
        let ctx = self.ctx.clone();
        match sent {
            Ok(reply) if reply.is_success() => {
                self.state.confirmation_open = false;
                dispatch::dispatch(
                    &ctx,
                    &mut self.state,
                    action,
                    &self.snapshot.resource_name,
                    reply,
                )
            }
            Ok(reply) if reply.is_client_error() => {
                let errors = decode_validation_errors(&reply);
                self.state.errors = errors.clone();
                ctx.notifier.error(&ctx.translations.text(KEY_ACTION_PROBLEM));
                Err(ActionError::Validation { errors })
            }
            Ok(reply) => {
                let body = String::from_utf8_lossy(&reply.body).into_owned();
                warn!(
                    action = %action.uri_key,
                    status = reply.status,
                    "action endpoint returned a server error"
                );
                ctx.notifier.error(&ctx.translations.text(KEY_ACTION_PROBLEM));
                Err(ActionError::Http {
                    status: reply.status,
                    body,
                })
            }
            Err(source) => {
                warn!(action = %action.uri_key, error = %source, "action request failed");
                ctx.notifier.error(&ctx.translations.text(KEY_ACTION_PROBLEM));
                Err(ActionError::Transport { source })
            }
        }
    }
}

/// Decode the `{"errors": {...}}` envelope from a 4xx body. Binary response
/// types deliver the same structure inside the blob, so the body is always
/// text-decoded first; an undecodable body yields an empty error bag.
fn decode_validation_errors(reply: &HttpReply) -> ValidationErrors {
    let text = String::from_utf8_lossy(&reply.body);
    serde_json::from_str::<ErrorsEnvelope>(&text)
        .map(|envelope| envelope.errors)
        .unwrap_or_default()
}
