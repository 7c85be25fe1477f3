//! End-to-end executor suite driving every branch of the dispatch table
//! through recording fakes.

use serde_json::json;
use vantage_actions::dispatch::DispatchOutcome;
use vantage_actions::error::ActionError;
use vantage_actions::executor::ActionExecutor;
use vantage_actions::selection::{SelectedResource, SelectionState};
use vantage_api_models::ActionDescriptor;
use vantage_events::Event;
use vantage_test_support::fixtures::{
    ContextHandles, action, binary_action, binary_reply, json_reply, posts_snapshot,
    scripted_context, unconfirmed_action,
};
use vantage_test_support::mocks::{NotificationKind, RouteCall};

fn executor_with(actions: Vec<ActionDescriptor>) -> (ActionExecutor, ContextHandles) {
    let (ctx, handles) = scripted_context();
    let executor = ActionExecutor::new(ctx, posts_snapshot()).with_actions(actions);
    (executor, handles)
}

fn single_selection() -> SelectionState {
    SelectionState::Resources(vec![SelectedResource::new("1")])
}

#[tokio::test]
async fn without_confirmation_executes_directly() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    handles.http.push_reply(json_reply(200, &json!({})));

    let outcome = executor.handle_action_click("publish").await.expect("invoke");

    assert_eq!(outcome, Some(DispatchOutcome::Message));
    assert!(!executor.state().confirmation_open);
    assert_eq!(handles.http.requests().len(), 1);
}

#[tokio::test]
async fn confirmation_gated_invoke_defers_execution() {
    let (mut executor, handles) = executor_with(vec![action("publish")]);
    executor.set_selection(single_selection());

    let outcome = executor.handle_action_click("publish").await.expect("invoke");

    assert_eq!(outcome, None);
    assert!(executor.state().confirmation_open);
    assert!(handles.http.requests().is_empty());

    handles.http.push_reply(json_reply(200, &json!({})));
    let outcome = executor.confirm().await.expect("confirm");

    assert_eq!(outcome, DispatchOutcome::Message);
    assert!(!executor.state().confirmation_open);
    assert_eq!(handles.http.requests().len(), 1);
}

#[tokio::test]
async fn select_all_sends_the_literal_token() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(SelectionState::All);
    handles.http.push_reply(json_reply(200, &json!({})));

    executor.handle_action_click("publish").await.expect("invoke");

    let request = &handles.http.requests()[0];
    assert_eq!(request.form, "resources=all");
    assert_eq!(request.endpoint, "/vantage-api/posts/action");
}

#[tokio::test]
async fn pivot_ids_accompany_pivot_actions_only() {
    let (ctx, handles) = scripted_context();
    let mut executor = ActionExecutor::new(ctx, posts_snapshot())
        .with_pivot_actions(vec![unconfirmed_action("detach")]);
    executor.set_selection(SelectionState::Resources(vec![
        SelectedResource::new("1"),
        SelectedResource::with_pivot("2", "77"),
        SelectedResource::new("3"),
    ]));
    handles.http.push_reply(json_reply(200, &json!({})));

    executor.handle_action_click("detach").await.expect("invoke");

    let request = &handles.http.requests()[0];
    assert_eq!(request.form.matches("resources%5B%5D=").count(), 3);
    assert_eq!(request.form.matches("pivots%5B%5D=77").count(), 1);
    let pivot_flag = request
        .query
        .iter()
        .find(|(key, _)| key == "pivotAction")
        .map(|(_, value)| value.as_str());
    assert_eq!(pivot_flag, Some("true"));
}

#[tokio::test]
async fn regular_actions_never_send_pivot_ids() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(SelectionState::Resources(vec![SelectedResource::with_pivot(
        "2", "77",
    )]));
    handles.http.push_reply(json_reply(200, &json!({})));

    executor.handle_action_click("publish").await.expect("invoke");

    let request = &handles.http.requests()[0];
    assert!(!request.form.contains("pivots"));
}

#[tokio::test]
async fn deletion_notice_notifies_and_broadcasts() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("discard")]);
    executor.set_selection(single_selection());
    let mut events = handles.bus.subscribe(None);
    handles
        .http
        .push_reply(json_reply(200, &json!({"deleted": true, "message": "Done"})));

    let outcome = executor.handle_action_click("discard").await.expect("invoke");

    assert_eq!(outcome, Some(DispatchOutcome::Deleted));
    let last = handles.notifier.last().expect("notification");
    assert_eq!(last.kind, NotificationKind::Success);
    assert_eq!(last.message, "Done");

    let broadcast = events.drain_ready();
    assert_eq!(broadcast.len(), 1);
    assert_eq!(
        broadcast[0].event,
        Event::ActionExecuted {
            resource: "posts".to_string(),
            action: "discard".to_string(),
        }
    );
    assert!(!executor.state().working);
    assert_eq!(handles.progress.started(), 1);
    assert_eq!(handles.progress.completed(), 1);
}

#[tokio::test]
async fn danger_overrides_notification_severity() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    handles
        .http
        .push_reply(json_reply(200, &json!({"danger": "Failed"})));

    let outcome = executor.handle_action_click("publish").await.expect("invoke");

    assert_eq!(outcome, Some(DispatchOutcome::Message));
    let last = handles.notifier.last().expect("notification");
    assert_eq!(last.kind, NotificationKind::Error);
    assert_eq!(last.message, "Failed");
}

#[tokio::test]
async fn validation_failure_records_field_errors() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    handles.http.push_reply(json_reply(
        422,
        &json!({"errors": {"name": ["required"]}}),
    ));

    let error = executor
        .handle_action_click("publish")
        .await
        .expect_err("validation should fail");

    assert!(matches!(error, ActionError::Validation { .. }));
    assert!(executor.state().errors.has("name"));
    assert_eq!(executor.state().errors.first("name"), Some("required"));
    assert!(!executor.state().confirmation_open);
    assert!(!executor.state().working);

    let last = handles.notifier.last().expect("notification");
    assert_eq!(last.kind, NotificationKind::Error);
    assert_eq!(last.message, "There was a problem executing the action.");
}

#[tokio::test]
async fn in_flight_guard_rejects_a_second_invocation() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    executor.select_action("publish");
    executor.state_mut().working = true;

    let error = executor.execute().await.expect_err("guard should reject");

    assert!(matches!(error, ActionError::InFlight));
    assert!(handles.http.requests().is_empty());
    assert_eq!(handles.progress.started(), 0);
}

#[tokio::test]
async fn server_errors_are_surfaced_not_swallowed() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    handles
        .http
        .push_reply(json_reply(500, &json!({"message": "boom"})));

    let error = executor
        .handle_action_click("publish")
        .await
        .expect_err("server error should surface");

    assert!(matches!(error, ActionError::Http { status: 500, .. }));
    assert_eq!(
        handles.notifier.last().expect("notification").kind,
        NotificationKind::Error
    );
    assert!(!executor.state().working);
    assert_eq!(handles.progress.completed(), 1);
}

#[tokio::test]
async fn transport_failures_are_surfaced_not_swallowed() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    handles.http.push_failure("connection refused");

    let error = executor
        .handle_action_click("publish")
        .await
        .expect_err("transport failure should surface");

    assert!(matches!(error, ActionError::Transport { .. }));
    assert_eq!(
        handles.notifier.last().expect("notification").kind,
        NotificationKind::Error
    );
    assert!(!executor.state().working);
}

#[tokio::test]
async fn binary_responses_save_an_attachment() {
    let (mut executor, handles) = executor_with(vec![binary_action("export")]);
    executor.set_selection(single_selection());
    let mut events = handles.bus.subscribe(None);
    handles.http.push_reply(binary_reply(
        200,
        b"csv,data".to_vec(),
        Some("text/csv"),
        Some("attachment; filename=\"report.csv\""),
    ));

    let outcome = executor.handle_action_click("export").await.expect("invoke");

    assert_eq!(
        outcome,
        Some(DispatchOutcome::Attachment {
            file_name: "report.csv".to_string(),
        })
    );
    let saved = handles.downloads.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].file_name, "report.csv");
    assert_eq!(saved[0].bytes, b"csv,data");
    assert_eq!(events.drain_ready().len(), 1);
}

#[tokio::test]
async fn blob_wrapped_json_is_unwrapped_once() {
    let (mut executor, handles) = executor_with(vec![binary_action("discard")]);
    executor.set_selection(single_selection());
    let body = serde_json::to_vec(&json!({"deleted": true, "message": "Done"})).expect("body");
    handles
        .http
        .push_reply(binary_reply(200, body, Some("application/json"), None));

    let outcome = executor.handle_action_click("discard").await.expect("invoke");

    assert_eq!(outcome, Some(DispatchOutcome::Deleted));
    assert!(handles.downloads.saved().is_empty());
    assert_eq!(
        handles.notifier.last().expect("notification").message,
        "Done"
    );
}

#[tokio::test]
async fn binary_validation_errors_are_text_decoded() {
    let (mut executor, handles) = executor_with(vec![binary_action("export")]);
    executor.set_selection(single_selection());
    let body = serde_json::to_vec(&json!({"errors": {"format": ["unsupported"]}})).expect("body");
    handles
        .http
        .push_reply(binary_reply(422, body, Some("application/json"), None));

    let error = executor
        .handle_action_click("export")
        .await
        .expect_err("validation should fail");

    assert!(matches!(error, ActionError::Validation { .. }));
    assert_eq!(
        executor.state().errors.first("format"),
        Some("unsupported")
    );
}

#[tokio::test]
async fn modal_payloads_open_the_response_modal() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("inspect")]);
    executor.set_selection(single_selection());
    handles.http.push_reply(json_reply(
        200,
        &json!({"modal": {"component": "audit-log", "rows": 3}, "message": "Loaded"}),
    ));

    let outcome = executor.handle_action_click("inspect").await.expect("invoke");

    assert_eq!(outcome, Some(DispatchOutcome::Modal));
    assert!(executor.state().response_modal_open);
    assert!(executor.state().response_modal_data.is_some());
    assert_eq!(
        handles.notifier.last().expect("notification").message,
        "Loaded"
    );

    executor.close_response_modal();
    assert!(!executor.state().response_modal_open);
    assert!(executor.state().response_modal_data.is_none());
}

#[tokio::test]
async fn named_downloads_fetch_and_broadcast() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("export")]);
    executor.set_selection(single_selection());
    let mut events = handles.bus.subscribe(None);
    handles.http.push_reply(json_reply(
        200,
        &json!({"download": {"url": "/files/9", "name": "report.xlsx"}, "message": "Exported"}),
    ));

    let outcome = executor.handle_action_click("export").await.expect("invoke");

    assert_eq!(
        outcome,
        Some(DispatchOutcome::NamedDownload {
            file_name: "report.xlsx".to_string(),
        })
    );
    let fetched = handles.downloads.fetched();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].url, "/files/9");
    assert_eq!(events.drain_ready().len(), 1);
}

#[tokio::test]
async fn redirects_branch_on_browsing_context() {
    let (mut executor, handles) = executor_with(vec![
        unconfirmed_action("open-docs"),
        unconfirmed_action("leave"),
    ]);
    executor.set_selection(single_selection());
    let mut events = handles.bus.subscribe(None);

    handles.http.push_reply(json_reply(
        200,
        &json!({"redirect": {"url": "https://docs.test", "openInNewTab": true}}),
    ));
    let outcome = executor.handle_action_click("open-docs").await.expect("invoke");
    assert_eq!(outcome, Some(DispatchOutcome::Redirected { new_tab: true }));
    assert_eq!(events.drain_ready().len(), 1);

    handles.http.push_reply(json_reply(
        200,
        &json!({"redirect": {"url": "https://away.test"}}),
    ));
    let outcome = executor.handle_action_click("leave").await.expect("invoke");
    assert_eq!(outcome, Some(DispatchOutcome::Redirected { new_tab: false }));
    // The page is about to unload: no completion broadcast.
    assert!(events.drain_ready().is_empty());

    assert_eq!(
        handles.router.calls(),
        vec![
            RouteCall::Open("https://docs.test".to_string()),
            RouteCall::Replace("https://away.test".to_string()),
        ]
    );
}

#[tokio::test]
async fn visits_navigate_in_app_with_options() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("view")]);
    executor.set_selection(single_selection());
    handles.http.push_reply(json_reply(
        200,
        &json!({"visit": {"path": "/resources/posts", "options": {"page": "2"}}, "message": "Going"}),
    ));

    let outcome = executor.handle_action_click("view").await.expect("invoke");

    assert_eq!(
        outcome,
        Some(DispatchOutcome::Visited {
            path: "/resources/posts?page=2".to_string(),
        })
    );
    assert_eq!(
        handles.router.calls(),
        vec![RouteCall::Visit("/resources/posts?page=2".to_string())]
    );
}

#[tokio::test]
async fn side_channel_events_broadcast_without_short_circuiting() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("refresh")]);
    executor.set_selection(single_selection());
    let mut events = handles.bus.subscribe(None);
    handles.http.push_reply(json_reply(
        200,
        &json!({"event": {"key": "metrics-refresh", "payload": {"range": 30}}, "message": "Ok"}),
    ));

    let outcome = executor.handle_action_click("refresh").await.expect("invoke");

    assert_eq!(outcome, Some(DispatchOutcome::Message));
    let broadcast = events.drain_ready();
    assert_eq!(broadcast.len(), 2);
    assert_eq!(broadcast[0].event.kind(), "side_channel");
    assert_eq!(broadcast[1].event.kind(), "action_executed");
}

#[tokio::test]
async fn cancel_dismisses_the_prompt_and_resets_the_action() {
    let (mut executor, handles) = executor_with(vec![action("publish")]);
    executor.set_selection(single_selection());

    executor.handle_action_click("publish").await.expect("invoke");
    assert!(executor.state().confirmation_open);

    executor.cancel();
    assert!(!executor.state().confirmation_open);
    assert!(executor.selected_action().is_none());

    let error = executor.execute().await.expect_err("nothing selected");
    assert!(matches!(error, ActionError::NoActionSelected));
    assert!(handles.http.requests().is_empty());
}

#[tokio::test]
async fn default_branch_shows_the_generic_success_message() {
    let (mut executor, handles) = executor_with(vec![unconfirmed_action("publish")]);
    executor.set_selection(single_selection());
    handles.http.push_reply(json_reply(200, &json!({})));

    executor.handle_action_click("publish").await.expect("invoke");

    let last = handles.notifier.last().expect("notification");
    assert_eq!(last.kind, NotificationKind::Success);
    assert_eq!(last.message, "The action was executed successfully.");
}
