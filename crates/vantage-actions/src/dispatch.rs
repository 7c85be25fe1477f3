//! Response dispatch: the closed table of terminal UI effects.
//!
//! The server's response body matches exactly one of a fixed set of shapes,
//! checked in priority order. A side-channel `event` descriptor is broadcast
//! independently before the terminal branch is chosen. Any response carrying
//! a `danger` field downgrades the shared result message to an error
//! notification.

use vantage_api_models::{ActionDescriptor, ActionResponse, ResponseType, VisitTarget};
use vantage_events::Event;

use crate::capability::{ActionContext, HttpReply};
use crate::error::{ActionError, ActionResult};
use crate::i18n::KEY_ACTION_EXECUTED;
use crate::state::ExecutionState;

/// Fallback filename when the attachment disposition names none.
const FALLBACK_FILE_NAME: &str = "unknown";

/// Which terminal branch of the dispatch table an invocation took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A binary attachment was saved locally.
    Attachment {
        /// Filename derived from the disposition header.
        file_name: String,
    },
    /// The response modal was opened with server-provided content.
    Modal,
    /// A server-named download was triggered.
    NamedDownload {
        /// Filename the download was saved under.
        file_name: String,
    },
    /// The targeted resources were deleted.
    Deleted,
    /// The browsing context was redirected.
    Redirected {
        /// Whether a new browsing context was opened.
        new_tab: bool,
    },
    /// A client-side navigation was performed.
    Visited {
        /// Resolved navigation target.
        path: String,
    },
    /// Only the result message was shown.
    Message,
}

enum DecodedBody {
    Binary {
        bytes: Vec<u8>,
        content_type: Option<String>,
        content_disposition: Option<String>,
    },
    Json(ActionResponse),
}

/// Interpret a successful reply and perform exactly one terminal UI effect.
pub(crate) fn dispatch(
    ctx: &ActionContext,
    state: &mut ExecutionState,
    action: &ActionDescriptor,
    resource: &str,
    reply: HttpReply,
) -> ActionResult<DispatchOutcome> {
    let mut body = match action.response_type {
        ResponseType::Binary => DecodedBody::Binary {
            bytes: reply.body,
            content_type: reply.content_type,
            content_disposition: reply.content_disposition,
        },
        ResponseType::Json => DecodedBody::Json(decode_json(&reply.body)?),
    };

    // Some servers wrap JSON-shaped results in a binary transport. Unwrap at
    // most once; a payload nested deeper dispatches as a plain attachment.
    if let DecodedBody::Binary {
        bytes,
        content_type: Some(content_type),
        content_disposition: None,
    } = &body
    {
        if content_type.starts_with("application/json") {
            body = DecodedBody::Json(decode_json(bytes)?);
        }
    }

    match body {
        DecodedBody::Binary {
            bytes,
            content_disposition,
            ..
        } => {
            let file_name = attachment_file_name(content_disposition.as_deref());
            ctx.downloads
                .save(&bytes, &file_name)
                .map_err(|source| ActionError::Effect {
                    operation: "save attachment",
                    source,
                })?;
            emit_executed(ctx, resource, action);
            Ok(DispatchOutcome::Attachment { file_name })
        }
        DecodedBody::Json(response) => dispatch_json(ctx, state, action, resource, response),
    }
}

fn dispatch_json(
    ctx: &ActionContext,
    state: &mut ExecutionState,
    action: &ActionDescriptor,
    resource: &str,
    response: ActionResponse,
) -> ActionResult<DispatchOutcome> {
    // Independent of the terminal branch below.
    if let Some(event) = &response.event {
        ctx.bus.publish(Event::SideChannel {
            key: event.key.clone(),
            payload: event.payload.clone(),
        });
    }

    if let Some(modal) = response.modal.clone() {
        state.response_modal_data = Some(modal);
        show_result_message(ctx, &response);
        state.response_modal_open = true;
        return Ok(DispatchOutcome::Modal);
    }

    if let Some(download) = &response.download {
        show_result_message(ctx, &response);
        ctx.downloads
            .fetch(&download.url, &download.name)
            .map_err(|source| ActionError::Effect {
                operation: "fetch download",
                source,
            })?;
        emit_executed(ctx, resource, action);
        return Ok(DispatchOutcome::NamedDownload {
            file_name: download.name.clone(),
        });
    }

    if response.deleted {
        show_result_message(ctx, &response);
        emit_executed(ctx, resource, action);
        return Ok(DispatchOutcome::Deleted);
    }

    if let Some(redirect) = &response.redirect {
        if redirect.open_in_new_tab {
            ctx.router.open(&redirect.url);
            emit_executed(ctx, resource, action);
            return Ok(DispatchOutcome::Redirected { new_tab: true });
        }
        // No completion broadcast: the page is about to unload.
        ctx.router.replace(&redirect.url);
        return Ok(DispatchOutcome::Redirected { new_tab: false });
    }

    if let Some(visit) = &response.visit {
        show_result_message(ctx, &response);
        let path = visit_url(visit);
        ctx.router.visit(&path);
        return Ok(DispatchOutcome::Visited { path });
    }

    show_result_message(ctx, &response);
    emit_executed(ctx, resource, action);
    Ok(DispatchOutcome::Message)
}

fn decode_json(bytes: &[u8]) -> ActionResult<ActionResponse> {
    serde_json::from_slice(bytes).map_err(|source| ActionError::MalformedResponse { source })
}

fn show_result_message(ctx: &ActionContext, response: &ActionResponse) {
    if let Some(danger) = &response.danger {
        ctx.notifier.error(danger);
        return;
    }
    let message = response
        .message
        .clone()
        .unwrap_or_else(|| ctx.translations.text(KEY_ACTION_EXECUTED));
    ctx.notifier.success(&message);
}

fn emit_executed(ctx: &ActionContext, resource: &str, action: &ActionDescriptor) {
    ctx.bus.publish(Event::ActionExecuted {
        resource: resource.to_string(),
        action: action.uri_key.clone(),
    });
}

/// Derive a filename from an attachment-disposition header value.
fn attachment_file_name(disposition: Option<&str>) -> String {
    disposition
        .and_then(|raw| {
            raw.split(';')
                .filter_map(|part| part.trim().strip_prefix("filename="))
                .map(|name| name.trim_matches('"'))
                .find(|name| !name.is_empty())
        })
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}

fn visit_url(visit: &VisitTarget) -> String {
    if visit.options.is_empty() {
        return visit.path.clone();
    }
    let query = visit
        .options
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{query}", visit.path)
}
