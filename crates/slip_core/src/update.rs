use slip_logging::{slip_debug, slip_warn};

use crate::{AppState, Effect, Msg, SessionMode};

/// Pure update function: applies a message to state and returns any effects.
///
/// Local edits always come back as `PersistRecord` followed by `RenderSlip`, so
/// the caller can persist and redraw before handling the next message.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AmountEdited(raw) => match state.mode() {
            SessionMode::Editing => {
                state.edit_local(|record| record.set_amount(&raw));
                local_changed(&state)
            }
            SessionMode::Viewing => adjust_imported_amount(&mut state, &raw),
        },
        Msg::ImportedAmountEdited(raw) => adjust_imported_amount(&mut state, &raw),
        Msg::TextEdited { field, value } => match state.mode() {
            SessionMode::Editing => {
                state.edit_local(|record| record.set_text(field, &value));
                local_changed(&state)
            }
            SessionMode::Viewing => {
                // Shared records are read-only apart from the amount.
                slip_debug!("Ignoring edit of {} on a shared record", field.key());
                Vec::new()
            }
        },
        Msg::GenerateLinkClicked => match state.begin_link_request() {
            Some((request_id, long_url)) => vec![Effect::ShortenUrl {
                request_id,
                long_url,
            }],
            None => Vec::new(),
        },
        Msg::ShortenCompleted { request_id, result } => {
            if let Err(message) = &result {
                slip_warn!("Short link request {} failed: {}", request_id, message);
            }
            if !state.finish_link_request(request_id, result) {
                slip_debug!("Discarded stale short link response {}", request_id);
            }
            Vec::new()
        }
        Msg::CopyLinkClicked => match state.generated_link() {
            Some(link) => vec![Effect::CopyLink(link.to_string())],
            None => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn local_changed(state: &AppState) -> Vec<Effect> {
    vec![
        Effect::PersistRecord(state.local().clone()),
        Effect::RenderSlip(state.local().clone()),
    ]
}

fn adjust_imported_amount(state: &mut AppState, raw: &str) -> Vec<Effect> {
    if state.edit_imported(|record| record.set_amount(raw)) {
        state
            .imported()
            .map(|record| vec![Effect::RenderSlip(record.clone())])
            .unwrap_or_default()
    } else {
        Vec::new()
    }
}
