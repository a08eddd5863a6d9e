use std::sync::Arc;

use slip_core::{
    share_token_from_address, update, AppState, AppViewModel, Effect, LinkStatus, Msg,
    RequestId, SessionInit, StalePolicy, TextField,
};
use slip_engine::{KeyValueStore, LinkShortener, RecordStore, ShortenError};
use slip_logging::{slip_debug, slip_error, slip_info};

use crate::collaborators::{LinkClipboard, SlipRenderer};

/// Everything the page knows about itself at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub origin: String,
    pub share_token: Option<String>,
    pub stale_policy: StalePolicy,
}

impl PageContext {
    /// Page opened at `address` (if any); the share token is taken from its query.
    pub fn from_address(address: Option<&str>, origin: &str, stale_policy: StalePolicy) -> Self {
        Self {
            origin: origin.to_string(),
            share_token: address.and_then(share_token_from_address),
            stale_policy,
        }
    }
}

pub struct Collaborators {
    pub renderer: Box<dyn SlipRenderer>,
    pub clipboard: Box<dyn LinkClipboard>,
    pub shortener: Arc<dyn LinkShortener>,
}

/// A shortening request that has been registered but not sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingShorten {
    pub request_id: RequestId,
    pub long_url: String,
}

/// Drives the form: every handler runs its side effects (persist, render,
/// copy) before returning, so the next handler sees the stored result.
pub struct Controller<S> {
    state: AppState,
    store: RecordStore<S>,
    renderer: Box<dyn SlipRenderer>,
    clipboard: Box<dyn LinkClipboard>,
    shortener: Arc<dyn LinkShortener>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Load the local record, decode the share token once, and draw the first slip.
    pub fn new(store: RecordStore<S>, page: PageContext, collaborators: Collaborators) -> Self {
        let local = store.load();
        let (state, effects) = AppState::initialize(SessionInit {
            local,
            share_token: page.share_token,
            origin: page.origin,
            stale_policy: page.stale_policy,
        });
        let mut controller = Self {
            state,
            store,
            renderer: collaborators.renderer,
            clipboard: collaborators.clipboard,
            shortener: collaborators.shortener,
        };
        controller.run_effects(effects);
        controller
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn shortener(&self) -> Arc<dyn LinkShortener> {
        Arc::clone(&self.shortener)
    }

    /// Amount input changed. Edits the local record (persist, render, drop the
    /// short link), or the imported amount while a shared record is open.
    pub fn on_amount_edited(&mut self, raw: &str) {
        self.dispatch(Msg::AmountEdited(raw.to_string()));
    }

    /// Text input changed. Persists, renders, and drops the short link; ignored
    /// while a shared record is open.
    pub fn on_text_edited(&mut self, field: TextField, value: &str) {
        self.dispatch(Msg::TextEdited {
            field,
            value: value.to_string(),
        });
    }

    /// Payer adjusted the amount of the shared record. Renders only; nothing is stored.
    pub fn on_imported_amount_edited(&mut self, raw: &str) {
        self.dispatch(Msg::ImportedAmountEdited(raw.to_string()));
    }

    /// Copy the generated link. Returns false when there is nothing to copy.
    pub fn on_copy_link(&mut self) -> bool {
        self.dispatch(Msg::CopyLinkClicked).copied
    }

    /// Register a request for a short link to the local record.
    ///
    /// Returns `None` when no request could be built (the state then shows the failure).
    pub fn begin_generate_link(&mut self) -> Option<PendingShorten> {
        self.dispatch(Msg::GenerateLinkClicked).pending
    }

    /// Apply the outcome of a request started with [`Controller::begin_generate_link`].
    pub fn complete_generate_link(
        &mut self,
        request_id: RequestId,
        result: Result<String, ShortenError>,
    ) {
        self.dispatch(Msg::ShortenCompleted {
            request_id,
            result: result.map_err(|err| err.to_string()),
        });
    }

    /// Request a short link and wait for it. There is no retry; call again to retry.
    pub async fn generate_link(&mut self) -> LinkStatus {
        let Some(pending) = self.begin_generate_link() else {
            return self.state.link_status();
        };
        let shortener = self.shortener();
        let result = shortener.shorten(&pending.long_url).await;
        self.complete_generate_link(pending.request_id, result);
        self.state.link_status()
    }

    fn dispatch(&mut self, msg: Msg) -> EffectReport {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects)
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> EffectReport {
        let mut report = EffectReport::default();
        for effect in effects {
            match effect {
                Effect::PersistRecord(record) => {
                    if let Err(err) = self.store.save(&record) {
                        slip_error!("Failed to persist payment record: {}", err);
                    }
                }
                Effect::RenderSlip(record) => self.renderer.render(&record),
                Effect::ShortenUrl {
                    request_id,
                    long_url,
                } => {
                    slip_info!(
                        "ShortenUrl request_id={} url_len={}",
                        request_id,
                        long_url.len()
                    );
                    report.pending = Some(PendingShorten {
                        request_id,
                        long_url,
                    });
                }
                Effect::CopyLink(link) => {
                    slip_debug!("Copying link {}", link);
                    self.clipboard.copy(&link);
                    report.copied = true;
                }
            }
        }
        report
    }
}

#[derive(Debug, Default)]
struct EffectReport {
    pending: Option<PendingShorten>,
    copied: bool,
}
