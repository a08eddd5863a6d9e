use slip_logging::{slip_info, slip_warn};

use crate::token::{share_url, ShareTokenCodec};
use crate::view_model::AppViewModel;
use crate::{Effect, PaymentRecord};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Idle,
    Generating,
    Generated,
    GenerationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Editing the user's own, persisted record.
    #[default]
    Editing,
    /// Viewing a record opened from a share link.
    Viewing,
}

/// What to do with a shortening result that is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Apply every completion as it arrives; the last one wins.
    #[default]
    Apply,
    /// Drop completions for superseded requests or for a record edited since.
    Discard,
}

/// Explicit inputs for a new page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInit {
    /// Local record as loaded from storage (or the default).
    pub local: PaymentRecord,
    /// Share token from the page address, if any.
    pub share_token: Option<String>,
    /// Page origin the share URL is built on.
    pub origin: String,
    pub stale_policy: StalePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    local: PaymentRecord,
    imported: Option<PaymentRecord>,
    origin: String,
    link_status: LinkStatus,
    generated_link: Option<String>,
    link_invalid: bool,
    page_loaded: bool,
    next_request_id: RequestId,
    latest_request: Option<RequestId>,
    stale_policy: StalePolicy,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session. The share token is decoded here and never again.
    pub fn initialize(init: SessionInit) -> (Self, Vec<Effect>) {
        let mut state = Self {
            local: init.local,
            origin: init.origin,
            stale_policy: init.stale_policy,
            next_request_id: 1,
            page_loaded: true,
            dirty: true,
            ..Self::default()
        };

        if let Some(token) = init.share_token.as_deref() {
            match ShareTokenCodec::decode(token) {
                Ok(record) => {
                    slip_info!("Opened shared payment record");
                    state.imported = Some(record);
                }
                Err(err) => {
                    slip_warn!("Ignoring invalid share token: {}", err);
                    state.link_invalid = true;
                }
            }
        }

        let effects = vec![Effect::RenderSlip(state.displayed_record().clone())];
        (state, effects)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mode: self.mode(),
            local: self.local.clone(),
            imported: self.imported.clone(),
            link_status: self.link_status,
            generated_link: self.generated_link.clone(),
            is_link_generating: self.link_status == LinkStatus::Generating,
            has_failed_to_generate_link: self.link_status == LinkStatus::GenerationFailed,
            is_link_invalid: self.link_invalid,
            has_page_loaded: self.page_loaded,
            dirty: self.dirty,
        }
    }

    pub fn mode(&self) -> SessionMode {
        if self.imported.is_some() {
            SessionMode::Viewing
        } else {
            SessionMode::Editing
        }
    }

    pub fn local(&self) -> &PaymentRecord {
        &self.local
    }

    pub fn imported(&self) -> Option<&PaymentRecord> {
        self.imported.as_ref()
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link_status
    }

    pub fn generated_link(&self) -> Option<&str> {
        self.generated_link.as_deref()
    }

    pub fn displayed_record(&self) -> &PaymentRecord {
        self.imported.as_ref().unwrap_or(&self.local)
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Apply `edit` to the local record and invalidate any short link made for the old one.
    pub(crate) fn edit_local(&mut self, edit: impl FnOnce(&mut PaymentRecord)) {
        edit(&mut self.local);
        self.generated_link = None;
        match (self.link_status, self.stale_policy) {
            (LinkStatus::Generating, StalePolicy::Apply) => {}
            (_, StalePolicy::Discard) => {
                self.latest_request = None;
                self.link_status = LinkStatus::Idle;
            }
            _ => self.link_status = LinkStatus::Idle,
        }
        self.mark_dirty();
    }

    /// Apply `edit` to the imported record, if there is one.
    pub(crate) fn edit_imported(&mut self, edit: impl FnOnce(&mut PaymentRecord)) -> bool {
        match self.imported.as_mut() {
            Some(record) => {
                edit(record);
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Register a new shortening request for the local record.
    pub(crate) fn begin_link_request(&mut self) -> Option<(RequestId, String)> {
        let long_url = match share_url(&self.origin, &self.local) {
            Ok(url) => url,
            Err(err) => {
                slip_warn!("Cannot build share url from origin {:?}: {}", self.origin, err);
                self.link_status = LinkStatus::GenerationFailed;
                self.generated_link = None;
                self.mark_dirty();
                return None;
            }
        };
        let request_id = self.next_request_id.max(1);
        self.next_request_id = request_id + 1;
        self.latest_request = Some(request_id);
        self.link_status = LinkStatus::Generating;
        self.mark_dirty();
        Some((request_id, long_url))
    }

    /// Record the outcome of a shortening request. Returns false when it was discarded.
    pub(crate) fn finish_link_request(
        &mut self,
        request_id: RequestId,
        result: Result<String, String>,
    ) -> bool {
        if self.stale_policy == StalePolicy::Discard && self.latest_request != Some(request_id) {
            return false;
        }
        match result {
            Ok(link) => {
                self.generated_link = Some(link);
                self.link_status = LinkStatus::Generated;
            }
            Err(_) => {
                self.generated_link = None;
                self.link_status = LinkStatus::GenerationFailed;
            }
        }
        if self.latest_request == Some(request_id) {
            self.latest_request = None;
        }
        self.mark_dirty();
        true
    }
}
