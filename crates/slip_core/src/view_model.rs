use crate::{LinkStatus, PaymentRecord, SessionMode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: SessionMode,
    pub local: PaymentRecord,
    pub imported: Option<PaymentRecord>,
    pub link_status: LinkStatus,
    pub generated_link: Option<String>,
    pub is_link_generating: bool,
    pub has_failed_to_generate_link: bool,
    pub is_link_invalid: bool,
    pub has_page_loaded: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// The record the slip is drawn from: the imported one when viewing a share link.
    pub fn displayed_record(&self) -> &PaymentRecord {
        self.imported.as_ref().unwrap_or(&self.local)
    }
}
