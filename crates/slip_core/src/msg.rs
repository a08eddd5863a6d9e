use crate::{RequestId, TextField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User typed into the amount input (raw, un-normalized text).
    AmountEdited(String),
    /// User typed into one of the free-text inputs.
    TextEdited { field: TextField, value: String },
    /// Payer adjusted the amount of a record opened from a share link.
    ImportedAmountEdited(String),
    /// User asked for a short link to the current local record.
    GenerateLinkClicked,
    /// The shortening service answered (or failed) for a request.
    ShortenCompleted {
        request_id: RequestId,
        result: Result<String, String>,
    },
    /// User clicked Copy next to the generated link.
    CopyLinkClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
