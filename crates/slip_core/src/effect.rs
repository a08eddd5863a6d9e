use crate::{PaymentRecord, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the local record to durable storage.
    PersistRecord(PaymentRecord),
    /// Redraw the payment slip for this record.
    RenderSlip(PaymentRecord),
    /// Ask the shortening service for a short link to `long_url`.
    ShortenUrl { request_id: RequestId, long_url: String },
    /// Put the generated link on the clipboard.
    CopyLink(String),
}
