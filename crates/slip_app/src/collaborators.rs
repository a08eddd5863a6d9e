use slip_core::PaymentRecord;

/// Draws the payment slip (barcode and form) for a record.
pub trait SlipRenderer: Send + Sync {
    fn render(&self, record: &PaymentRecord);
}

/// Focuses the link field, selects it, and copies the link.
pub trait LinkClipboard: Send + Sync {
    fn copy(&self, link: &str);
}
