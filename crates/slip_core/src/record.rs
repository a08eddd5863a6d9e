use serde::{Deserialize, Serialize};

use crate::amount::{normalize_amount, MAX_AMOUNT_LEN};
use crate::text::{deburr, truncate_chars};

/// Payment model used when nothing else has been entered.
pub const DEFAULT_MODEL: &str = "HR99";

/// A single payment slip, as edited by the user or received through a share link.
///
/// Field names serialize in camelCase; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRecord {
    pub amount: String,
    pub purpose: String,
    pub description: String,
    pub iban: String,
    pub model: String,
    pub reference: String,
    pub receiver_name: String,
    pub receiver_street: String,
    pub receiver_place: String,
}

impl Default for PaymentRecord {
    fn default() -> Self {
        Self {
            amount: String::new(),
            purpose: String::new(),
            description: String::new(),
            iban: String::new(),
            model: DEFAULT_MODEL.to_string(),
            reference: String::new(),
            receiver_name: String::new(),
            receiver_street: String::new(),
            receiver_place: String::new(),
        }
    }
}

/// Every editable free-text field of a [`PaymentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Purpose,
    Description,
    Iban,
    Model,
    Reference,
    ReceiverName,
    ReceiverStreet,
    ReceiverPlace,
}

impl TextField {
    pub const ALL: [TextField; 8] = [
        TextField::Purpose,
        TextField::Description,
        TextField::Iban,
        TextField::Model,
        TextField::Reference,
        TextField::ReceiverName,
        TextField::ReceiverStreet,
        TextField::ReceiverPlace,
    ];

    /// Maximum length in characters, taken from the HUB3 slip layout.
    pub fn limit(self) -> usize {
        match self {
            TextField::Purpose => 4,
            TextField::Description => 35,
            TextField::Iban => 21,
            TextField::Model => 4,
            TextField::Reference => 22,
            TextField::ReceiverName => 25,
            TextField::ReceiverStreet => 25,
            TextField::ReceiverPlace => 27,
        }
    }

    /// The serialized (camelCase) field name.
    pub fn key(self) -> &'static str {
        match self {
            TextField::Purpose => "purpose",
            TextField::Description => "description",
            TextField::Iban => "iban",
            TextField::Model => "model",
            TextField::Reference => "reference",
            TextField::ReceiverName => "receiverName",
            TextField::ReceiverStreet => "receiverStreet",
            TextField::ReceiverPlace => "receiverPlace",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl PaymentRecord {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Purpose => &self.purpose,
            TextField::Description => &self.description,
            TextField::Iban => &self.iban,
            TextField::Model => &self.model,
            TextField::Reference => &self.reference,
            TextField::ReceiverName => &self.receiver_name,
            TextField::ReceiverStreet => &self.receiver_street,
            TextField::ReceiverPlace => &self.receiver_place,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Purpose => &mut self.purpose,
            TextField::Description => &mut self.description,
            TextField::Iban => &mut self.iban,
            TextField::Model => &mut self.model,
            TextField::Reference => &mut self.reference,
            TextField::ReceiverName => &mut self.receiver_name,
            TextField::ReceiverStreet => &mut self.receiver_street,
            TextField::ReceiverPlace => &mut self.receiver_place,
        }
    }

    /// Store `value` deburred and cut to the field's limit.
    pub fn set_text(&mut self, field: TextField, value: &str) {
        *self.text_mut(field) = truncate_chars(&deburr(value), field.limit());
    }

    /// Store the canonical form of `raw`, cut to [`MAX_AMOUNT_LEN`].
    pub fn set_amount(&mut self, raw: &str) {
        self.amount = truncate_chars(&normalize_amount(raw), MAX_AMOUNT_LEN);
    }

    /// Re-apply every field invariant. A record that already satisfies them is
    /// returned unchanged.
    pub fn sanitized(mut self) -> Self {
        let amount = std::mem::take(&mut self.amount);
        self.set_amount(&amount);
        for field in TextField::ALL {
            let value = std::mem::take(self.text_mut(field));
            self.set_text(field, &value);
        }
        self
    }

    /// Compact JSON with diacritics stripped; the form used for storage and share tokens.
    pub fn to_storage_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self).map(|json| deburr(&json))
    }
}
