use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;
use url::Url;

use crate::PaymentRecord;

/// Name of the address query parameter carrying a share token.
pub const SHARE_QUERY_KEY: &str = "p";

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("share token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("share token does not contain a payment record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Reversible, URL-safe text encoding of a whole [`PaymentRecord`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ShareTokenCodec;

impl ShareTokenCodec {
    pub fn encode(record: &PaymentRecord) -> Result<String, serde_json::Error> {
        let json = record.to_storage_json()?;
        Ok(TOKEN_ENGINE.encode(json.as_bytes()))
    }

    /// Decode a token produced by [`ShareTokenCodec::encode`].
    ///
    /// Standard-alphabet tokens (with `+`, `/` and padding) are accepted too,
    /// including ones where form decoding has turned `+` into a space.
    pub fn decode(token: &str) -> Result<PaymentRecord, TokenDecodeError> {
        let url_safe: String = token
            .trim()
            .chars()
            .map(|c| match c {
                '+' | ' ' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        let bytes = TOKEN_ENGINE.decode(url_safe.as_bytes())?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            // Older links were produced from Latin-1 text.
            Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
        };
        let record: PaymentRecord = serde_json::from_str(&text)?;
        Ok(record.sanitized())
    }
}

/// Extract the share token from a page address. An empty value counts as absent.
pub fn share_token_from_address(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == SHARE_QUERY_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Build `<origin>?p=<token>` for `record`.
pub fn share_url(origin: &str, record: &PaymentRecord) -> Result<String, ShareUrlError> {
    let token = ShareTokenCodec::encode(record)?;
    let mut url = Url::parse(origin)?;
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair(SHARE_QUERY_KEY, &token);
    Ok(url.into())
}

#[derive(Debug, Error)]
pub enum ShareUrlError {
    #[error("invalid page origin: {0}")]
    Origin(#[from] url::ParseError),
    #[error("failed to serialize payment record: {0}")]
    Serialize(#[from] serde_json::Error),
}
