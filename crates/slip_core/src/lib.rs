//! Payment-slip core: record model, amount and text normalization, share-token
//! encoding, and the pure state machine behind the form.
mod amount;
mod effect;
mod msg;
mod record;
mod state;
mod text;
mod token;
mod update;
mod view_model;

pub use amount::{normalize_amount, MAX_AMOUNT_LEN};
pub use effect::Effect;
pub use msg::Msg;
pub use record::{PaymentRecord, TextField, DEFAULT_MODEL};
pub use state::{AppState, LinkStatus, RequestId, SessionInit, SessionMode, StalePolicy};
pub use text::{deburr, truncate_chars};
pub use token::{
    share_token_from_address, share_url, ShareTokenCodec, ShareUrlError, TokenDecodeError,
    SHARE_QUERY_KEY,
};
pub use update::update;
pub use view_model::AppViewModel;
