use std::sync::{Arc, Mutex, Once};

use pretty_assertions::assert_eq;
use slip_app::{Collaborators, Controller, LinkClipboard, PageContext, SlipRenderer};
use slip_core::{
    LinkStatus, PaymentRecord, SessionMode, ShareTokenCodec, StalePolicy, TextField,
};
use slip_engine::{
    FailureKind, KeyValueStore, LinkShortener, MemoryStore, PersistError, RecordStore,
    ShortenError, STORAGE_KEY,
};

const ORIGIN: &str = "https://uplatimi.online";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(slip_logging::initialize_for_tests);
}

#[derive(Clone, Default)]
struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<PaymentRecord>>>,
}

impl RecordingRenderer {
    fn take(&self) -> Vec<PaymentRecord> {
        self.rendered.lock().unwrap().drain(..).collect()
    }
}

impl SlipRenderer for RecordingRenderer {
    fn render(&self, record: &PaymentRecord) {
        self.rendered.lock().unwrap().push(record.clone());
    }
}

#[derive(Clone, Default)]
struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl LinkClipboard for RecordingClipboard {
    fn copy(&self, link: &str) {
        self.copied.lock().unwrap().push(link.to_string());
    }
}

struct FakeShortener {
    result: Result<String, ShortenError>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeShortener {
    fn ok(link: &str) -> Self {
        Self {
            result: Ok(link.to_string()),
            requested: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            result: Err(ShortenError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            }),
            requested: Arc::default(),
        }
    }
}

#[async_trait::async_trait]
impl LinkShortener for FakeShortener {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError> {
        self.requested.lock().unwrap().push(long_url.to_string());
        self.result.clone()
    }
}

struct Harness {
    controller: Controller<MemoryStore>,
    storage: MemoryStore,
    renderer: RecordingRenderer,
    clipboard: RecordingClipboard,
}

fn harness(storage: MemoryStore, address: Option<&str>, shortener: FakeShortener) -> Harness {
    harness_with_policy(storage, address, shortener, StalePolicy::Apply)
}

fn harness_with_policy(
    storage: MemoryStore,
    address: Option<&str>,
    shortener: FakeShortener,
    stale_policy: StalePolicy,
) -> Harness {
    init_logging();
    let renderer = RecordingRenderer::default();
    let clipboard = RecordingClipboard::default();
    let controller = Controller::new(
        RecordStore::new(storage.clone()),
        PageContext::from_address(address, ORIGIN, stale_policy),
        Collaborators {
            renderer: Box::new(renderer.clone()),
            clipboard: Box::new(clipboard.clone()),
            shortener: Arc::new(shortener),
        },
    );
    Harness {
        controller,
        storage,
        renderer,
        clipboard,
    }
}

fn stored_record(storage: &MemoryStore) -> Option<PaymentRecord> {
    storage
        .snapshot(STORAGE_KEY)
        .map(|json| parse_stored(&json))
}

fn parse_stored(json: &str) -> PaymentRecord {
    RecordStore::new(MemoryStore::with_entry(STORAGE_KEY, json)).load()
}

fn shared_address(record: &PaymentRecord) -> String {
    format!("{ORIGIN}/?p={}", ShareTokenCodec::encode(record).unwrap())
}

#[test]
fn fresh_load_then_amount_edit_persists_canonical_amount() {
    let mut h = harness(MemoryStore::new(), None, FakeShortener::ok("unused"));
    assert_eq!(h.controller.view().local, PaymentRecord::default());
    assert_eq!(h.renderer.take(), vec![PaymentRecord::default()]);
    assert_eq!(h.storage.snapshot(STORAGE_KEY), None);

    h.controller.on_amount_edited("12,5");

    let stored = stored_record(&h.storage).expect("record stored");
    assert_eq!(stored.amount, "12.5");
    assert_eq!(stored, h.controller.view().local);
    assert_eq!(h.renderer.take(), vec![stored]);
}

#[test]
fn every_local_edit_writes_deburred_record() {
    let mut h = harness(MemoryStore::new(), None, FakeShortener::ok("unused"));

    h.controller.on_text_edited(TextField::ReceiverName, "Đurđa Šimić");
    h.controller.on_text_edited(TextField::Description, "Članarina za 2024.");

    let raw = h.storage.snapshot(STORAGE_KEY).unwrap();
    assert!(raw.is_ascii());
    let stored = stored_record(&h.storage).unwrap();
    assert_eq!(stored.receiver_name, "Durda Simic");
    assert_eq!(stored.description, "Clanarina za 2024.");
    assert_eq!(stored, h.controller.view().local);
}

#[test]
fn startup_uses_previously_stored_record() {
    let storage = MemoryStore::with_entry(
        STORAGE_KEY,
        r#"{"amount":"3.50","iban":"HR99","model":"HR01"}"#,
    );
    let h = harness(storage, None, FakeShortener::ok("unused"));
    let local = h.controller.view().local;
    assert_eq!(local.amount, "3.50");
    assert_eq!(local.model, "HR01");
}

#[test]
fn corrupt_storage_falls_back_to_default() {
    let storage = MemoryStore::with_entry(STORAGE_KEY, "{{{");
    let h = harness(storage, None, FakeShortener::ok("unused"));
    assert_eq!(h.controller.view().local, PaymentRecord::default());
}

#[test]
fn share_link_populates_imported_record_and_renders_it() {
    let shared = PaymentRecord {
        amount: "10".to_string(),
        iban: "HR123".to_string(),
        ..PaymentRecord::default()
    };
    let storage = MemoryStore::new();
    let h = harness(storage, Some(&shared_address(&shared)), FakeShortener::ok("unused"));

    let view = h.controller.view();
    assert_eq!(view.mode, SessionMode::Viewing);
    assert_eq!(view.imported, Some(shared.clone()));
    assert_eq!(view.local, PaymentRecord::default());
    assert_eq!(h.renderer.take(), vec![shared]);
    assert_eq!(h.storage.snapshot(STORAGE_KEY), None);
}

#[test]
fn imported_amount_edit_never_touches_storage_or_local_record() {
    let local_json = r#"{"amount":"1","iban":"HR555"}"#;
    let storage = MemoryStore::with_entry(STORAGE_KEY, local_json);
    let shared = PaymentRecord {
        amount: "10".to_string(),
        ..PaymentRecord::default()
    };
    let mut h = harness(storage, Some(&shared_address(&shared)), FakeShortener::ok("unused"));
    let local_before = h.controller.view().local;
    h.renderer.take();

    h.controller.on_imported_amount_edited("15,75");
    h.controller.on_amount_edited("16");
    h.controller.on_text_edited(TextField::Iban, "HR000");

    assert_eq!(h.storage.snapshot(STORAGE_KEY).as_deref(), Some(local_json));
    assert_eq!(h.controller.view().local, local_before);
    assert_eq!(h.controller.view().imported.unwrap().amount, "16");
    let rendered: Vec<_> = h.renderer.take().into_iter().map(|r| r.amount).collect();
    assert_eq!(rendered, vec!["15.75".to_string(), "16".to_string()]);
}

#[test]
fn invalid_share_link_is_flagged_and_page_behaves_as_editing() {
    let address = format!("{ORIGIN}/?p=bm90IGpzb24");
    let mut h = harness(MemoryStore::new(), Some(&address), FakeShortener::ok("unused"));

    let view = h.controller.view();
    assert!(view.is_link_invalid);
    assert!(view.has_page_loaded);
    assert_eq!(view.mode, SessionMode::Editing);
    assert_eq!(view.imported, None);

    h.controller.on_amount_edited("2");
    assert_eq!(stored_record(&h.storage).unwrap().amount, "2");
}

#[tokio::test]
async fn generate_link_success_stores_and_copies_link() {
    let shortener = FakeShortener::ok("https://uplatimi.online/na/xY1");
    let requested = Arc::clone(&shortener.requested);
    let mut h = harness(MemoryStore::new(), None, shortener);
    h.controller.on_text_edited(TextField::Iban, "HR1210010051863000160");

    let status = h.controller.generate_link().await;
    assert_eq!(status, LinkStatus::Generated);
    let view = h.controller.view();
    assert_eq!(
        view.generated_link.as_deref(),
        Some("https://uplatimi.online/na/xY1")
    );
    assert!(!view.is_link_generating);

    let long_urls = requested.lock().unwrap().clone();
    assert_eq!(long_urls.len(), 1);
    let token = slip_core::share_token_from_address(&long_urls[0]).unwrap();
    assert_eq!(ShareTokenCodec::decode(&token).unwrap(), view.local);

    assert!(h.controller.on_copy_link());
    assert_eq!(
        h.clipboard.copied.lock().unwrap().clone(),
        vec!["https://uplatimi.online/na/xY1".to_string()]
    );
}

#[tokio::test]
async fn generate_link_failure_raises_flag_and_clears_loading() {
    let mut h = harness(MemoryStore::new(), None, FakeShortener::failing());

    let status = h.controller.generate_link().await;
    assert_eq!(status, LinkStatus::GenerationFailed);
    let view = h.controller.view();
    assert!(view.has_failed_to_generate_link);
    assert!(!view.is_link_generating);
    assert_eq!(view.generated_link, None);
    assert!(!h.controller.on_copy_link());
    assert!(h.clipboard.copied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn retry_after_failure_is_user_driven() {
    let mut h = harness(MemoryStore::new(), None, FakeShortener::failing());
    assert_eq!(h.controller.generate_link().await, LinkStatus::GenerationFailed);

    let pending = h.controller.begin_generate_link().expect("request");
    assert!(h.controller.view().is_link_generating);
    h.controller
        .complete_generate_link(pending.request_id, Ok("https://short/ok".to_string()));
    assert_eq!(h.controller.view().link_status, LinkStatus::Generated);
}

#[tokio::test]
async fn local_edit_after_generation_clears_link() {
    let mut h = harness(MemoryStore::new(), None, FakeShortener::ok("https://short/1"));
    h.controller.generate_link().await;
    assert!(h.controller.view().generated_link.is_some());

    h.controller.on_amount_edited("5");
    let view = h.controller.view();
    assert_eq!(view.generated_link, None);
    assert_eq!(view.link_status, LinkStatus::Idle);
}

#[test]
fn overlapping_requests_last_response_wins() {
    let mut h = harness(MemoryStore::new(), None, FakeShortener::ok("unused"));
    let first = h.controller.begin_generate_link().unwrap();
    h.controller.on_amount_edited("42");
    let second = h.controller.begin_generate_link().unwrap();
    assert_ne!(first.long_url, second.long_url);

    h.controller
        .complete_generate_link(second.request_id, Ok("https://short/new".to_string()));
    h.controller
        .complete_generate_link(first.request_id, Ok("https://short/old".to_string()));
    assert_eq!(
        h.controller.view().generated_link.as_deref(),
        Some("https://short/old")
    );
}

#[test]
fn discard_policy_keeps_latest_link() {
    let mut h = harness_with_policy(
        MemoryStore::new(),
        None,
        FakeShortener::ok("unused"),
        StalePolicy::Discard,
    );
    let first = h.controller.begin_generate_link().unwrap();
    let second = h.controller.begin_generate_link().unwrap();

    h.controller
        .complete_generate_link(second.request_id, Ok("https://short/new".to_string()));
    h.controller
        .complete_generate_link(first.request_id, Ok("https://short/old".to_string()));
    assert_eq!(
        h.controller.view().generated_link.as_deref(),
        Some("https://short/new")
    );
}

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::StorageDir("read-only".to_string()))
    }
}

#[test]
fn storage_write_failure_does_not_abort_edit() {
    init_logging();
    let renderer = RecordingRenderer::default();
    let mut controller = Controller::new(
        RecordStore::new(FailingStore),
        PageContext::from_address(None, ORIGIN, StalePolicy::Apply),
        Collaborators {
            renderer: Box::new(renderer.clone()),
            clipboard: Box::new(RecordingClipboard::default()),
            shortener: Arc::new(FakeShortener::ok("unused")),
        },
    );
    renderer.take();

    controller.on_amount_edited("8");
    assert_eq!(controller.view().local.amount, "8");
    assert_eq!(renderer.take().len(), 1);
}
