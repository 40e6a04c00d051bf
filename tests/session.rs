//! End-to-end runs over a real data directory: publish, reopen, toggle the
//! theme, export, and generate through a scripted HTTP transport.

use chrono::NaiveDate;
use mudawwana::generation::{
    GeminiClient, GeminiSettings, GenerationError, HttpReply, Transport,
};
use mudawwana::render;
use mudawwana::session::{Session, SessionOptions};
use mudawwana::storage::{FileStorage, Storage};
use mudawwana::store::POSTS_KEY;
use mudawwana::theme::{THEME_KEY, Theme};
use mudawwana::types::Category;
use mudawwana::view::View;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Session<FileStorage> {
    Session::open(FileStorage::new(dir.path()), SessionOptions::default()).unwrap()
}

/// Answers every request with one canned reply and records what was sent.
struct Scripted {
    reply: HttpReply,
    sent: RefCell<Vec<(String, String, Value)>>,
}

impl Scripted {
    fn answering(text: &str) -> Self {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        Self {
            reply: HttpReply {
                status: 200,
                body: body.to_string(),
            },
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for &Scripted {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        payload: &Value,
    ) -> Result<HttpReply, GenerationError> {
        self.sent
            .borrow_mut()
            .push((url.to_string(), api_key.to_string(), payload.clone()));
        Ok(self.reply.clone())
    }
}

fn settings_with_key() -> GeminiSettings {
    GeminiSettings {
        api_key: Some("test-key".to_string()),
        ..GeminiSettings::default()
    }
}

#[test]
fn fresh_directory_is_seeded_and_mirrored() {
    let tmp = TempDir::new().unwrap();
    let session = open(&tmp);

    assert_eq!(session.posts().len(), 3);
    assert_eq!(session.theme(), Theme::Light);
    assert_eq!(session.view(), &View::Listing);

    let storage = FileStorage::new(tmp.path());
    let stored: Vec<Value> =
        serde_json::from_str(&storage.get_item(POSTS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
}

#[test]
fn published_post_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(&tmp);

    session.open_authoring();
    let draft = session.draft_mut();
    draft.title = "مقال جديد".to_string();
    draft.summary = "ملخص".to_string();
    draft.content = "الفقرة الأولى\nالفقرة الثانية".to_string();
    draft.category = Category::Entrepreneurship;
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let post = session.submit_on(today).unwrap();
    assert_eq!(session.view(), &View::Listing);

    let reopened = open(&tmp);
    assert_eq!(reopened.posts().len(), 4);
    let first = &reopened.posts()[0];
    assert_eq!(first, &post);
    assert_eq!(first.date, today);
    assert_eq!(first.author, "المدير");
    assert!(!first.is_draft);
    assert_eq!(first.paragraphs().count(), 2);
}

#[test]
fn stored_json_uses_camel_case_keys() {
    let tmp = TempDir::new().unwrap();
    open(&tmp);
    let raw = fs::read_to_string(tmp.path().join(POSTS_KEY)).unwrap();
    assert!(raw.contains("\"imageUrl\""));
    assert!(raw.contains("\"isDraft\""));
}

#[test]
fn corrupt_posts_fall_back_to_defaults_and_are_replaced() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(POSTS_KEY), "{ not json").unwrap();

    let session = open(&tmp);
    assert_eq!(session.posts().len(), 3);

    let raw = fs::read_to_string(tmp.path().join(POSTS_KEY)).unwrap();
    let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 3);
}

#[test]
fn theme_toggle_persists() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(&tmp);
    assert_eq!(session.toggle_theme().unwrap(), Theme::Dark);

    assert_eq!(open(&tmp).theme(), Theme::Dark);
}

#[test]
fn unknown_theme_value_reads_as_light() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(THEME_KEY), "sepia").unwrap();
    assert_eq!(open(&tmp).theme(), Theme::Light);
}

#[test]
fn search_narrows_listing_and_stats_stay_global() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(&tmp);

    session.search("RUST");
    let visible = session.visible_posts();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].category, Category::Programming);

    let stats = session.stats();
    assert_eq!(stats.total_posts, 3);
    assert_eq!(stats.total_views, 375);
    assert_eq!(stats.drafts_count, 0);
}

#[test]
fn autofill_through_gemini_client_then_publish() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(&tmp);
    let transport = Scripted::answering(
        r#"{"title":"الذكاء الاصطناعي اليوم","summary":"لمحة سريعة","content":"أولاً\nثانياً"}"#,
    );
    let client = GeminiClient::new(settings_with_key(), &transport);

    session.open_authoring();
    session.draft_mut().title = "الذكاء الاصطناعي".to_string();
    session.autofill(&client).unwrap();

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    let (url, key, payload) = &sent[0];
    assert!(url.ends_with("/v1beta/models/gemini-3-flash-preview:generateContent"));
    assert_eq!(key, "test-key");
    let prompt = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("الذكاء الاصطناعي"));
    assert_eq!(
        payload["generationConfig"]["responseMimeType"],
        "application/json"
    );
    drop(sent);

    assert_eq!(session.form().draft().title, "الذكاء الاصطناعي اليوم");
    let post = session.submit().unwrap();
    assert_eq!(post.summary, "لمحة سريعة");
    assert_eq!(open(&tmp).posts()[0].id, post.id);
}

#[test]
fn autofill_without_credential_sends_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut session = open(&tmp);
    let transport = Scripted::answering("{}");
    let client = GeminiClient::new(GeminiSettings::default(), &transport);

    session.open_authoring();
    session.draft_mut().title = "Rust".to_string();
    let err = session.autofill(&client).unwrap_err();

    assert!(err.user_message().contains("API_KEY"));
    assert!(transport.sent.borrow().is_empty());
    assert_eq!(session.form().draft().title, "Rust");
    assert!(!session.form().is_generating());
}

#[test]
fn export_writes_current_theme() {
    let tmp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut session = open(&tmp);
    session.toggle_theme().unwrap();

    let pages = render::export(session.posts(), session.theme(), out.path()).unwrap();
    assert_eq!(pages, 4);
    let index = fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(index.contains(r#"class="dark""#));
}
