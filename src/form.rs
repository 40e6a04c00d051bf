//! The authoring form: a mutable [`Draft`] plus the two things you can do
//! with it, publish it or have it filled in by a [`ContentGenerator`].

use crate::generation::{ContentGenerator, GeneratedContent, GenerationError};
use crate::storage::Storage;
use crate::store::{PostStore, StoreError};
use crate::types::{Category, Post};
use chrono::NaiveDate;
use thiserror::Error;

pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/seed/new/800/450";

/// Placeholder cover image for a fresh draft, varied by `seed`.
pub fn seeded_image_url(seed: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/800/450")
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("the {0} field is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("write a title or an idea for the post first")]
    MissingTopic,
    #[error("a generation request is already in progress")]
    Busy,
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl AutofillError {
    pub fn user_message(&self) -> String {
        match self {
            AutofillError::Generation(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Working copy of a post that has not been published yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: Category,
    pub image_url: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            content: String::new(),
            category: Category::default(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }
}

impl Draft {
    /// Title, summary and content must all be present.
    pub fn validate(&self) -> Result<(), FormError> {
        for (name, value) in [
            ("title", &self.title),
            ("summary", &self.summary),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Merge a generated suggestion. The title is only replaced by a
    /// non-empty one; summary and content are always replaced, with `""`
    /// standing in for anything the reply left out.
    pub fn apply(&mut self, generated: GeneratedContent) {
        if let Some(title) = generated.title.filter(|t| !t.is_empty()) {
            self.title = title;
        }
        self.summary = generated.summary.unwrap_or_default();
        self.content = generated.content.unwrap_or_default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthoringForm {
    draft: Draft,
    generating: bool,
}

impl AuthoringForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: Draft) -> Self {
        Self {
            draft,
            generating: false,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// True while an autofill request is outstanding; the trigger is
    /// disabled for as long as this holds.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Publish the draft through the store and start a fresh one.
    pub fn submit<S: Storage>(
        &mut self,
        store: &mut PostStore<S>,
        author: &str,
        today: NaiveDate,
    ) -> Result<Post, FormError> {
        self.draft.validate()?;
        let post = store.create(&self.draft, author, today)?;
        self.draft = Draft {
            image_url: seeded_image_url(&post.id),
            ..Draft::default()
        };
        Ok(post)
    }

    /// Ask `generator` to write the post, using the current title as the
    /// topic. On failure the draft is left exactly as it was.
    pub fn autofill(&mut self, generator: &impl ContentGenerator) -> Result<(), AutofillError> {
        if self.generating {
            return Err(AutofillError::Busy);
        }
        let topic = self.draft.title.trim().to_string();
        if topic.is_empty() {
            return Err(AutofillError::MissingTopic);
        }

        self.generating = true;
        let result = generator.generate(&topic);
        self.generating = false;

        match result {
            Ok(generated) => {
                self.draft.apply(generated);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "autofill failed, draft unchanged");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::tests::{FakeTransport, envelope, keyed};
    use crate::generation::{GeminiClient, GeminiSettings};
    use crate::storage::MemoryStorage;
    use std::cell::Cell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn filled() -> Draft {
        Draft {
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            content: "Body".to_string(),
            category: Category::Design,
            image_url: "https://example.com/cover.png".to_string(),
        }
    }

    #[test]
    fn submit_creates_and_resets() {
        let mut store = PostStore::load(MemoryStorage::new(), Vec::new()).unwrap();
        let mut form = AuthoringForm::with_draft(filled());

        let post = form.submit(&mut store, "المدير", today()).unwrap();
        assert_eq!(post.title, "Title");
        assert_eq!(post.category, Category::Design);
        assert_eq!(post.image_url, "https://example.com/cover.png");
        assert_eq!(store.posts()[0], post);

        let fresh = form.draft();
        assert!(fresh.title.is_empty() && fresh.summary.is_empty() && fresh.content.is_empty());
        assert_eq!(fresh.category, Category::default());
        assert_eq!(fresh.image_url, seeded_image_url(&post.id));
    }

    #[test]
    fn submit_requires_fields() {
        let mut store = PostStore::load(MemoryStorage::new(), Vec::new()).unwrap();
        let mut form = AuthoringForm::with_draft(Draft {
            summary: "   ".to_string(),
            ..filled()
        });
        let err = form.submit(&mut store, "a", today()).unwrap_err();
        assert!(matches!(err, FormError::MissingField("summary")));
        assert!(store.is_empty());
        assert_eq!(form.draft().title, "Title");
    }

    #[test]
    fn autofill_fills_all_three_fields() {
        let reply = r#"{"title":"مستقبل الذكاء الاصطناعي","summary":"نظرة عامة","content":"فقرة أولى\nفقرة ثانية"}"#;
        let transport = FakeTransport::ok(&envelope(reply));
        let client = GeminiClient::new(keyed(), &transport);
        let mut form = AuthoringForm::new();
        form.draft_mut().title = "الذكاء الاصطناعي".to_string();

        form.autofill(&client).unwrap();

        let draft = form.draft();
        assert_eq!(draft.title, "مستقبل الذكاء الاصطناعي");
        assert_eq!(draft.summary, "نظرة عامة");
        assert_eq!(draft.content, "فقرة أولى\nفقرة ثانية");
        assert!(!form.is_generating());
    }

    #[test]
    fn autofill_with_empty_object_keeps_title_and_clears_rest() {
        let transport = FakeTransport::ok(&envelope("{}"));
        let client = GeminiClient::new(keyed(), &transport);
        let mut form = AuthoringForm::with_draft(filled());
        form.draft_mut().title = "الذكاء الاصطناعي".to_string();

        form.autofill(&client).unwrap();

        assert_eq!(form.draft().title, "الذكاء الاصطناعي");
        assert_eq!(form.draft().summary, "");
        assert_eq!(form.draft().content, "");
    }

    #[test]
    fn autofill_ignores_empty_generated_title() {
        let mut draft = filled();
        draft.apply(GeneratedContent {
            title: Some(String::new()),
            summary: Some("s".to_string()),
            content: None,
        });
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.summary, "s");
        assert_eq!(draft.content, "");
    }

    #[test]
    fn autofill_needs_a_topic() {
        let transport = FakeTransport::ok(&envelope("{}"));
        let client = GeminiClient::new(keyed(), &transport);
        let mut form = AuthoringForm::new();
        assert!(matches!(form.autofill(&client), Err(AutofillError::MissingTopic)));
        assert_eq!(transport.calls.get(), 0);
    }

    #[test]
    fn autofill_failure_leaves_draft_untouched() {
        let transport = FakeTransport::ok(&envelope("not json"));
        let client = GeminiClient::new(keyed(), &transport);
        let mut form = AuthoringForm::with_draft(filled());

        let err = form.autofill(&client).unwrap_err();
        assert!(matches!(
            err,
            AutofillError::Generation(GenerationError::MalformedReply(_))
        ));
        assert_eq!(form.draft(), &filled());
        assert!(!form.is_generating());
    }

    #[test]
    fn autofill_without_credential_reports_distinct_message() {
        let transport = FakeTransport::ok(&envelope("{}"));
        let client = GeminiClient::new(GeminiSettings::default(), &transport);
        let mut form = AuthoringForm::with_draft(filled());

        let err = form.autofill(&client).unwrap_err();
        assert_eq!(
            err.user_message(),
            GenerationError::MissingCredential.user_message()
        );
        assert_eq!(transport.calls.get(), 0);
        assert_eq!(form.draft(), &filled());
    }

    struct Recording<'a> {
        seen_topic: &'a Cell<bool>,
    }

    impl ContentGenerator for Recording<'_> {
        fn generate(&self, topic: &str) -> Result<GeneratedContent, GenerationError> {
            assert_eq!(topic, "Title");
            self.seen_topic.set(true);
            Ok(GeneratedContent::default())
        }
    }

    #[test]
    fn autofill_sends_trimmed_title_as_topic() {
        let seen = Cell::new(false);
        let mut form = AuthoringForm::with_draft(Draft {
            title: "  Title ".to_string(),
            ..filled()
        });
        form.autofill(&Recording { seen_topic: &seen }).unwrap();
        assert!(seen.get());
    }

    #[test]
    fn busy_form_refuses_second_request() {
        let transport = FakeTransport::ok(&envelope("{}"));
        let client = GeminiClient::new(keyed(), &transport);
        let mut form = AuthoringForm::with_draft(filled());
        form.generating = true;
        assert!(matches!(form.autofill(&client), Err(AutofillError::Busy)));
        assert_eq!(transport.calls.get(), 0);
    }
}
