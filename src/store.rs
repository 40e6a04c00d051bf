//! The post store.
//!
//! An ordered, newest-first list of [`Post`]s mirrored to [`Storage`] under
//! the `blog_posts` key after every change. Loading never fails on bad data:
//! a missing or unparsable entry means "start from the default posts", the
//! same recovery [`crate::theme`] applies to its own key.

use crate::form::Draft;
use crate::storage::{Storage, StorageError};
use crate::types::{Category, Post};
use chrono::{NaiveDate, Utc};
use thiserror::Error;

/// Storage key holding the JSON array of posts.
pub const POSTS_KEY: &str = "blog_posts";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hands out time-derived post ids.
///
/// Ids are wall-clock milliseconds, bumped past the last id issued (or seen
/// in storage) so they are strictly increasing for the life of the store.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    /// Seed from existing ids so new ids never collide with stored ones.
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let last = ids
            .into_iter()
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self) -> String {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// A stored id at the top of the `i64` range leaves nothing above it;
    /// the clock then restarts from wall time.
    fn next_at(&mut self, now_millis: i64) -> String {
        self.last = match self.last.checked_add(1) {
            Some(floor) => now_millis.max(floor),
            None => now_millis,
        };
        self.last.to_string()
    }
}

#[derive(Debug)]
pub struct PostStore<S: Storage> {
    storage: S,
    posts: Vec<Post>,
    ids: IdClock,
}

impl<S: Storage> PostStore<S> {
    /// Rehydrate from storage, falling back to `defaults` when the entry is
    /// absent or malformed. The resulting list is written back immediately.
    pub fn load(storage: S, defaults: Vec<Post>) -> Result<Self, StoreError> {
        let posts = match read_posts(&storage) {
            Some(posts) => posts,
            None => defaults,
        };
        let ids = IdClock::after(posts.iter().map(|p| p.id.as_str()));
        let store = Self {
            storage,
            posts,
            ids,
        };
        store.persist()?;
        Ok(store)
    }

    /// Newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Publish a draft: fresh id, `today`'s date, the given author, not a
    /// draft. The post goes to the front of the list and the list is
    /// persisted before returning.
    pub fn create(
        &mut self,
        draft: &Draft,
        author: &str,
        today: NaiveDate,
    ) -> Result<Post, StoreError> {
        let mut id = self.ids.next_id();
        while self.get(&id).is_some() {
            id = self.ids.next_id();
        }
        let post = Post {
            id,
            title: draft.title.clone(),
            summary: draft.summary.clone(),
            content: draft.content.clone(),
            author: author.to_string(),
            date: today,
            category: draft.category,
            image_url: draft.image_url.clone(),
            is_draft: false,
        };
        self.posts.insert(0, post.clone());
        self.persist()?;
        tracing::info!(id = %post.id, title = %post.title, "post created");
        Ok(post)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.posts)?;
        self.storage.set_item(POSTS_KEY, &json)?;
        tracing::debug!(count = self.posts.len(), "posts persisted");
        Ok(())
    }
}

/// `None` means "use the defaults"; the reason is logged, never surfaced.
fn read_posts(storage: &impl Storage) -> Option<Vec<Post>> {
    let raw = match storage.get_item(POSTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("no stored posts, seeding defaults");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read stored posts, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(posts) => Some(posts),
        Err(e) => {
            tracing::warn!(error = %e, "stored posts are malformed, using defaults");
            None
        }
    }
}

/// The posts a brand-new blog starts with.
pub fn default_posts() -> Vec<Post> {
    let seed = |id: &str,
                title: &str,
                summary: &str,
                content: &str,
                (y, m, d): (i32, u32, u32),
                category: Category| Post {
        id: id.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        content: content.to_string(),
        author: "المدير".to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        category,
        image_url: format!("https://picsum.photos/seed/{id}/800/450"),
        is_draft: false,
    };

    vec![
        seed(
            "3",
            "مستقبل الذكاء الاصطناعي في تطوير البرمجيات",
            "كيف تغير أدوات الذكاء الاصطناعي طريقة كتابة الشيفرة ومراجعتها.",
            "لم تعد أدوات الذكاء الاصطناعي مجرد تجارب معملية.\nأصبحت جزءاً من يوم المطور: من اقتراح الشيفرة إلى كتابة الاختبارات.\nلكن الفهم العميق للنظام يبقى مسؤولية الإنسان.",
            (2024, 3, 12),
            Category::ArtificialIntelligence,
        ),
        seed(
            "2",
            "أساسيات تصميم واجهات المستخدم",
            "مبادئ بسيطة تجعل واجهاتك أوضح وأسهل استخداماً.",
            "التصميم الجيد يبدأ بفهم المستخدم.\nالتباين والمسافات والتسلسل البصري أدوات تقود العين.\nاختبر تصميمك مع مستخدمين حقيقيين قبل الإطلاق.",
            (2024, 2, 20),
            Category::Design,
        ),
        seed(
            "1",
            "لماذا نتعلم لغة Rust؟",
            "نظرة على الأمان والأداء في لغة برمجة الأنظمة الحديثة.",
            "تجمع Rust بين أداء لغات الأنظمة وضمانات الأمان في الذاكرة.\nنظام الملكية يمنع فئات كاملة من الأخطاء وقت الترجمة.\nومجتمعها من أكثر المجتمعات ترحيباً بالمبتدئين.",
            (2024, 1, 8),
            Category::Programming,
        ),
    ]
}
