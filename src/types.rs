//! Shared types used across the store, the views and the export.
//!
//! [`Post`] is the only type written to storage. Its JSON shape (camelCase
//! keys, `YYYY-MM-DD` dates, Arabic category labels) is the on-disk format
//! and must stay stable across releases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A published blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Time-derived identifier, unique within the store.
    pub id: String,
    pub title: String,
    /// Short teaser shown on listing cards.
    pub summary: String,
    /// Body text; paragraphs are separated by `\n`.
    pub content: String,
    pub author: String,
    /// Publication date, no time-of-day.
    pub date: NaiveDate,
    pub category: Category,
    /// Cover image URL.
    pub image_url: String,
    pub is_draft: bool,
}

impl Post {
    /// Body split into display paragraphs, one per line.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

/// The fixed set of post categories.
///
/// Serialized as the Arabic label, which is also what the search filter
/// matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "تقنية")]
    Technology,
    #[serde(rename = "برمجة")]
    Programming,
    #[serde(rename = "تصميم")]
    Design,
    #[serde(rename = "ذكاء اصطناعي")]
    ArtificialIntelligence,
    #[serde(rename = "ريادة أعمال")]
    Entrepreneurship,
}

impl Category {
    /// All categories in display order. The first one is the draft default.
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Programming,
        Category::Design,
        Category::ArtificialIntelligence,
        Category::Entrepreneurship,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Technology => "تقنية",
            Category::Programming => "برمجة",
            Category::Design => "تصميم",
            Category::ArtificialIntelligence => "ذكاء اصطناعي",
            Category::Entrepreneurship => "ريادة أعمال",
        }
    }

    /// Short ASCII name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Technology => "tech",
            Category::Programming => "programming",
            Category::Design => "design",
            Category::ArtificialIntelligence => "ai",
            Category::Entrepreneurship => "business",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::ALL[0]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: tech, programming, design, ai, business)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts either the ASCII slug or the Arabic label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Aggregate counters derived from the post list. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlogStats {
    pub total_posts: usize,
    /// Synthetic view count: a fixed multiple of the post count.
    pub total_views: usize,
    pub categories_count: usize,
    pub drafts_count: usize,
}
