//! Search filter and derived statistics over the in-memory post list.
//!
//! Both are pure functions of a slice; neither touches the store.

use crate::types::{BlogStats, Post};
use std::collections::HashSet;

/// Synthetic views credited per post in [`stats`].
pub const VIEWS_PER_POST: usize = 125;

/// Posts whose title or category label contains `term`, ignoring case.
///
/// An empty term matches everything. Store order is preserved.
pub fn filter<'a>(posts: &'a [Post], term: &str) -> Vec<&'a Post> {
    let needle = term.to_lowercase();
    posts.iter().filter(|p| matches(p, &needle)).collect()
}

fn matches(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.category.label().to_lowercase().contains(needle)
}

pub fn stats(posts: &[Post]) -> BlogStats {
    let categories: HashSet<_> = posts.iter().map(|p| p.category).collect();
    BlogStats {
        total_posts: posts.len(),
        total_views: posts.len() * VIEWS_PER_POST,
        categories_count: categories.len(),
        drafts_count: posts.iter().filter(|p| p.is_draft).count(),
    }
}
