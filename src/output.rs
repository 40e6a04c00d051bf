//! Terminal output for every screen.
//!
//! # Display Contract
//!
//! Each post is identified the same way everywhere: a 1-based positional
//! index in the current listing followed by its title, with id, category and
//! date as indented context lines.
//!
//! ```text
//! 001 لماذا نتعلم لغة Rust؟
//!     Id: 1 · برمجة · 2024-01-08
//!     نظرة على الأمان والأداء في لغة برمجة الأنظمة الحديثة.
//! ```
//!
//! Every screen has a `format_*` function returning lines (pure, tested)
//! and a `print_*` wrapper writing them to stdout.

use crate::form::AuthoringForm;
use crate::theme::Theme;
use crate::types::{BlogStats, Category, Post};

/// Longest summary shown on a listing line, in characters.
const SUMMARY_WIDTH: usize = 120;

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` when cut.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn post_context(post: &Post) -> String {
    let draft = if post.is_draft { " · draft" } else { "" };
    format!(
        "{}Id: {} · {} · {}{}",
        indent(1),
        post.id,
        post.category,
        post.date,
        draft
    )
}

// ============================================================================
// Listing
// ============================================================================

/// The listing: header with the active search term, then one entry per post.
pub fn format_listing(posts: &[&Post], search: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if search.is_empty() {
        lines.push(format!("Posts ({})", posts.len()));
    } else {
        lines.push(format!("Posts matching \"{}\" ({})", search, posts.len()));
    }

    if posts.is_empty() {
        lines.push(format!("{}(no posts)", indent(1)));
        return lines;
    }

    for (i, post) in posts.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(post_context(post));
        if !post.summary.is_empty() {
            lines.push(format!(
                "{}{}",
                indent(1),
                truncate(&post.summary, SUMMARY_WIDTH)
            ));
        }
    }
    lines
}

pub fn print_listing(posts: &[&Post], search: &str) {
    for line in format_listing(posts, search) {
        println!("{}", line);
    }
}

// ============================================================================
// Single post
// ============================================================================

/// Full post: title, byline, cover image, then one line per paragraph.
pub fn format_post(post: &Post) -> Vec<String> {
    let mut lines = vec![
        post.title.clone(),
        format!("{} · {} · {}", post.category, post.date, post.author),
        format!("Image: {}", post.image_url),
        String::new(),
    ];
    for para in post.paragraphs() {
        lines.push(para.to_string());
    }
    lines
}

pub fn print_post(post: &Post) {
    for line in format_post(post) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats and theme
// ============================================================================

pub fn format_stats(stats: &BlogStats) -> Vec<String> {
    vec![
        "Stats".to_string(),
        format!("{}Posts: {}", indent(1), stats.total_posts),
        format!("{}Categories: {}", indent(1), stats.categories_count),
        format!("{}Drafts: {}", indent(1), stats.drafts_count),
        format!("{}Views: {}", indent(1), stats.total_views),
    ]
}

pub fn print_stats(stats: &BlogStats) {
    for line in format_stats(stats) {
        println!("{}", line);
    }
}

pub fn format_theme(theme: Theme) -> String {
    format!("Theme: {} {}", theme, theme.toggle_icon())
}

// ============================================================================
// Authoring
// ============================================================================

/// The authoring form as it stands, plus the autofill affordance state.
pub fn format_draft(form: &AuthoringForm) -> Vec<String> {
    let draft = form.draft();
    let field = |name: &str, value: &str| {
        if value.is_empty() {
            format!("{}{}: (empty)", indent(1), name)
        } else {
            format!("{}{}: {}", indent(1), name, value)
        }
    };
    let autofill = if form.is_generating() {
        "⏳ generating..."
    } else {
        "✨ available (uses the title as topic)"
    };

    let mut lines = vec![
        "New post".to_string(),
        field("Title", &draft.title),
        field("Category", draft.category.label()),
        field("Image", &draft.image_url),
        field("Summary", &draft.summary),
    ];
    if draft.content.is_empty() {
        lines.push(field("Content", ""));
    } else {
        lines.push(format!("{}Content:", indent(1)));
        for para in draft.content.split('\n') {
            lines.push(format!("{}{}", indent(2), para));
        }
    }
    lines.push(format!("{}Autofill: {}", indent(1), autofill));
    lines
}

/// Categories with the names accepted on the command line.
pub fn format_categories() -> Vec<String> {
    Category::ALL
        .iter()
        .map(|c| format!("{}{:<12} {}", indent(1), c.slug(), c.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Draft;
    use crate::store::default_posts;

    #[test]
    fn listing_numbers_posts_in_order() {
        let posts = default_posts();
        let refs: Vec<&Post> = posts.iter().collect();
        let lines = format_listing(&refs, "");
        assert_eq!(lines[0], "Posts (3)");
        assert_eq!(lines[1], format!("001 {}", posts[0].title));
        assert!(lines[2].starts_with("    Id: 3 · ذكاء اصطناعي · 2024-03-12"));
        assert!(lines.iter().any(|l| l.starts_with("003 ")));
    }

    #[test]
    fn listing_shows_search_term_and_empty_state() {
        let lines = format_listing(&[], "xyz");
        assert_eq!(lines, vec!["Posts matching \"xyz\" (0)", "    (no posts)"]);
    }

    #[test]
    fn listing_flags_drafts() {
        let mut post = default_posts().remove(0);
        post.is_draft = true;
        let lines = format_listing(&[&post], "");
        assert!(lines[2].ends_with(" · draft"));
    }

    #[test]
    fn post_has_one_line_per_paragraph() {
        let post = default_posts().remove(0);
        let lines = format_post(&post);
        assert_eq!(lines[0], post.title);
        assert_eq!(lines.len(), 4 + post.paragraphs().count());
        assert_eq!(lines[4], post.paragraphs().next().unwrap());
    }

    #[test]
    fn stats_lines() {
        let stats = BlogStats {
            total_posts: 2,
            total_views: 250,
            categories_count: 1,
            drafts_count: 0,
        };
        let lines = format_stats(&stats);
        assert_eq!(lines[1], "    Posts: 2");
        assert_eq!(lines[4], "    Views: 250");
    }

    #[test]
    fn draft_marks_empty_fields() {
        let form = AuthoringForm::with_draft(Draft {
            title: "Hello".to_string(),
            content: "a\nb".to_string(),
            ..Draft::default()
        });
        let lines = format_draft(&form);
        assert_eq!(lines[1], "    Title: Hello");
        assert_eq!(lines[4], "    Summary: (empty)");
        assert_eq!(lines[5], "    Content:");
        assert_eq!(lines[6], "        a");
        assert!(lines.last().unwrap().contains("available"));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("عربي", 10), "عربي");
    }

    #[test]
    fn theme_line_shows_toggle_icon() {
        assert_eq!(format_theme(Theme::Light), "Theme: light 🌙");
    }
}
