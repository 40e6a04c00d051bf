//! Static HTML export.
//!
//! Writes the listing and every single-post screen as plain HTML so the blog
//! can be browsed without the CLI:
//!
//! ```text
//! dist/
//! ├── index.html          # Listing with stats
//! └── posts/
//!     ├── 1717171717171.html
//!     └── ...
//! ```
//!
//! Pages are right-to-left Arabic documents. The current theme is applied as
//! a class on `<html>`; styling beyond that is left to the reader's browser.
//! Markup is produced with [maud](https://maud.lambda.xyz/), so every
//! interpolated value is escaped.

use crate::filter;
use crate::theme::Theme;
use crate::types::Post;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const SITE_TITLE: &str = "مدونتي";
const CSS: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 0 auto; padding: 1rem; }
html.dark body { background: #0f172a; color: #f1f5f9; }
html.dark a { color: #a5b4fc; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1.5rem; }
.card img, .post img { width: 100%; object-fit: cover; border-radius: 0.75rem; }
.meta { opacity: 0.7; font-size: 0.875rem; }
"#;

/// Write `index.html` and one page per post under `output_dir`.
pub fn export(posts: &[Post], theme: Theme, output_dir: &Path) -> Result<usize, RenderError> {
    let posts_dir = output_dir.join("posts");
    fs::create_dir_all(&posts_dir)?;

    fs::write(
        output_dir.join("index.html"),
        render_listing(posts, theme).into_string(),
    )?;
    for post in posts {
        fs::write(
            posts_dir.join(post_file_name(post)),
            render_post(post, theme).into_string(),
        )?;
    }
    tracing::info!(pages = posts.len() + 1, dir = %output_dir.display(), "site exported");
    Ok(posts.len() + 1)
}

/// File name for a post page. Ids are digits in practice; any other byte
/// (including `_`) is written as `_xx` hex, so the name stays a single path
/// component and distinct ids never share a file.
pub fn post_file_name(post: &Post) -> String {
    let mut name = String::with_capacity(post.id.len() + 5);
    for byte in post.id.bytes() {
        if byte.is_ascii_alphanumeric() {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("_{byte:02x}"));
        }
    }
    name.push_str(".html");
    name
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, theme: Theme, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ar" dir="rtl" class=(theme.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn site_header(home_href: &str) -> Markup {
    html! {
        header {
            nav {
                a href=(home_href) { strong { (SITE_TITLE) } }
            }
        }
    }
}

fn post_card(post: &Post) -> Markup {
    html! {
        article.card {
            a href={ "posts/" (post_file_name(post)) } {
                img src=(post.image_url) alt=(post.title) loading="lazy";
                h3 { (post.title) }
            }
            p.meta {
                span.category { (post.category.label()) }
                " · "
                time datetime=(post.date.to_string()) { (post.date.to_string()) }
            }
            p { (post.summary) }
            p.meta { (post.author) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

pub fn render_listing(posts: &[Post], theme: Theme) -> Markup {
    let stats = filter::stats(posts);
    let content = html! {
        (site_header("index.html"))
        main {
            h1 { "اكتشف أحدث المقالات" }
            p.meta {
                "المقالات: " (stats.total_posts)
                " · التصنيفات: " (stats.categories_count)
            }
            section.cards {
                @for post in posts {
                    (post_card(post))
                }
            }
        }
    };
    base_document(SITE_TITLE, theme, content)
}

pub fn render_post(post: &Post, theme: Theme) -> Markup {
    let content = html! {
        (site_header("../index.html"))
        main.post {
            a href="../index.html" { "← العودة للرئيسية" }
            img src=(post.image_url) alt=(post.title);
            h1 { (post.title) }
            p.meta {
                span.category { (post.category.label()) }
                " · "
                time datetime=(post.date.to_string()) { (post.date.to_string()) }
                " · "
                (post.author)
            }
            @for para in post.paragraphs() {
                p { (para) }
            }
        }
    };
    base_document(&post.title, theme, content)
}
