//! # Mudawwana
//!
//! A single-user blog you run from the terminal. Posts live in a small local
//! key/value store, the listing can be filtered by title or category, and
//! new posts can be drafted by hand or pre-filled by the Gemini
//! text-generation API.
//!
//! # Screens
//!
//! The program has the three screens of a classic blog front end, modelled
//! as a state machine in [`view`]:
//!
//! ```text
//! listing ──select──▶ single post ──back──▶ listing
//!    any ──new──▶ authoring ──publish / cancel──▶ listing
//! ```
//!
//! The `shell` command drives them interactively; the one-shot commands
//! (`list`, `show`, `new`, …) each run one screen and exit. `export` writes
//! the listing and every post as static HTML.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Post`, `Category`, `BlogStats`: the stored data model |
//! | [`storage`] | String-keyed local storage (`FileStorage`, `MemoryStorage`) |
//! | [`store`] | Newest-first post list mirrored to storage, default posts |
//! | [`theme`] | Persisted light/dark preference |
//! | [`filter`] | Search filter and derived counters |
//! | [`view`] | Listing / single-post / authoring state machine |
//! | [`form`] | Draft editing, validation, publish and autofill |
//! | [`generation`] | Gemini client behind the `ContentGenerator` trait |
//! | [`session`] | One run of the blog: everything above wired together |
//! | [`shell`] | Interactive command loop over a session |
//! | [`output`] | Terminal formatting for every screen |
//! | [`render`] | Static HTML export with Maud |
//! | [`config`] | Layered `mudawwana.toml` + environment configuration |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Storage Is Dumb On Purpose
//!
//! The storage layer knows nothing about posts: it maps string keys to
//! string values, like browser `localStorage`. The store serialises the whole
//! list on every change. A blog of a few hundred posts is a few hundred
//! kilobytes of JSON, well below the point where incremental writes matter.
//!
//! ## Bad Data Means Defaults
//!
//! A missing, unreadable or malformed storage entry is never an error. The
//! store starts from the default posts and the theme from `light`, and the
//! next write replaces the bad entry.
//!
//! ## One Request At A Time
//!
//! Generation is a blocking call guarded by the form's in-flight flag. There
//! is no retry, timeout or cancellation: the request either returns a parsed
//! suggestion or an error, and on error the draft is untouched.

pub mod config;
pub mod filter;
pub mod form;
pub mod generation;
pub mod logging;
pub mod output;
pub mod render;
pub mod session;
pub mod shell;
pub mod storage;
pub mod store;
pub mod theme;
pub mod types;
pub mod view;
