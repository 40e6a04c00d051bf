//! Which screen is showing.
//!
//! ```text
//!            select              open_authoring
//!  Listing ─────────▶ Post ─────────────────────┐
//!     ▲ ◀───────────── │                         ▼
//!     │      back                            Authoring
//!     └──────────── finish_authoring / cancel ──┘
//! ```
//!
//! `open_authoring` and `home` are reachable from every state. Any other
//! move from the wrong state is rejected and the state is left alone.

use crate::types::Post;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Listing,
    /// Single-post screen showing the post with this id.
    Post { post_id: String },
    Authoring,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Listing => "listing",
            View::Post { .. } => "single-post",
            View::Authoring => "authoring",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("cannot {action} from the {from} view")]
    InvalidTransition { from: &'static str, action: &'static str },
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    current: View,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    /// Id of the post on screen, if in single-post mode.
    pub fn selected_post_id(&self) -> Option<&str> {
        match &self.current {
            View::Post { post_id } => Some(post_id.as_str()),
            _ => None,
        }
    }

    pub fn select(&mut self, post: &Post) -> Result<(), ViewError> {
        self.require(matches!(self.current, View::Listing), "open a post")?;
        self.go(View::Post {
            post_id: post.id.clone(),
        });
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), ViewError> {
        self.require(matches!(self.current, View::Post { .. }), "go back")?;
        self.go(View::Listing);
        Ok(())
    }

    pub fn open_authoring(&mut self) {
        self.go(View::Authoring);
    }

    /// Leave the form after a successful submission.
    pub fn finish_authoring(&mut self) -> Result<(), ViewError> {
        self.require(matches!(self.current, View::Authoring), "publish")?;
        self.go(View::Listing);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), ViewError> {
        self.require(matches!(self.current, View::Authoring), "cancel")?;
        self.go(View::Listing);
        Ok(())
    }

    /// Navigation-bar home link.
    pub fn home(&mut self) {
        self.go(View::Listing);
    }

    fn require(&self, ok: bool, action: &'static str) -> Result<(), ViewError> {
        if ok {
            Ok(())
        } else {
            Err(ViewError::InvalidTransition {
                from: self.current.name(),
                action,
            })
        }
    }

    fn go(&mut self, next: View) {
        tracing::debug!(from = %self.current, to = %next, "view change");
        self.current = next;
    }
}
