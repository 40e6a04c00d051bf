//! Light/dark display preference, persisted under the `theme` key.

use crate::storage::{Storage, StorageError};
use std::fmt;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored value, or `Light` when absent, unreadable or unrecognised.
    pub fn load(storage: &impl Storage) -> Self {
        match storage.get_item(THEME_KEY) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::debug!(value = %raw, "unrecognised theme, using light");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read theme, using light");
                Theme::default()
            }
        }
    }

    pub fn save(self, storage: &impl Storage) -> Result<(), StorageError> {
        storage.set_item(THEME_KEY, self.as_str())
    }

    /// Flip the theme and persist the new value.
    pub fn toggle(&mut self, storage: &impl Storage) -> Result<Theme, StorageError> {
        *self = self.toggled();
        self.save(storage)?;
        Ok(*self)
    }

    /// Icon the toggle button shows: the mode you would switch *to*.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
