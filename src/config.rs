//! Configuration.
//!
//! Values are layered, highest priority first:
//!
//! ```text
//! environment (API_KEY)  →  mudawwana.toml  →  stock defaults
//! ```
//!
//! The config file is optional and sparse; any key it leaves out keeps its
//! default. `mudawwana gen-config` prints a fully commented template.
//!
//! ```toml
//! [storage]
//! data_dir = ".mudawwana"
//!
//! [author]
//! name = "المدير"
//!
//! [draft]
//! default_image_url = "https://picsum.photos/seed/new/800/450"
//!
//! [generation]
//! endpoint = "https://generativelanguage.googleapis.com"
//! model = "gemini-3-flash-preview"
//! # api_key = "..."   # prefer the API_KEY environment variable
//! ```

use crate::generation::GeminiSettings;
use confique::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "mudawwana.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Load(#[from] confique::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Config)]
pub struct BlogConfig {
    #[config(nested)]
    pub storage: StorageConfig,
    #[config(nested)]
    pub author: AuthorConfig,
    #[config(nested)]
    pub draft: DraftConfig,
    #[config(nested)]
    pub generation: GenerationConfig,
}

/// Local storage location.
#[derive(Debug, Config)]
pub struct StorageConfig {
    /// Directory holding the blog's local storage, one file per key.
    #[config(default = ".mudawwana")]
    pub data_dir: PathBuf,
}

/// Byline stamped on every post you publish.
#[derive(Debug, Config)]
pub struct AuthorConfig {
    /// Author name for new posts.
    #[config(default = "المدير")]
    pub name: String,
}

/// Defaults for a fresh draft.
#[derive(Debug, Config)]
pub struct DraftConfig {
    /// Cover image URL a new draft starts with.
    #[config(default = "https://picsum.photos/seed/new/800/450")]
    pub default_image_url: String,
}

/// The text-generation service used to pre-fill drafts.
#[derive(Debug, Config)]
pub struct GenerationConfig {
    /// Base URL of the Gemini API, or a full `...:generateContent` URL.
    #[config(default = "https://generativelanguage.googleapis.com")]
    pub endpoint: String,
    /// Model name.
    #[config(default = "gemini-3-flash-preview")]
    pub model: String,
    /// API key. Prefer setting the API_KEY environment variable over
    /// writing the key into this file.
    #[config(env = "API_KEY")]
    pub api_key: Option<String>,
}

impl GenerationConfig {
    pub fn settings(&self) -> GeminiSettings {
        GeminiSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

impl BlogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "generation.model must not be empty".into(),
            ));
        }
        let endpoint = self.generation.endpoint.as_str();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "generation.endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if self.author.name.trim().is_empty() {
            return Err(ConfigError::Validation("author.name must not be empty".into()));
        }
        Ok(())
    }
}

/// Load config from `path` (missing file is fine) with environment
/// overrides, then validate.
pub fn load_config(path: &Path) -> Result<BlogConfig, ConfigError> {
    load(path, true)
}

fn load(path: &Path, with_env: bool) -> Result<BlogConfig, ConfigError> {
    let mut builder = BlogConfig::builder();
    if with_env {
        builder = builder.env();
    }
    let config = builder.file(path).load()?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// A commented `mudawwana.toml` listing every key with its default.
pub fn stock_config_toml() -> String {
    confique::toml::template::<BlogConfig>(confique::toml::FormatOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load(&tmp.path().join("missing.toml"), false).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from(".mudawwana"));
        assert_eq!(config.author.name, "المدير");
        assert_eq!(config.generation.model, "gemini-3-flash-preview");
        assert_eq!(config.generation.api_key, None);
        assert_eq!(
            config.draft.default_image_url,
            "https://picsum.photos/seed/new/800/450"
        );
    }

    #[test]
    fn partial_file_overrides_only_its_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mudawwana.toml");
        fs::write(
            &path,
            r#"
[author]
name = "Layla"

[generation]
model = "gemini-2.5-flash"
api_key = "from-file"
"#,
        )
        .unwrap();

        let config = load(&path, false).unwrap();
        assert_eq!(config.author.name, "Layla");
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.generation.api_key.as_deref(), Some("from-file"));
        assert_eq!(
            config.generation.endpoint,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(config.storage.data_dir, PathBuf::from(".mudawwana"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mudawwana.toml");
        fs::write(&path, "[author\nname = ").unwrap();
        assert!(matches!(load(&path, false), Err(ConfigError::Load(_))));
    }

    #[test]
    fn bad_endpoint_fails_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mudawwana.toml");
        fs::write(&path, "[generation]\nendpoint = \"ftp://nope\"\n").unwrap();
        assert!(matches!(
            load(&path, false),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn settings_carry_generation_values() {
        let tmp = TempDir::new().unwrap();
        let config = load(&tmp.path().join("none.toml"), false).unwrap();
        let settings = config.generation.settings();
        assert_eq!(settings.model, config.generation.model);
        assert_eq!(settings.credential(), None);
    }

    #[test]
    fn template_mentions_every_section() {
        let template = stock_config_toml();
        for key in ["[storage]", "[author]", "[draft]", "[generation]", "api_key", "API_KEY"] {
            assert!(template.contains(key), "template is missing {key}");
        }
    }
}
