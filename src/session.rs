//! One run of the blog: store, theme, current view, authoring form and
//! search term, wired together the way the screens use them.
//!
//! Every user action is a method. Storage writes happen inside the store and
//! theme; the session itself holds nothing that outlives the process.

use crate::filter;
use crate::form::{AuthoringForm, AutofillError, Draft, FormError};
use crate::generation::ContentGenerator;
use crate::storage::{Storage, StorageError};
use crate::store::{PostStore, StoreError, default_posts};
use crate::theme::Theme;
use crate::types::{BlogStats, Post};
use crate::view::{View, ViewController, ViewError};
use chrono::{NaiveDate, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("no post with id '{0}'")]
    UnknownPost(String),
}

/// Session-wide settings taken from config.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub author: String,
    pub default_image_url: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            author: "المدير".to_string(),
            default_image_url: crate::form::DEFAULT_IMAGE_URL.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Session<S: Storage> {
    store: PostStore<S>,
    theme: Theme,
    view: ViewController,
    form: AuthoringForm,
    search: String,
    options: SessionOptions,
}

impl<S: Storage> Session<S> {
    /// Rehydrate posts and theme from `storage`.
    pub fn open(storage: S, options: SessionOptions) -> Result<Self, SessionError> {
        let theme = Theme::load(&storage);
        let store = PostStore::load(storage, default_posts())?;
        // Mirror the theme like the posts, so a fresh data dir is complete.
        theme.save(store.storage())?;
        let form = AuthoringForm::with_draft(Draft {
            image_url: options.default_image_url.clone(),
            ..Draft::default()
        });
        tracing::debug!(posts = store.len(), %theme, "session opened");
        Ok(Self {
            store,
            theme,
            view: ViewController::new(),
            form,
            search: String::new(),
            options,
        })
    }

    pub fn posts(&self) -> &[Post] {
        self.store.posts()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> &View {
        self.view.current()
    }

    pub fn form(&self) -> &AuthoringForm {
        &self.form
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        self.form.draft_mut()
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Posts the listing shows for the current search term.
    pub fn visible_posts(&self) -> Vec<&Post> {
        filter::filter(self.store.posts(), &self.search)
    }

    pub fn stats(&self) -> BlogStats {
        filter::stats(self.store.posts())
    }

    /// The post on screen in single-post mode.
    pub fn selected_post(&self) -> Option<&Post> {
        self.view
            .selected_post_id()
            .and_then(|id| self.store.get(id))
    }

    pub fn find_post(&self, id: &str) -> Option<&Post> {
        self.store.get(id)
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Open a post from the listing.
    pub fn select(&mut self, id: &str) -> Result<&Post, SessionError> {
        let post = self
            .store
            .get(id)
            .ok_or_else(|| SessionError::UnknownPost(id.to_string()))?;
        self.view.select(post)?;
        Ok(post)
    }

    pub fn back(&mut self) -> Result<(), SessionError> {
        self.view.back()?;
        Ok(())
    }

    pub fn home(&mut self) {
        self.view.home();
    }

    pub fn open_authoring(&mut self) {
        self.view.open_authoring();
    }

    /// Leave the form without publishing. The draft is kept.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.view.cancel()?;
        Ok(())
    }

    /// Publish the draft dated today and return to the listing.
    pub fn submit(&mut self) -> Result<Post, SessionError> {
        self.submit_on(Utc::now().date_naive())
    }

    pub fn submit_on(&mut self, today: NaiveDate) -> Result<Post, SessionError> {
        if !matches!(self.view.current(), View::Authoring) {
            return Err(ViewError::InvalidTransition {
                from: self.view.current().name(),
                action: "publish",
            }
            .into());
        }
        let post = self
            .form
            .submit(&mut self.store, &self.options.author, today)?;
        self.view.finish_authoring()?;
        Ok(post)
    }

    pub fn autofill(&mut self, generator: &impl ContentGenerator) -> Result<(), AutofillError> {
        self.form.autofill(generator)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, SessionError> {
        Ok(self.theme.toggle(self.store.storage())?)
    }
}
