//! Preference context
//!
//! Owns the current theme mode. It is ready as soon as it is constructed
//! (falling back to the system default) and picks up the persisted preference
//! when [`PreferenceContext::refresh`] runs. Observers hold a watch receiver
//! and are woken once per actual change.

use std::sync::Arc;

use tokio::sync::watch;

use super::theme::ThemeMode;
use crate::db::{Database, DbError, DbResult};
use crate::models::{Setting, THEME_PREFERENCE_KEY};

#[derive(Clone)]
pub struct PreferenceContext {
    sender: Arc<watch::Sender<ThemeMode>>,
}

impl PreferenceContext {
    pub fn new(initial: ThemeMode) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Context seeded from the system color scheme
    pub fn from_environment() -> Self {
        Self::new(ThemeMode::system_default())
    }

    pub fn current(&self) -> ThemeMode {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.sender.subscribe()
    }

    /// Publish `mode`; returns whether observers were notified
    fn publish(&self, mode: ThemeMode) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        })
    }

    /// Load the stored preference, if any, and publish it
    pub async fn refresh(&self, db: &Database) -> DbResult<ThemeMode> {
        let db = db.clone();
        let stored = tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| Setting::get(conn, THEME_PREFERENCE_KEY))
        })
        .await
        .map_err(|e| DbError::Task(e.to_string()))??;

        if let Some(value) = stored {
            let mode = ThemeMode::from_str(&value);
            if self.publish(mode) {
                tracing::info!(theme = mode.as_str(), "Loaded stored theme preference");
            }
        }

        Ok(self.current())
    }

    /// Flip between light and dark and persist the choice
    ///
    /// The in-memory mode changes even if persisting fails.
    pub async fn toggle(&self, db: &Database) -> ThemeMode {
        let mode = self.current().toggled();
        self.publish(mode);

        let db = db.clone();
        let saved = tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| Setting::set(conn, THEME_PREFERENCE_KEY, mode.as_str()))
        })
        .await;

        match saved {
            Ok(Ok(())) => tracing::debug!(theme = mode.as_str(), "Saved theme preference"),
            Ok(Err(e)) => tracing::error!("Failed to save theme preference: {}", e),
            Err(e) => tracing::error!("Theme preference task failed: {}", e),
        }

        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_immediately() {
        let ctx = PreferenceContext::new(ThemeMode::Dark);
        assert_eq!(ctx.current(), ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_refresh_without_stored_value_keeps_default() {
        let db = Database::in_memory().unwrap();
        let ctx = PreferenceContext::new(ThemeMode::Dark);
        let rx = ctx.subscribe();

        assert_eq!(ctx.refresh(&db).await.unwrap(), ThemeMode::Dark);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_refresh_publishes_stored_value() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| Setting::set(conn, THEME_PREFERENCE_KEY, "dark"))
            .unwrap();

        let ctx = PreferenceContext::new(ThemeMode::Light);
        let mut rx = ctx.subscribe();

        assert_eq!(ctx.refresh(&db).await.unwrap(), ThemeMode::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ThemeMode::Dark);

        // Same stored value again: no second notification
        ctx.refresh(&db).await.unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_toggle_notifies_once_and_persists() {
        let db = Database::in_memory().unwrap();
        let ctx = PreferenceContext::new(ThemeMode::Light);
        let mut rx = ctx.subscribe();

        assert_eq!(ctx.toggle(&db).await, ThemeMode::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ThemeMode::Dark);
        assert!(!rx.has_changed().unwrap());

        let stored = db
            .with_conn(|conn| Setting::get(conn, THEME_PREFERENCE_KEY))
            .unwrap();
        assert_eq!(stored.as_deref(), Some("dark"));

        // A fresh context picks the persisted value up
        let other = PreferenceContext::new(ThemeMode::Light);
        assert_eq!(other.refresh(&db).await.unwrap(), ThemeMode::Dark);
    }
}
