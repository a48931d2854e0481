//! Optimistic client view
//!
//! A browser (or any other client) keeps its own copy of the library, shows
//! a change immediately, and saves it in the background. If the save fails
//! the local change is rolled back. `LocalView` does that with command
//! objects so the rollback is exact and testable.

use tracing::warn;

use crate::command::Command;
use crate::error::Result;
use crate::library::Library;
use crate::repository::Repository;

#[derive(Debug, Clone, Default)]
pub struct LocalView {
    library: Library,
}

impl LocalView {
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    /// Load the current state through the repository
    pub async fn load(repo: &Repository) -> Result<Self> {
        let songs = repo.load_songs().await;
        let order = repo.order().await?;
        Ok(Self::new(Library::new(songs, order)))
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Apply `command` locally, then persist it.
    ///
    /// A command the local copy rejects is never sent. A failed save reverts
    /// the local change and returns the error.
    pub async fn submit(&mut self, command: Command, repo: &Repository) -> Result<()> {
        let applied = command.clone().apply(&mut self.library)?;

        if let Err(e) = repo.execute(command).await {
            warn!("Save of {} failed, reverting local change: {}", applied.command().name(), e);
            applied.revert(&mut self.library);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::OrderEntry;
    use crate::store::{MemoryStore, ORDER_KEY, SONGS_KEY};
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryStore>, Repository, LocalView) {
        let store = Arc::new(MemoryStore::new());
        store.put_raw(SONGS_KEY, r#"{"A":"a","B":"b"}"#).await;
        let repo = Repository::new(store.clone());
        let view = LocalView::load(&repo).await.unwrap();
        (store, repo, view)
    }

    #[tokio::test]
    async fn test_successful_submit_keeps_local_change() {
        let (_store, repo, mut view) = setup().await;

        view.submit(Command::MoveToTop { title: "B".into() }, &repo)
            .await
            .unwrap();

        assert_eq!(view.library().order[0], OrderEntry::visible("B"));
        assert_eq!(repo.order().await.unwrap(), view.library().order);
    }

    #[tokio::test]
    async fn test_failed_save_reverts_rename() {
        let (store, repo, mut view) = setup().await;
        let before = view.library().clone();
        store.set_fail_writes(SONGS_KEY, true).await;

        let err = view
            .submit(
                Command::Rename {
                    old_title: "A".into(),
                    new_title: "A2".into(),
                },
                &repo,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert_eq!(view.library(), &before);
    }

    #[tokio::test]
    async fn test_failed_save_reverts_add() {
        let (store, repo, mut view) = setup().await;
        let before = view.library().clone();
        store.set_fail_writes(ORDER_KEY, true).await;

        let result = view
            .submit(
                Command::Add {
                    title: "C".into(),
                    lyrics: "c".into(),
                },
                &repo,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(view.library(), &before);
    }

    #[tokio::test]
    async fn test_locally_rejected_command_is_not_sent() {
        let (store, repo, mut view) = setup().await;
        let songs_before = store.raw(SONGS_KEY).await;

        let err = view
            .submit(
                Command::Add {
                    title: "A".into(),
                    lyrics: "again".into(),
                },
                &repo,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateTitle(_)));
        assert_eq!(store.raw(SONGS_KEY).await, songs_before);
    }
}
