//! Repository over the key-value store
//!
//! Loads and saves the two documents and runs commands against them.
//!
//! Error policy:
//! - read failures (and documents that do not parse) are logged and treated
//!   as empty, so "no data yet" and "store is down" look the same to callers
//! - write failures surface as `Error::StoreUnavailable`; nothing is retried
//!
//! The song store and the order store are written separately. A failure
//! between the two writes leaves drift that the next `order()` call repairs
//! in the song → entry direction.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::command::{Applied, Command};
use crate::error::{Error, Result};
use crate::library::Library;
use crate::models::{OrderEntry, SongBook};
use crate::reconcile::reconcile;
use crate::store::{KvStore, ORDER_KEY, SONGS_KEY};
use crate::transfer::{ExportFormat, TransferDocument};

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KvStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Song store document, empty on any read problem
    pub async fn load_songs(&self) -> SongBook {
        self.load_document(SONGS_KEY).await
    }

    /// Order store document as stored, empty on any read problem
    pub async fn load_stored_order(&self) -> Vec<OrderEntry> {
        self.load_document(ORDER_KEY).await
    }

    /// Both documents, with the order reconciled in memory only
    pub async fn load_library(&self) -> Library {
        let songs = self.load_songs().await;
        let order = self.load_stored_order().await;
        Library::reconciled(songs, order)
    }

    pub async fn save_songs(&self, songs: &SongBook) -> Result<()> {
        self.save_document(SONGS_KEY, songs).await
    }

    pub async fn save_order(&self, order: &[OrderEntry]) -> Result<()> {
        self.save_document(ORDER_KEY, order).await
    }

    /// Reconciled order store. A repaired order is written back before it is
    /// returned, so later reads see it without recomputing.
    pub async fn order(&self) -> Result<Vec<OrderEntry>> {
        let songs = self.load_songs().await;
        let stored = self.load_stored_order().await;
        let stored_len = stored.len();

        let result = reconcile(&songs, stored);
        if result.repaired {
            warn!(
                "Order store drifted from song store: {} entries stored, {} after repair",
                stored_len,
                result.order.len()
            );
            self.save_order(&result.order).await?;
        }
        Ok(result.order)
    }

    /// Apply `command` to the stored library and persist what it touched.
    ///
    /// The song store is written first, then the order store.
    pub async fn execute(&self, command: Command) -> Result<Applied> {
        let name = command.name();
        let mut library = self.load_library().await;

        let applied = command.apply(&mut library).map_err(|e| {
            debug!("Command {} rejected: {}", name, e);
            e
        })?;

        let touched = applied.touched();
        if touched.songs {
            self.save_songs(&library.songs).await?;
        }
        if touched.order {
            self.save_order(&library.order).await?;
        }

        info!("Command {} applied", name);
        Ok(applied)
    }

    /// Replace both stores from a transfer document
    pub async fn import(&self, document: TransferDocument) -> Result<Library> {
        let library = document.into_library();
        self.save_songs(&library.songs).await?;
        self.save_order(&library.order).await?;
        info!(
            "Imported {} songs, {} order entries",
            library.songs.len(),
            library.order.len()
        );
        Ok(library)
    }

    /// Current data as a transfer document
    pub async fn export(&self, format: ExportFormat) -> Result<TransferDocument> {
        let songs = self.load_songs().await;
        let document = match format {
            ExportFormat::Legacy => TransferDocument::Legacy(songs),
            ExportFormat::Bundle => {
                let order = self.order().await?;
                TransferDocument::Bundle { songs, order }
            }
        };
        Ok(document)
    }

    async fn load_document<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let text = match self.store.get(key).await {
            Ok(Some(text)) => text,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!("Failed to read '{}', treating as empty: {}", key, e);
                return T::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored '{}' is not valid, treating as empty: {}", key, e);
                T::default()
            }
        }
    }

    async fn save_document<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, text).await.map_err(|e| {
            error!("Failed to write '{}': {}", key, e);
            match e {
                Error::StoreUnavailable(_) => e,
                other => Error::StoreUnavailable(other.to_string()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, Repository) {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::new(store.clone());
        (store, repo)
    }

    fn add(title: &str, lyrics: &str) -> Command {
        Command::Add {
            title: title.into(),
            lyrics: lyrics.into(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_lifecycle() {
        let (store, repo) = setup();

        repo.execute(add("Song1", "line1")).await.unwrap();
        assert_eq!(store.raw(SONGS_KEY).await.as_deref(), Some(r#"{"Song1":"line1"}"#));
        assert_eq!(repo.order().await.unwrap(), vec![OrderEntry::visible("Song1")]);

        repo.execute(Command::ToggleHidden { title: "Song1".into() })
            .await
            .unwrap();
        assert_eq!(repo.order().await.unwrap(), vec![OrderEntry::hidden("Song1")]);

        repo.execute(Command::Rename {
            old_title: "Song1".into(),
            new_title: "Song One".into(),
        })
        .await
        .unwrap();
        assert_eq!(store.raw(SONGS_KEY).await.as_deref(), Some(r#"{"Song One":"line1"}"#));
        assert_eq!(repo.order().await.unwrap(), vec![OrderEntry::hidden("Song One")]);

        repo.execute(Command::Delete { title: "Song One".into() })
            .await
            .unwrap();
        assert!(repo.load_songs().await.is_empty());
        assert!(repo.order().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_duplicate_changes_nothing() {
        let (store, repo) = setup();
        repo.execute(add("A", "first")).await.unwrap();
        let songs_before = store.raw(SONGS_KEY).await;
        let order_before = store.raw(ORDER_KEY).await;

        let err = repo.execute(add("A", "second")).await.unwrap_err();

        assert!(matches!(err, Error::DuplicateTitle(_)));
        assert_eq!(store.raw(SONGS_KEY).await, songs_before);
        assert_eq!(store.raw(ORDER_KEY).await, order_before);
    }

    #[tokio::test]
    async fn test_order_repairs_and_persists_drift() {
        let (store, repo) = setup();
        store.put_raw(SONGS_KEY, r#"{"A":"a","B":"b"}"#).await;
        store
            .put_raw(ORDER_KEY, r#"[{"title":"B","hidden":true}]"#)
            .await;

        let order = repo.order().await.unwrap();

        assert_eq!(order, vec![OrderEntry::hidden("B"), OrderEntry::visible("A")]);
        assert_eq!(
            store.raw(ORDER_KEY).await.as_deref(),
            Some(r#"[{"title":"B","hidden":true},{"title":"A","hidden":false}]"#)
        );
    }

    #[tokio::test]
    async fn test_order_without_drift_is_not_rewritten() {
        let (store, repo) = setup();
        store.put_raw(SONGS_KEY, r#"{"A":"a"}"#).await;
        store
            .put_raw(ORDER_KEY, r#"[ {"title":"A","hidden":false} ]"#)
            .await;

        repo.order().await.unwrap();

        // Stored formatting survives because nothing was written
        assert_eq!(
            store.raw(ORDER_KEY).await.as_deref(),
            Some(r#"[ {"title":"A","hidden":false} ]"#)
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_treated_as_empty() {
        let (store, repo) = setup();
        repo.execute(add("A", "a")).await.unwrap();

        store.set_fail_reads(true);

        assert!(repo.load_songs().await.is_empty());
        assert!(repo.order().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_treated_as_empty() {
        let (store, repo) = setup();
        store.put_raw(SONGS_KEY, "not json").await;

        assert!(repo.load_songs().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let (store, repo) = setup();
        store.set_fail_writes(SONGS_KEY, true).await;

        let err = repo.execute(add("A", "a")).await.unwrap_err();

        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert_eq!(store.raw(ORDER_KEY).await, None);
    }

    #[tokio::test]
    async fn test_partial_write_is_repaired_on_next_read() {
        let (store, repo) = setup();
        store.set_fail_writes(ORDER_KEY, true).await;

        // Song store write lands, order store write fails
        assert!(repo.execute(add("A", "a")).await.is_err());
        assert_eq!(store.raw(SONGS_KEY).await.as_deref(), Some(r#"{"A":"a"}"#));

        store.set_fail_writes(ORDER_KEY, false).await;
        assert_eq!(repo.order().await.unwrap(), vec![OrderEntry::visible("A")]);
    }

    #[tokio::test]
    async fn test_update_lyrics_does_not_write_order() {
        let (store, repo) = setup();
        store.put_raw(SONGS_KEY, r#"{"A":"a"}"#).await;

        repo.execute(Command::UpdateLyrics {
            title: "A".into(),
            lyrics: "new".into(),
        })
        .await
        .unwrap();

        assert_eq!(store.raw(ORDER_KEY).await, None);
        assert_eq!(repo.load_songs().await.get("A"), Some("new"));
    }

    #[tokio::test]
    async fn test_move_to_top_uses_reconciled_order() {
        let (store, repo) = setup();
        store.put_raw(SONGS_KEY, r#"{"A":"a","B":"b","C":"c"}"#).await;

        repo.execute(Command::MoveToTop { title: "C".into() })
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .order()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_export_bundle_uses_reconciled_order() {
        let (store, repo) = setup();
        store.put_raw(SONGS_KEY, r#"{"A":"a"}"#).await;

        let document = repo.export(ExportFormat::Bundle).await.unwrap();

        assert_eq!(
            serde_json::to_string(&document).unwrap(),
            r#"{"songs":{"A":"a"},"order":[{"title":"A","hidden":false}]}"#
        );
    }
}
