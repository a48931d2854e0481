//! Library aggregate
//!
//! The song store and the order store as one in-memory value. Every mutation
//! the service offers is defined here, so the server, the optimistic client
//! view and the tests all share one set of rules. Persisting the two halves
//! is someone else's job (see `repository`).

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{entry_position, OrderEntry, Song, SongBook};
use crate::reconcile::reconcile;

/// Song store and order store together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub songs: SongBook,
    pub order: Vec<OrderEntry>,
}

/// What `Library::delete` took out, enough to put it back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub song_index: usize,
    pub song: Song,
    /// Position and value of the order entry, when there was one
    pub entry: Option<(usize, OrderEntry)>,
}

impl Library {
    pub fn new(songs: SongBook, order: Vec<OrderEntry>) -> Self {
        Self { songs, order }
    }

    /// Library whose order has already been reconciled against `songs`
    pub fn reconciled(songs: SongBook, order: Vec<OrderEntry>) -> Self {
        let order = reconcile(&songs, order).order;
        Self { songs, order }
    }

    /// Run reconciliation in place. Returns true if the order changed.
    pub fn reconcile(&mut self) -> bool {
        let order = std::mem::take(&mut self.order);
        let result = reconcile(&self.songs, order);
        self.order = result.order;
        result.repaired
    }

    /// Add a song and append a visible entry for it
    pub fn add(&mut self, title: &str, lyrics: &str) -> Result<()> {
        if self.songs.contains(title) {
            return Err(Error::DuplicateTitle(title.to_string()));
        }
        self.songs.insert(title, lyrics);
        self.order.push(OrderEntry::visible(title));
        debug!("Added '{}' at order position {}", title, self.order.len() - 1);
        Ok(())
    }

    /// Remove a song and its first matching order entry
    pub fn delete(&mut self, title: &str) -> Result<Removed> {
        let (song_index, song) = self
            .songs
            .remove(title)
            .ok_or_else(|| Error::NotFound(title.to_string()))?;
        let entry = entry_position(&self.order, title).map(|index| (index, self.order.remove(index)));
        Ok(Removed {
            song_index,
            song,
            entry,
        })
    }

    /// Move the lyrics of `old_title` to `new_title`.
    ///
    /// The song store key moves to the end (delete + insert); the order entry
    /// keeps its position and hidden flag. Returns the old key's position.
    pub fn rename(&mut self, old_title: &str, new_title: &str) -> Result<usize> {
        if !self.songs.contains(old_title) {
            return Err(Error::NotFound(old_title.to_string()));
        }
        if self.songs.contains(new_title) {
            return Err(Error::DuplicateTitle(new_title.to_string()));
        }

        let (song_index, song) = self
            .songs
            .remove(old_title)
            .ok_or_else(|| Error::NotFound(old_title.to_string()))?;
        self.songs.insert(new_title, song.lyrics);

        if let Some(index) = entry_position(&self.order, old_title) {
            self.order[index].title = new_title.to_string();
        }
        Ok(song_index)
    }

    /// Replace the lyrics of an existing song, returning the previous lyrics
    pub fn update_lyrics(&mut self, title: &str, lyrics: &str) -> Result<String> {
        if !self.songs.contains(title) {
            return Err(Error::NotFound(title.to_string()));
        }
        self.songs
            .insert(title, lyrics)
            .ok_or_else(|| Error::NotFound(title.to_string()))
    }

    /// Flip the hidden flag of the matching entry, returning the new value.
    ///
    /// Only the order store is consulted; orphan entries can be toggled.
    pub fn toggle_hidden(&mut self, title: &str) -> Result<bool> {
        let index = entry_position(&self.order, title)
            .ok_or_else(|| Error::NotFound(title.to_string()))?;
        let entry = &mut self.order[index];
        entry.hidden = !entry.hidden;
        Ok(entry.hidden)
    }

    /// Replace the order wholesale, returning the previous order.
    ///
    /// Nothing is validated here; the next reconcile repairs drift.
    pub fn reorder(&mut self, order: Vec<OrderEntry>) -> Vec<OrderEntry> {
        std::mem::replace(&mut self.order, order)
    }

    /// Relocate the matching entry to index 0, returning where it was
    pub fn move_to_top(&mut self, title: &str) -> Result<usize> {
        let index = entry_position(&self.order, title)
            .ok_or_else(|| Error::NotFound(title.to_string()))?;
        let entry = self.order.remove(index);
        self.order.insert(0, entry);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(entries: Vec<OrderEntry>) -> Library {
        let songs: SongBook = entries
            .iter()
            .map(|entry| (entry.title.clone(), format!("{} lyrics", entry.title)))
            .collect();
        Library::new(songs, entries)
    }

    #[test]
    fn test_add_appends_visible_entry() {
        let mut lib = library(vec![OrderEntry::hidden("A")]);

        lib.add("B", "bee").unwrap();

        assert_eq!(lib.songs.get("B"), Some("bee"));
        assert_eq!(lib.order, vec![OrderEntry::hidden("A"), OrderEntry::visible("B")]);
    }

    #[test]
    fn test_add_duplicate_fails_without_changes() {
        let mut lib = library(vec![OrderEntry::visible("A")]);
        let before = lib.clone();

        let err = lib.add("A", "other").unwrap_err();

        assert!(matches!(err, Error::DuplicateTitle(ref t) if t == "A"));
        assert_eq!(lib, before);
    }

    #[test]
    fn test_delete_removes_song_and_entry() {
        let mut lib = library(vec![
            OrderEntry::visible("A"),
            OrderEntry::hidden("B"),
            OrderEntry::visible("C"),
        ]);

        let removed = lib.delete("B").unwrap();

        assert_eq!(removed.song_index, 1);
        assert_eq!(removed.entry, Some((1, OrderEntry::hidden("B"))));
        assert!(!lib.songs.contains("B"));
        assert_eq!(lib.order, vec![OrderEntry::visible("A"), OrderEntry::visible("C")]);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut lib = library(vec![OrderEntry::visible("A")]);
        assert!(matches!(lib.delete("Z"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_song_without_entry() {
        let songs: SongBook = [("A", "x")].into_iter().collect();
        let mut lib = Library::new(songs, Vec::new());

        let removed = lib.delete("A").unwrap();

        assert_eq!(removed.entry, None);
        assert!(lib.songs.is_empty());
    }

    #[test]
    fn test_rename_preserves_position_and_hidden_flag() {
        let mut lib = library(vec![
            OrderEntry::visible("A"),
            OrderEntry::hidden("B"),
            OrderEntry::visible("C"),
        ]);

        lib.rename("B", "B2").unwrap();

        assert_eq!(
            lib.order,
            vec![
                OrderEntry::visible("A"),
                OrderEntry::hidden("B2"),
                OrderEntry::visible("C"),
            ]
        );
        assert_eq!(lib.songs.get("B2"), Some("B lyrics"));
        assert!(!lib.songs.contains("B"));
        // The song store key moves to the end
        assert_eq!(lib.songs.titles().collect::<Vec<_>>(), vec!["A", "C", "B2"]);
    }

    #[test]
    fn test_rename_errors() {
        let mut lib = library(vec![OrderEntry::visible("A"), OrderEntry::visible("B")]);

        assert!(matches!(lib.rename("Z", "Y"), Err(Error::NotFound(_))));
        assert!(matches!(lib.rename("A", "B"), Err(Error::DuplicateTitle(_))));
        assert!(matches!(lib.rename("A", "A"), Err(Error::DuplicateTitle(_))));
    }

    #[test]
    fn test_update_lyrics_leaves_order_alone() {
        let mut lib = library(vec![OrderEntry::hidden("A")]);
        let order_before = lib.order.clone();

        let previous = lib.update_lyrics("A", "new words").unwrap();

        assert_eq!(previous, "A lyrics");
        assert_eq!(lib.songs.get("A"), Some("new words"));
        assert_eq!(lib.order, order_before);
        assert!(matches!(lib.update_lyrics("Z", "x"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_toggle_hidden_works_on_orphans() {
        let mut lib = Library::new(SongBook::new(), vec![OrderEntry::visible("Ghost")]);

        assert!(lib.toggle_hidden("Ghost").unwrap());
        assert!(!lib.toggle_hidden("Ghost").unwrap());
        assert!(matches!(lib.toggle_hidden("Nobody"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_move_to_top() {
        let mut lib = library(vec![
            OrderEntry::visible("A"),
            OrderEntry::visible("B"),
            OrderEntry::visible("C"),
        ]);

        assert_eq!(lib.move_to_top("C").unwrap(), 2);

        let titles: Vec<&str> = lib.order.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        assert!(matches!(lib.move_to_top("Z"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_reorder_is_not_validated() {
        let mut lib = library(vec![OrderEntry::visible("A")]);

        let previous = lib.reorder(vec![OrderEntry::visible("X")]);

        assert_eq!(previous, vec![OrderEntry::visible("A")]);
        assert_eq!(lib.order, vec![OrderEntry::visible("X")]);
        assert!(lib.reconcile());
        assert_eq!(lib.order, vec![OrderEntry::visible("X"), OrderEntry::visible("A")]);
    }
}
