//! Song and order models
//!
//! Both persisted documents are modelled here:
//! - `SongBook` is the song store (`songs` key), a JSON object of title → lyrics
//! - `Vec<OrderEntry>` is the order store (`songOrder` key), a JSON array
//!
//! The song store keeps its keys in insertion order. That order is what
//! reconciliation appends in, so it must survive a round trip through JSON.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single song: title (primary key) and lyrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub lyrics: String,
}

impl Song {
    pub fn new(title: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lyrics: lyrics.into(),
        }
    }
}

/// One position in the display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub title: String,
    #[serde(default)]
    pub hidden: bool,
}

impl OrderEntry {
    /// Entry shown in the lyrics view
    pub fn visible(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hidden: false,
        }
    }

    pub fn hidden(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hidden: true,
        }
    }
}

/// Position of the first entry with `title`, if any
pub fn entry_position(order: &[OrderEntry], title: &str) -> Option<usize> {
    order.iter().position(|entry| entry.title == title)
}

/// Title → lyrics mapping in insertion order
///
/// Serializes as a plain JSON object. Titles are unique and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongBook {
    songs: Vec<Song>,
}

impl SongBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.songs.iter().position(|song| song.title == title)
    }

    /// Lyrics for `title`
    pub fn get(&self, title: &str) -> Option<&str> {
        self.songs
            .iter()
            .find(|song| song.title == title)
            .map(|song| song.lyrics.as_str())
    }

    /// Titles in insertion order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.songs.iter().map(|song| song.title.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    /// Set the lyrics for `title`, returning the previous lyrics.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, title: impl Into<String>, lyrics: impl Into<String>) -> Option<String> {
        let title = title.into();
        let lyrics = lyrics.into();
        match self.position(&title) {
            Some(index) => Some(std::mem::replace(&mut self.songs[index].lyrics, lyrics)),
            None => {
                self.songs.push(Song { title, lyrics });
                None
            }
        }
    }

    /// Insert a song at `index` (clamped to the end). Used to undo removals.
    pub fn insert_at(&mut self, index: usize, song: Song) {
        let index = index.min(self.songs.len());
        self.songs.insert(index, song);
    }

    /// Remove `title`, returning its former position and the song
    pub fn remove(&mut self, title: &str) -> Option<(usize, Song)> {
        let index = self.position(title)?;
        Some((index, self.songs.remove(index)))
    }
}

impl FromIterator<Song> for SongBook {
    fn from_iter<I: IntoIterator<Item = Song>>(iter: I) -> Self {
        let mut book = SongBook::new();
        for song in iter {
            book.insert(song.title, song.lyrics);
        }
        book
    }
}

impl<T: Into<String>, L: Into<String>> FromIterator<(T, L)> for SongBook {
    fn from_iter<I: IntoIterator<Item = (T, L)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(title, lyrics)| Song::new(title, lyrics))
            .collect()
    }
}

impl Serialize for SongBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.songs.len()))?;
        for song in &self.songs {
            map.serialize_entry(&song.title, &song.lyrics)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SongBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SongBookVisitor)
    }
}

struct SongBookVisitor;

impl<'de> Visitor<'de> for SongBookVisitor {
    type Value = SongBook;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping song titles to lyrics")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SongBook, A::Error> {
        let mut book = SongBook::new();
        // Repeated keys overwrite in place, as JSON.parse does
        while let Some((title, lyrics)) = access.next_entry::<String, String>()? {
            book.insert(title, lyrics);
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_songbook_keeps_insertion_order_through_json() {
        let json = r#"{"Zebra":"z","Apple":"a","Mango":"m"}"#;
        let book: SongBook = serde_json::from_str(json).unwrap();

        let titles: Vec<&str> = book.titles().collect();
        assert_eq!(titles, vec!["Zebra", "Apple", "Mango"]);
        assert_eq!(serde_json::to_string(&book).unwrap(), json);
    }

    #[test]
    fn test_songbook_insert_existing_keeps_position() {
        let mut book: SongBook = [("A", "1"), ("B", "2")].into_iter().collect();

        let previous = book.insert("A", "one");

        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(book.titles().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(book.get("A"), Some("one"));
    }

    #[test]
    fn test_songbook_remove_and_insert_at_restores_order() {
        let mut book: SongBook = [("A", "1"), ("B", "2"), ("C", "3")].into_iter().collect();

        let (index, song) = book.remove("B").unwrap();
        assert_eq!(index, 1);
        assert!(!book.contains("B"));

        book.insert_at(index, song);
        assert_eq!(book.titles().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_songbook_titles_are_case_sensitive() {
        let book: SongBook = [("Hello", "x")].into_iter().collect();
        assert!(book.contains("Hello"));
        assert!(!book.contains("hello"));
    }

    #[test]
    fn test_songbook_rejects_non_string_lyrics() {
        let result = serde_json::from_str::<SongBook>(r#"{"A": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_order_entry_hidden_defaults_to_false() {
        let entry: OrderEntry = serde_json::from_str(r#"{"title":"A"}"#).unwrap();
        assert_eq!(entry, OrderEntry::visible("A"));
    }
}
