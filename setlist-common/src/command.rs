//! Command objects
//!
//! Every mutation is a `Command`. Applying one to a `Library` yields an
//! `Applied` record that knows exactly how to undo it, which is what the
//! optimistic client view uses to roll back after a failed save.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::library::{Library, Removed};
use crate::models::{entry_position, OrderEntry, Song};

/// A single mutation of the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Add { title: String, lyrics: String },
    Delete { title: String },
    Rename { old_title: String, new_title: String },
    UpdateLyrics { title: String, lyrics: String },
    ToggleHidden { title: String },
    Reorder { order: Vec<OrderEntry> },
    MoveToTop { title: String },
}

/// Which persisted documents a command changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub songs: bool,
    pub order: bool,
}

impl Touched {
    const SONGS: Touched = Touched { songs: true, order: false };
    const ORDER: Touched = Touched { songs: false, order: true };
    const BOTH: Touched = Touched { songs: true, order: true };
}

/// Inverse of an applied command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Undo {
    Add { title: String },
    Delete(Removed),
    Rename { old_title: String, new_title: String, song_index: usize },
    UpdateLyrics { title: String, previous: String },
    ToggleHidden { title: String },
    Reorder { previous: Vec<OrderEntry> },
    MoveToTop { from: usize },
}

/// A command that has been applied, together with its inverse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    command: Command,
    undo: Undo,
}

impl Command {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Delete { .. } => "delete",
            Command::Rename { .. } => "rename",
            Command::UpdateLyrics { .. } => "update_lyrics",
            Command::ToggleHidden { .. } => "toggle_hidden",
            Command::Reorder { .. } => "reorder",
            Command::MoveToTop { .. } => "move_to_top",
        }
    }

    /// Validate and mutate `library`. On error the library is unchanged.
    pub fn apply(self, library: &mut Library) -> Result<Applied> {
        let undo = match &self {
            Command::Add { title, lyrics } => {
                library.add(title, lyrics)?;
                Undo::Add { title: title.clone() }
            }
            Command::Delete { title } => Undo::Delete(library.delete(title)?),
            Command::Rename { old_title, new_title } => {
                let song_index = library.rename(old_title, new_title)?;
                Undo::Rename {
                    old_title: old_title.clone(),
                    new_title: new_title.clone(),
                    song_index,
                }
            }
            Command::UpdateLyrics { title, lyrics } => {
                let previous = library.update_lyrics(title, lyrics)?;
                Undo::UpdateLyrics {
                    title: title.clone(),
                    previous,
                }
            }
            Command::ToggleHidden { title } => {
                library.toggle_hidden(title)?;
                Undo::ToggleHidden { title: title.clone() }
            }
            Command::Reorder { order } => Undo::Reorder {
                previous: library.reorder(order.clone()),
            },
            Command::MoveToTop { title } => Undo::MoveToTop {
                from: library.move_to_top(title)?,
            },
        };
        Ok(Applied { command: self, undo })
    }
}

impl Applied {
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Documents that must be written to persist this command
    pub fn touched(&self) -> Touched {
        match self.command {
            Command::Add { .. } | Command::Delete { .. } | Command::Rename { .. } => Touched::BOTH,
            Command::UpdateLyrics { .. } => Touched::SONGS,
            Command::ToggleHidden { .. } | Command::Reorder { .. } | Command::MoveToTop { .. } => {
                Touched::ORDER
            }
        }
    }

    /// Undo the command on the library it was applied to
    pub fn revert(self, library: &mut Library) {
        match self.undo {
            Undo::Add { title } => {
                library.songs.remove(&title);
                if let Some(index) = library.order.iter().rposition(|e| e.title == title) {
                    library.order.remove(index);
                }
            }
            Undo::Delete(removed) => {
                library.songs.insert_at(removed.song_index, removed.song);
                if let Some((index, entry)) = removed.entry {
                    let index = index.min(library.order.len());
                    library.order.insert(index, entry);
                }
            }
            Undo::Rename {
                old_title,
                new_title,
                song_index,
            } => {
                if let Some((_, song)) = library.songs.remove(&new_title) {
                    library.songs.insert_at(song_index, Song::new(old_title.clone(), song.lyrics));
                }
                if let Some(index) = entry_position(&library.order, &new_title) {
                    library.order[index].title = old_title;
                }
            }
            Undo::UpdateLyrics { title, previous } => {
                library.songs.insert(title, previous);
            }
            Undo::ToggleHidden { title } => {
                if let Some(index) = entry_position(&library.order, &title) {
                    let entry = &mut library.order[index];
                    entry.hidden = !entry.hidden;
                }
            }
            Undo::Reorder { previous } => {
                library.order = previous;
            }
            Undo::MoveToTop { from } => {
                if !library.order.is_empty() {
                    let entry = library.order.remove(0);
                    let from = from.min(library.order.len());
                    library.order.insert(from, entry);
                }
            }
        }
    }
}
