//! Order reconciliation
//!
//! Repairs the order store against the song store on every read:
//! - every song title gets exactly one entry (missing ones are appended, visible)
//! - existing entries keep their position and hidden flag
//! - entries whose song is gone (orphans) are kept as-is
//!
//! The repair only runs in the song → entry direction. Orphans are never
//! pruned, so a hidden entry survives until its song comes back or the user
//! reorders it away.

use std::collections::HashSet;

use crate::models::{OrderEntry, SongBook};

/// Outcome of a reconcile pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub order: Vec<OrderEntry>,
    /// True when `order` differs from the input and must be persisted
    pub repaired: bool,
}

/// Make sure every song in `songs` has an entry in `order`.
///
/// An empty order is rebuilt from the song store's insertion order. Otherwise
/// missing titles are appended in song store order. Duplicate entries are not
/// collapsed.
pub fn reconcile(songs: &SongBook, order: Vec<OrderEntry>) -> Reconciled {
    if order.is_empty() {
        let rebuilt: Vec<OrderEntry> = songs.titles().map(OrderEntry::visible).collect();
        let repaired = !rebuilt.is_empty();
        return Reconciled {
            order: rebuilt,
            repaired,
        };
    }

    let missing: Vec<OrderEntry> = {
        let known: HashSet<&str> = order.iter().map(|entry| entry.title.as_str()).collect();
        songs
            .titles()
            .filter(|title| !known.contains(title))
            .map(OrderEntry::visible)
            .collect()
    };

    if missing.is_empty() {
        return Reconciled {
            order,
            repaired: false,
        };
    }

    let mut order = order;
    order.extend(missing);
    Reconciled {
        order,
        repaired: true,
    }
}
