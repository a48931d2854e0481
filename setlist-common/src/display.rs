//! Display ordinals for the song list
//!
//! The song list numbers its visible rows 1, 2, 3... Hidden rows carry no
//! number. While a row is being dragged the numbers preview the order the
//! list would have if the drop happened at the current target, so the user
//! sees where every song will land before letting go.
//!
//! Everything here is a pure function of (entries, filter, drag). Nothing is
//! mutated; the actual move happens when the drop is committed as a reorder.

use serde::{Deserialize, Serialize};

use crate::models::OrderEntry;

/// Which entries are rendered as rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// Case-insensitive substring match on the title; empty matches all
    pub search: String,
    /// Leave hidden entries out of the list entirely
    pub hide_hidden: bool,
}

impl RowFilter {
    pub fn matches(&self, entry: &OrderEntry) -> bool {
        if self.hide_hidden && entry.hidden {
            return false;
        }
        self.search.is_empty()
            || entry
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }
}

/// An in-progress drag, as indices into the unfiltered entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragState {
    pub source: usize,
    pub target: usize,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Index into the unfiltered entry list
    pub index: usize,
    pub title: String,
    pub hidden: bool,
    /// 1-based number shown beside the row; `None` for hidden entries
    pub ordinal: Option<usize>,
}

/// Compute the rows to render and the number each one shows.
///
/// Rows come back in their current order. A drag whose indices fall outside
/// `entries` is ignored.
pub fn display_rows(
    entries: &[OrderEntry],
    filter: &RowFilter,
    drag: Option<DragState>,
) -> Vec<DisplayRow> {
    let preview = preview_order(entries.len(), drag);

    let mut ordinals = vec![None; entries.len()];
    let mut next = 1;
    for &index in &preview {
        let entry = &entries[index];
        if !entry.hidden && filter.matches(entry) {
            ordinals[index] = Some(next);
            next += 1;
        }
    }

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry))
        .map(|(index, entry)| DisplayRow {
            index,
            title: entry.title.clone(),
            hidden: entry.hidden,
            ordinal: ordinals[index],
        })
        .collect()
}

/// Entry indices in the order they would have after dropping `drag`
fn preview_order(len: usize, drag: Option<DragState>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if let Some(DragState { source, target }) = drag {
        if source < len && target < len && source != target {
            let moved = order.remove(source);
            order.insert(target, moved);
        }
    }
    order
}
