//! Identity-keyed cursor that survives full-content refreshes.
//!
//! jj re-lists everything most-recent-first on every refresh, so a position
//! carries no meaning across refreshes: rewriting or abandoning a change
//! shifts every entry below it. The cursor is therefore carried across a
//! refresh by the selected item's key and looked up in the new list.

use std::collections::HashMap;

use crate::entity::Entity;

/// Items with a stable identity key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Entity {
    fn key(&self) -> &str {
        &self.token
    }
}

/// Map from key to the index of its first occurrence.
#[derive(Debug, Default)]
pub struct KeyIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> KeyIndex<'a> {
    pub fn build<T: Keyed>(items: &'a [T]) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            positions.entry(item.key()).or_insert(index);
        }
        Self { positions }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }
}

/// Computes the cursor for `items` given the key selected before the refresh.
///
/// Returns the index of the first item with that key, or `0` when there was
/// no selection, the list is empty, or the item is gone.
pub fn reconcile<T: Keyed>(previous: Option<&str>, items: &[T]) -> usize {
    let Some(previous) = previous else {
        return 0;
    };
    if items.is_empty() {
        return 0;
    }
    KeyIndex::build(items).get(previous).unwrap_or(0)
}

/// How [`Selection::replace`] placed the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Nothing was selected before the refresh.
    Fresh,
    /// The previously selected item is still present.
    Kept,
    /// The previously selected item disappeared; the cursor fell back to 0.
    Vanished,
}

/// An ordered item list with a cursor.
///
/// The cursor is always `< items.len()`, or `0` when the list is empty.
#[derive(Debug, Clone)]
pub struct Selection<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { items: Vec::new(), cursor: 0 }
    }
}

impl<T: Keyed> Selection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected().map(Keyed::key)
    }

    /// Replaces the whole list, carrying the cursor over by key.
    ///
    /// The previous key is captured before the old list is dropped.
    pub fn replace(&mut self, items: Vec<T>) -> Reconciled {
        let previous = self.selected_key().map(str::to_owned);
        self.items = items;
        self.cursor = reconcile(previous.as_deref(), &self.items);
        match previous {
            None => Reconciled::Fresh,
            Some(key) if self.selected_key() == Some(key.as_str()) => Reconciled::Kept,
            Some(_) => Reconciled::Vanished,
        }
    }

    /// Moves the cursor by `delta`, clamped to the list.
    pub fn move_by(&mut self, delta: isize) {
        self.select(self.cursor.saturating_add_signed(delta));
    }

    /// Selects `index`, clamped to the list.
    pub fn select(&mut self, index: usize) {
        self.cursor = index.min(self.items.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.items.len().saturating_sub(1);
    }

    /// Selects the first item with `key`. Returns false if there is none.
    pub fn select_key(&mut self, key: &str) -> bool {
        match KeyIndex::build(&self.items).get(key) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }
}
