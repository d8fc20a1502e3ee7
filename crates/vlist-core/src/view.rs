#![forbid(unsafe_code)]

//! View parameters and the derivation of the visible item sequence.
//!
//! [`derive`] is the pure filter-then-maybe-sort step. [`ViewCache`] sits on
//! top of it and memoizes one result per [`ViewState`]; that is sound only
//! because the item sequence never changes after the store is built.

use std::collections::HashMap;
use std::sync::Arc;

use crate::item::{FilterType, Item};

/// User-controlled view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewState {
    /// Active parity filter.
    pub filter: FilterType,
    /// Whether the visible items are ordered by ascending id.
    pub sorted: bool,
}

impl ViewState {
    /// Create a view state.
    #[must_use]
    pub const fn new(filter: FilterType, sorted: bool) -> Self {
        Self { filter, sorted }
    }

    /// Copy of this state with a different filter.
    #[must_use]
    pub const fn with_filter(self, filter: FilterType) -> Self {
        Self { filter, ..self }
    }

    /// Copy of this state with a different sort flag.
    #[must_use]
    pub const fn with_sorted(self, sorted: bool) -> Self {
        Self { sorted, ..self }
    }
}

/// Compute the visible items for `filter` and `sorted`.
///
/// Unsorted output keeps the relative order of `items`. Sorted output is a
/// stable ascending sort by id.
#[must_use]
pub fn derive(items: &[Item], filter: FilterType, sorted: bool) -> Vec<Item> {
    let mut visible: Vec<Item> = items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();
    if sorted {
        visible.sort_by_key(|item| item.id);
    }
    crate::debug!(
        filter = filter.as_str(),
        sorted,
        len = visible.len(),
        "derived visible items"
    );
    visible
}

/// Memoized derivations keyed by [`ViewState`].
///
/// There are only six distinct states, so every entry is kept.
#[derive(Debug, Clone)]
pub struct ViewCache {
    items: Arc<[Item]>,
    memo: HashMap<ViewState, Arc<[Item]>>,
    hits: u64,
    misses: u64,
}

impl ViewCache {
    /// Create an empty cache over an immutable item sequence.
    #[must_use]
    pub fn new(items: Arc<[Item]>) -> Self {
        Self {
            items,
            memo: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Visible items for `state`, derived on first request.
    pub fn get(&mut self, state: ViewState) -> Arc<[Item]> {
        if let Some(hit) = self.memo.get(&state) {
            self.hits += 1;
            crate::trace!(filter = state.filter.as_str(), sorted = state.sorted, "view cache hit");
            return Arc::clone(hit);
        }
        self.misses += 1;
        let derived: Arc<[Item]> = derive(&self.items, state.filter, state.sorted).into();
        self.memo.insert(state, Arc::clone(&derived));
        derived
    }

    /// Drop every memoized sequence.
    pub fn invalidate(&mut self) {
        self.memo.clear();
    }

    /// Source items the cache derives from.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Requests answered from the memo.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Requests that had to derive.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
