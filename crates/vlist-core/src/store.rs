#![forbid(unsafe_code)]

//! Canonical item collection and the observable view state.

use std::sync::Arc;

use crate::item::{FilterType, Item};
use crate::observable::{Observable, Subscription};
use crate::view::ViewState;

/// Default number of generated items.
pub const DEFAULT_ITEM_COUNT: usize = 1000;

/// Largest store [`ItemStore::initialize`] builds; ids are `u32`.
pub const MAX_ITEM_COUNT: usize = u32::MAX as usize;

/// Random source for the one-time shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShuffleSeed {
    /// Seed from system entropy.
    #[default]
    Entropy,
    /// Reproducible shuffle.
    Fixed(u64),
}

impl ShuffleSeed {
    fn rng(self) -> fastrand::Rng {
        match self {
            Self::Entropy => fastrand::Rng::new(),
            Self::Fixed(seed) => fastrand::Rng::with_seed(seed),
        }
    }
}

/// Read-only, randomly ordered item collection.
///
/// Built once at startup; nothing mutates it afterwards, so it can be shared
/// freely.
#[derive(Debug, Clone)]
pub struct ItemStore {
    items: Arc<[Item]>,
}

impl ItemStore {
    /// Generate items `1..=count` and shuffle them.
    ///
    /// Counts past [`MAX_ITEM_COUNT`] are clamped to it.
    #[must_use]
    pub fn initialize(count: usize, seed: ShuffleSeed) -> Self {
        let last_id = id_limit(count);
        if last_id as usize != count {
            crate::warn!(count, last_id, "item count clamped to the id range");
        }
        let mut items: Vec<Item> = (1..=last_id).map(Item::numbered).collect();
        let mut rng = seed.rng();
        shuffle(&mut items, &mut rng);
        crate::info!(count, seed = ?seed, "item store initialized");
        Self {
            items: items.into(),
        }
    }

    /// Wrap an explicit item sequence as-is.
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// All items in store order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Shared handle to the item sequence.
    #[must_use]
    pub fn shared(&self) -> Arc<[Item]> {
        Arc::clone(&self.items)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Highest id for a store of `count` items.
fn id_limit(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Fisher–Yates: walk from the last index down to 1, swapping each slot with
/// a uniformly chosen slot in `[0, i]`.
fn shuffle<T>(slice: &mut [T], rng: &mut fastrand::Rng) {
    for i in (1..slice.len()).rev() {
        let j = rng.usize(0..=i);
        slice.swap(i, j);
    }
}

/// Observable container for the current [`ViewState`].
///
/// Writes that do not change the state are dropped without notifying.
#[derive(Debug, Clone)]
pub struct ViewStore {
    state: Observable<ViewState>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

impl ViewStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: ViewState) -> Self {
        Self {
            state: Observable::new(initial),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state.get()
    }

    /// Select a filter. Returns `true` if the state changed.
    pub fn set_filter(&self, filter: FilterType) -> bool {
        self.commit(self.state().with_filter(filter))
    }

    /// Set the sort flag. Returns `true` if the state changed.
    pub fn set_sorted(&self, sorted: bool) -> bool {
        self.commit(self.state().with_sorted(sorted))
    }

    /// Flip the sort flag.
    pub fn toggle_sorted(&self) -> bool {
        let sorted = !self.state().sorted;
        self.set_sorted(sorted)
    }

    /// Number of committed changes.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Run `callback` after every committed change.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&ViewState) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }

    fn commit(&self, next: ViewState) -> bool {
        let changed = self.state.set(next);
        if changed {
            crate::debug!(
                filter = next.filter.as_str(),
                sorted = next.sorted,
                version = self.state.version(),
                "view state committed"
            );
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn initialize_generates_a_permutation() {
        let store = ItemStore::initialize(100, ShuffleSeed::Fixed(7));
        assert_eq!(store.len(), 100);

        let mut ids: Vec<u32> = store.items().iter().map(|i| i.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=100).collect::<Vec<_>>());
        for item in store.items() {
            assert_eq!(item.text, format!("item {}", item.id));
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = ItemStore::initialize(50, ShuffleSeed::Fixed(42));
        let b = ItemStore::initialize(50, ShuffleSeed::Fixed(42));
        assert_eq!(a.items(), b.items());
    }

    #[test]
    fn shuffle_actually_reorders() {
        let store = ItemStore::initialize(1000, ShuffleSeed::Fixed(1));
        let in_place = store
            .items()
            .iter()
            .enumerate()
            .filter(|(pos, item)| item.id as usize == pos + 1)
            .count();
        assert!(in_place < 50, "{in_place} items never moved");
    }

    #[test]
    fn id_limit_clamps_instead_of_wrapping() {
        assert_eq!(id_limit(0), 0);
        assert_eq!(id_limit(1000), 1000);
        assert_eq!(id_limit(MAX_ITEM_COUNT), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        {
            assert_eq!(id_limit(MAX_ITEM_COUNT + 1), u32::MAX);
            assert_eq!(id_limit((1 << 32) | 5), u32::MAX);
        }
    }

    #[test]
    fn zero_and_one_items() {
        assert!(ItemStore::initialize(0, ShuffleSeed::Fixed(3)).is_empty());
        let one = ItemStore::initialize(1, ShuffleSeed::Fixed(3));
        assert_eq!(one.items(), &[Item::numbered(1)]);
    }

    #[test]
    fn shared_handle_points_at_same_items() {
        let store = ItemStore::from_items(vec![Item::numbered(2), Item::numbered(1)]);
        let shared = store.shared();
        assert_eq!(&*shared, store.items());
    }

    #[test]
    fn view_store_commits_and_notifies() {
        let store = ViewStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            store.subscribe(move |s| seen.borrow_mut().push(*s))
        };

        assert!(store.set_filter(FilterType::Odd));
        assert!(!store.set_filter(FilterType::Odd));
        assert!(store.toggle_sorted());

        assert_eq!(store.state(), ViewState::new(FilterType::Odd, true));
        assert_eq!(store.version(), 2);
        assert_eq!(
            *seen.borrow(),
            vec![
                ViewState::new(FilterType::Odd, false),
                ViewState::new(FilterType::Odd, true),
            ]
        );
    }

    #[test]
    fn unchanged_writes_do_not_notify() {
        let store = ViewStore::new(ViewState::new(FilterType::Even, true));
        let hits = Rc::new(RefCell::new(0));
        let _sub = {
            let hits = Rc::clone(&hits);
            store.subscribe(move |_| *hits.borrow_mut() += 1)
        };

        assert!(!store.set_sorted(true));
        assert!(!store.set_filter(FilterType::Even));
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(store.version(), 0);
    }
}
