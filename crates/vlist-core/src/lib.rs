#![forbid(unsafe_code)]

//! Core: the item store, filter predicates, view derivation, and the
//! observable view-state container.
//!
//! # Role in vlist
//! `vlist-core` owns *what* is displayed. It knows nothing about viewports
//! or rows; `vlist-widgets` takes the derived sequence from here and decides
//! which part of it to materialize.

pub mod item;
pub mod logging;
pub mod observable;
pub mod store;
pub mod view;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};

pub use item::{FilterType, Item, ParseFilterError};
pub use observable::{Observable, Subscription};
pub use store::{DEFAULT_ITEM_COUNT, ItemStore, MAX_ITEM_COUNT, ShuffleSeed, ViewStore};
pub use view::{ViewCache, ViewState, derive};
