#![forbid(unsafe_code)]

//! List items and the filter predicates over them.

use std::fmt;
use std::str::FromStr;

/// A single list entry.
///
/// Items are created in bulk by [`ItemStore`](crate::store::ItemStore) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Unique id, starting at 1.
    pub id: u32,
    /// Display text.
    pub text: String,
}

impl Item {
    /// Create the canonical item for `id` (text `"item {id}"`).
    #[must_use]
    pub fn numbered(id: u32) -> Self {
        Self {
            id,
            text: format!("item {id}"),
        }
    }
}

/// Which items the list shows, decided by the parity of their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterType {
    /// Every item.
    #[default]
    All,
    /// Items with an odd id.
    Odd,
    /// Items with an even id.
    Even,
}

impl FilterType {
    /// All filters, in radio-button order.
    pub const ALL: [FilterType; 3] = [FilterType::All, FilterType::Odd, FilterType::Even];

    /// Whether `item` passes this filter.
    #[inline]
    #[must_use]
    pub fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Odd => item.id % 2 == 1,
            Self::Even => item.id % 2 == 0,
        }
    }

    /// Lowercase label used by the radio controls and the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Odd => "odd",
            Self::Even => "even",
        }
    }

    /// The next filter in radio order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Odd,
            Self::Odd => Self::Even,
            Self::Even => Self::All,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError(pub String);

impl fmt::Display for ParseFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter '{}' (expected all, odd or even)", self.0)
    }
}

impl std::error::Error for ParseFilterError {}

impl FromStr for FilterType {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "odd" => Ok(Self::Odd),
            "even" => Ok(Self::Even),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
