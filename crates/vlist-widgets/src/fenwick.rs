#![forbid(unsafe_code)]

//! Fenwick tree (binary indexed tree) over row heights.
//!
//! Entry `i` holds the height of row `i`; `prefix(i)` is therefore the
//! bottom edge of row `i` and `prefix(i - 1)` its top edge. Point updates
//! and prefix queries are O(log n), and [`FenwickTree::find_prefix`] turns a
//! scroll offset into a row index in O(log n) without a linear scan.
//!
//! Storage is a single 1-indexed `Vec<u64>` (slot 0 unused). Sums are kept
//! exact in `u64` and clamp to `u32::MAX` on the way out.

/// Prefix-sum tree over `u32` row heights.
#[derive(Debug, Clone, Default)]
pub struct FenwickTree {
    tree: Vec<u64>,
    n: usize,
}

impl FenwickTree {
    /// Build from row heights in O(n).
    #[must_use]
    pub fn from_values(values: &[u32]) -> Self {
        let mut ft = Self {
            tree: vec![0; values.len() + 1],
            n: values.len(),
        };
        ft.rebuild(values);
        ft
    }

    /// Number of rows tracked.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether no rows are tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Replace all heights in O(n), resizing if the row count changed.
    pub fn rebuild(&mut self, values: &[u32]) {
        self.n = values.len();
        self.tree.clear();
        self.tree.push(0);
        self.tree.extend(values.iter().map(|&v| u64::from(v)));
        for i in 1..=self.n {
            let parent = i + lowbit(i);
            if parent <= self.n {
                self.tree[parent] += self.tree[i];
            }
        }
    }

    /// Sum of heights of rows `0..=i`, saturating at `u32::MAX`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn prefix(&self, i: usize) -> u32 {
        clamp_u32(self.sum_to(i))
    }

    /// Height of row `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> u32 {
        clamp_u32(self.raw_get(i))
    }

    /// Overwrite the height of row `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn set(&mut self, i: usize, value: u32) {
        // Exact sums never exceed u64, so a wrapped delta still lands right.
        let delta = u64::from(value).wrapping_sub(self.raw_get(i));
        let mut idx = i + 1;
        while idx <= self.n {
            self.tree[idx] = self.tree[idx].wrapping_add(delta);
            idx += lowbit(idx);
        }
    }

    /// Sum of all heights.
    #[must_use]
    pub fn total(&self) -> u32 {
        if self.n == 0 { 0 } else { self.prefix(self.n - 1) }
    }

    /// Largest `i` with `prefix(i) <= target`, or `None` if even row 0 ends
    /// past `target`.
    ///
    /// Because `prefix(i)` is the top of row `i + 1`, the row containing
    /// offset `target` is `find_prefix(target).map_or(0, |i| i + 1)`.
    #[must_use]
    pub fn find_prefix(&self, target: u32) -> Option<usize> {
        let mut pos = 0usize;
        let mut remaining = u64::from(target);
        let mut step = highest_power_of_two(self.n);
        while step > 0 {
            let next = pos + step;
            if next <= self.n && self.tree[next] <= remaining {
                remaining -= self.tree[next];
                pos = next;
            }
            step >>= 1;
        }
        // `pos` counts rows whose cumulative height fits in `target`.
        pos.checked_sub(1)
    }

    fn sum_to(&self, i: usize) -> u64 {
        assert!(i < self.n, "row {i} out of bounds (rows={})", self.n);
        let mut sum = 0u64;
        let mut idx = i + 1;
        while idx > 0 {
            sum += self.tree[idx];
            idx -= lowbit(idx);
        }
        sum
    }

    fn raw_get(&self, i: usize) -> u64 {
        if i == 0 {
            self.sum_to(0)
        } else {
            self.sum_to(i) - self.sum_to(i - 1)
        }
    }
}

#[inline]
fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[inline]
fn lowbit(x: usize) -> usize {
    x & x.wrapping_neg()
}

#[inline]
fn highest_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}
