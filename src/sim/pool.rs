//! Fixed-capacity entity pools
//!
//! Every entity kind lives in a bounded arena: live entities occupy the
//! index range `[0, len)` with no holes, spawning into a full pool is a
//! silent drop (bounded-resource policy, not an error), and removal swaps
//! the last entity into the vacated slot. A loop that removes at index `i`
//! must revisit `i` before advancing so the swapped-in entity is not
//! skipped.

use serde::{Deserialize, Serialize};

/// Bounded arena with swap-compaction removal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entity. Returns false (and drops the entity) when full.
    pub fn spawn(&mut self, entity: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(entity);
        true
    }

    /// Swap-remove the entity at `i`. Out-of-range indices are a no-op.
    pub fn remove(&mut self, i: usize) -> Option<T> {
        if i < self.items.len() {
            Some(self.items.swap_remove(i))
        } else {
            None
        }
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.items.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.items.get_mut(i)
    }

    /// Mutable references to two distinct live entities. Panics if `i == j`.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut T, &mut T) {
        assert_ne!(i, j);
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (left, right) = self.items.split_at_mut(hi);
        if i < j {
            (&mut left[lo], &mut right[0])
        } else {
            (&mut right[0], &mut left[lo])
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> std::ops::Index<usize> for Pool<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.items[i]
    }
}

impl<T> std::ops::IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.items[i]
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Pool<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
