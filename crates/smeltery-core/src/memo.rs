//! Memoized derived state with explicit invalidation.
//!
//! Mixtures derive two values from their contents: the visible (above-epsilon)
//! view and the resolved identity. Both are expensive relative to a single
//! `add`, so they are computed lazily on first read and dropped on every
//! mutation. Reads only need `&self`.

use std::cell::{Cell, OnceCell};

/// A lazily computed value that is cleared whenever its source changes.
#[derive(Debug, Clone, Default)]
pub struct Memo<T> {
    value: OnceCell<T>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            value: OnceCell::new(),
        }
    }

    /// Return the memoized value, computing it with `f` if it is stale.
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.value.get_or_init(f)
    }

    /// Returns `true` if a value is currently memoized.
    #[cfg(test)]
    pub fn is_fresh(&self) -> bool {
        self.value.get().is_some()
    }

    /// Mark the value stale.
    pub fn invalidate(&mut self) {
        self.value.take();
    }
}

/// A memoized `Copy` value tagged with the key it was computed for.
///
/// A lookup under a different key is a miss, and the next `store` replaces the
/// entry. Used for results that depend on an external input (the catalog).
#[derive(Debug, Clone)]
pub struct KeyedMemo<K: Copy + Eq, V: Copy> {
    entry: Cell<Option<(K, V)>>,
}

impl<K: Copy + Eq, V: Copy> Default for KeyedMemo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq, V: Copy> KeyedMemo<K, V> {
    pub fn new() -> Self {
        Self {
            entry: Cell::new(None),
        }
    }

    pub fn get(&self, key: K) -> Option<V> {
        match self.entry.get() {
            Some((k, v)) if k == key => Some(v),
            _ => None,
        }
    }

    pub fn store(&self, key: K, value: V) {
        self.entry.set(Some((key, value)));
    }

    pub fn invalidate(&mut self) {
        self.entry.set(None);
    }
}
