// Copyright 2025 Lars Brubaker
// License: MIT
//
// Vec-backed arena with a free list. Beachline arcs are created and
// destroyed constantly during the sweep; slots are recycled so handles stay
// small `u32` indices and never dangle into reallocated memory.

use std::ops::{Index, IndexMut};

/// Null handle.
pub const INVALID: u32 = u32::MAX;

pub struct Pool<T> {
    items: Vec<Option<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store `item`, reusing a freed slot when one is available.
    pub fn insert(&mut self, item: T) -> u32 {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            self.items[idx as usize] = Some(item);
            idx
        } else {
            let idx = self.items.len() as u32;
            self.items.push(Some(item));
            idx
        }
    }

    /// Release a slot. Returns the stored item, or `None` if the slot was already free.
    pub fn remove(&mut self, idx: u32) -> Option<T> {
        let item = self.items.get_mut(idx as usize)?.take()?;
        self.free_list.push(idx);
        self.live -= 1;
        Some(item)
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.items.get_mut(idx as usize)?.as_mut()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.free_list.clear();
        self.live = 0;
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u32> for Pool<T> {
    type Output = T;

    fn index(&self, idx: u32) -> &T {
        match self.get(idx) {
            Some(item) => item,
            None => panic!("pool slot {} is not live", idx),
        }
    }
}

impl<T> IndexMut<u32> for Pool<T> {
    fn index_mut(&mut self, idx: u32) -> &mut T {
        match self.get_mut(idx) {
            Some(item) => item,
            None => panic!("pool slot {} is not live", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut pool: Pool<&str> = Pool::new();
        let a = pool.insert("a");
        let b = pool.insert("b");
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.remove(a), Some("a"));
        let c = pool.insert("c");
        // c reuses a's slot
        assert_eq!(c, a);
        assert_eq!(pool[c], "c");
        assert_eq!(pool[b], "b");
    }

    #[test]
    fn double_remove_is_noop() {
        let mut pool = Pool::new();
        let idx = pool.insert(7);
        assert_eq!(pool.remove(idx), Some(7));
        assert_eq!(pool.remove(idx), None);
        assert!(pool.is_empty());
        assert!(pool.get(idx).is_none());
    }
}
