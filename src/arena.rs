// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Index arena for mesh records.
//
// Half-edges and faces refer to each other through u32 indices instead of
// references, so cyclic next/previous links need no shared ownership.
// Records are only ever appended during a run; a record's index stays valid
// for the lifetime of the arena.

use core::ops::{Index, IndexMut};

/// An append-only arena backed by a Vec.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Store an item, returning its index.
    pub fn alloc(&mut self, item: T) -> u32 {
        let idx = self.items.len() as u32;
        self.items.push(item);
        idx
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate `(index, item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.items.iter().enumerate().map(|(i, t)| (i as u32, t))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u32> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: u32) -> &T {
        &self.items[idx as usize]
    }
}

impl<T> IndexMut<u32> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, idx: u32) -> &mut T {
        &mut self.items[idx as usize]
    }
}
