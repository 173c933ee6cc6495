// Copyright 2025 Lars Brubaker
// Memoizing wrapper around Triangulator for shapes that repeat.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::Triangulator;
use crate::error::Result;

/// Caches triangulations keyed by the exact bit pattern of the input
/// coordinates. Errors are never cached.
#[derive(Debug, Default)]
pub struct ShapeCache {
    triangulator: Triangulator,
    entries: HashMap<Vec<u32>, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl ShapeCache {
    pub fn new(triangulator: Triangulator) -> Self {
        ShapeCache {
            triangulator,
            ..Default::default()
        }
    }

    pub fn get_or_triangulate(&mut self, points: &[f32]) -> Result<&[f32]> {
        let key: Vec<u32> = points.iter().map(|c| c.to_bits()).collect();
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                log::trace!("shape cache hit ({} points)", points.len() / 3);
                Ok(entry.into_mut().as_slice())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                let triangles = self.triangulator.triangulate(points)?;
                Ok(entry.insert(triangles).as_slice())
            }
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
