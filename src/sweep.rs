// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep ordering of polygon vertices.
//
// The sweep line never moves vertex data; it holds an index permutation of
// the vertex array sorted ascending by projected y, ties broken by ascending
// x. Small inputs keep the permutation inline to avoid heap traffic. The
// buffer can be handed back and reused for the next sub-polygon.

use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::geom::vert_cmp;
use crate::mesh::VertIdx;
use crate::plane::PlanarVertex;

/// Below this many vertices the permutation lives in inline storage.
pub const INLINE_VERTICES: usize = 256;

/// Slices at or below this length are finished with insertion sort.
const INSERTION_SORT_THRESHOLD: usize = 16;

pub type Permutation = SmallVec<[VertIdx; INLINE_VERTICES]>;

/// Read-only sorted view over a vertex array.
pub struct SweepLine<'a> {
    verts: &'a [PlanarVertex],
    order: Permutation,
}

impl<'a> SweepLine<'a> {
    pub fn new(verts: &'a [PlanarVertex]) -> Self {
        Self::with_buffer(verts, Permutation::new())
    }

    /// Build the ordering in a recycled buffer.
    pub fn with_buffer(verts: &'a [PlanarVertex], mut buffer: Permutation) -> Self {
        buffer.clear();
        buffer.extend(0..verts.len() as VertIdx);
        sort_permutation(verts, &mut buffer);
        SweepLine {
            verts,
            order: buffer,
        }
    }

    /// Give the permutation buffer back for reuse.
    pub fn into_buffer(self) -> Permutation {
        self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Vertex at ascending rank `rank`.
    #[inline]
    pub fn get(&self, rank: usize) -> &PlanarVertex {
        &self.verts[self.order[rank] as usize]
    }

    pub fn order(&self) -> &[VertIdx] {
        &self.order
    }
}

#[inline]
fn below(verts: &[PlanarVertex], a: VertIdx, b: VertIdx) -> bool {
    let u = &verts[a as usize];
    let v = &verts[b as usize];
    vert_cmp(u.x, u.y, v.x, v.y) == Ordering::Less
}

/// Sort `order` ascending by (y, x) of the referenced vertices.
pub fn sort_permutation(verts: &[PlanarVertex], order: &mut [VertIdx]) {
    let mut slice = order;
    // Recurse into the smaller half, iterate on the larger.
    loop {
        if slice.len() <= INSERTION_SORT_THRESHOLD {
            insertion_sort(verts, slice);
            return;
        }
        let split = partition(verts, slice);
        let (left, right) = core::mem::take(&mut slice).split_at_mut(split);
        if left.len() < right.len() {
            sort_permutation(verts, left);
            slice = right;
        } else {
            sort_permutation(verts, right);
            slice = left;
        }
    }
}

fn insertion_sort(verts: &[PlanarVertex], order: &mut [VertIdx]) {
    for i in 1..order.len() {
        let key = order[i];
        let mut j = i;
        while j > 0 && below(verts, key, order[j - 1]) {
            order[j] = order[j - 1];
            j -= 1;
        }
        order[j] = key;
    }
}

/// Hoare partition around the element a quarter of the way in.
/// Returns a split point strictly inside the slice: everything before it is
/// not above the pivot and everything from it on is not below the pivot.
fn partition(verts: &[PlanarVertex], order: &mut [VertIdx]) -> usize {
    let pivot = order[order.len() / 4];
    let mut i = 0;
    let mut j = order.len() - 1;
    loop {
        while below(verts, order[i], pivot) {
            i += 1;
        }
        while below(verts, pivot, order[j]) {
            j -= 1;
        }
        if i >= j {
            return j + 1;
        }
        order.swap(i, j);
        i += 1;
        j -= 1;
    }
}
