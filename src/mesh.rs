// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh (doubly-connected edge list) for planar polygon subdivision.
//
// Design:
//   - INVALID: u32::MAX  (null index)
//   - Vertices are stored by value and addressed by their position in
//     `verts`; PlanarVertex::id keeps the index of the input point.
//   - Half-edges and faces live in append-only arenas. A half-edge is never
//     destroyed; inserting a diagonal creates two new half-edges and one new
//     face and moves part of the old boundary over to it.
//   - Every live face keeps its boundary twice: as an ordered vertex list and
//     as the matching half-edge list. edges[k] runs from verts[k] to
//     verts[k + 1] and its `next` link is edges[k + 1] (cyclically).
//   - Boundaries are counter-clockwise: the face interior is on the left of
//     every half-edge.

use smallvec::SmallVec;

use crate::arena::Arena;
use crate::error::{Result, TriangulationError};
use crate::geom::{edge_x_at, point_in_polygon, Real};
use crate::monotone::{classify, VertexType};
use crate::plane::PlanarVertex;

pub const INVALID: u32 = u32::MAX;

/// Index into Dcel::verts
pub type VertIdx = u32;
/// Index into Dcel::faces
pub type FaceIdx = u32;
/// Index into Dcel::edges
pub type EdgeIdx = u32;

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub from: VertIdx,
    pub to: VertIdx,
    /// Face on the left of this half-edge.
    pub face: FaceIdx,
    /// Next half-edge along the face boundary.
    pub next: EdgeIdx,
    /// Previous half-edge along the face boundary.
    pub prev: EdgeIdx,
}

#[derive(Clone, Debug, Default)]
pub struct Face {
    pub verts: Vec<VertIdx>,
    pub edges: Vec<EdgeIdx>,
    /// Cleared once the face has been extracted by `remove_sub_polygon`.
    pub live: bool,
}

/// The half-edge mesh.
pub struct Dcel {
    pub verts: Vec<PlanarVertex>,
    pub edges: Arena<HalfEdge>,
    pub faces: Arena<Face>,
    /// Outgoing half-edges of every vertex.
    vert_edges: Vec<SmallVec<[EdgeIdx; 4]>>,
}

impl Dcel {
    /// Create a mesh over `verts` with no faces or edges.
    pub fn new(verts: Vec<PlanarVertex>) -> Self {
        let n = verts.len();
        Dcel {
            verts,
            edges: Arena::with_capacity(n * 2),
            faces: Arena::new(),
            vert_edges: vec![SmallVec::new(); n],
        }
    }

    /// Create a mesh with a single face whose boundary visits `verts` in
    /// order. The vertices must already wind counter-clockwise.
    pub fn from_polygon(verts: Vec<PlanarVertex>) -> Self {
        let n = verts.len() as VertIdx;
        let mut mesh = Dcel::new(verts);
        if n == 0 {
            return mesh;
        }
        let face = mesh.create_face();
        for v in 0..n {
            mesh.create_edge(v, (v + 1) % n, face);
        }
        let edges = mesh.faces[face].edges.clone();
        for k in 0..edges.len() {
            mesh.link(edges[k], edges[(k + 1) % edges.len()]);
        }
        mesh.faces[face].verts = (0..n).collect();
        mesh
    }

    // ──────────────────────────── Primitive operations ────────────────────────────

    /// Allocate a new, empty, live face.
    pub fn create_face(&mut self) -> FaceIdx {
        self.faces.alloc(Face {
            verts: Vec::new(),
            edges: Vec::new(),
            live: true,
        })
    }

    /// Allocate a half-edge `from -> to` on `face`. The edge is recorded in
    /// the vertex and face edge lists but is not linked into any cycle.
    pub fn create_edge(&mut self, from: VertIdx, to: VertIdx, face: FaceIdx) -> EdgeIdx {
        let e = self.edges.alloc(HalfEdge {
            from,
            to,
            face,
            next: INVALID,
            prev: INVALID,
        });
        self.vert_edges[from as usize].push(e);
        self.faces[face].edges.push(e);
        e
    }

    /// Make `b` follow `a` along their face boundary.
    #[inline]
    pub fn link(&mut self, a: EdgeIdx, b: EdgeIdx) {
        self.edges[a].next = b;
        self.edges[b].prev = a;
    }

    // ──────────────────────────────── Queries ────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn xy(&self, v: VertIdx) -> [Real; 2] {
        self.verts[v as usize].xy()
    }

    /// Outgoing half-edges of `v`.
    pub fn outgoing(&self, v: VertIdx) -> &[EdgeIdx] {
        &self.vert_edges[v as usize]
    }

    /// True if a half-edge joins `v` and `u` in either direction.
    pub fn is_connected(&self, v: VertIdx, u: VertIdx) -> bool {
        self.outgoing(v).iter().any(|&e| self.edges[e].to == u)
            || self.outgoing(u).iter().any(|&e| self.edges[e].to == v)
    }

    /// The outgoing half-edge of `v` on `face`, if `v` is on its boundary.
    pub fn edge_from_on(&self, v: VertIdx, face: FaceIdx) -> Option<EdgeIdx> {
        self.outgoing(v)
            .iter()
            .copied()
            .find(|&e| self.edges[e].face == face)
    }

    /// Boundary neighbors (previous, next) of `v` on its first live face.
    pub fn neighbors(&self, v: VertIdx) -> Option<(VertIdx, VertIdx)> {
        let e = self
            .outgoing(v)
            .iter()
            .copied()
            .find(|&e| self.faces[self.edges[e].face].live)?;
        let prev = self.edges[self.edges[e].prev].from;
        Some((prev, self.edges[e].to))
    }

    /// Live faces, in creation order.
    pub fn live_faces(&self) -> impl Iterator<Item = FaceIdx> + '_ {
        self.faces.iter().filter(|(_, f)| f.live).map(|(i, _)| i)
    }

    pub fn face_count(&self) -> usize {
        self.live_faces().count()
    }

    pub fn face_vertices(&self, face: FaceIdx) -> &[VertIdx] {
        &self.faces[face].verts
    }

    /// Every live face with exactly three vertices, as vertex indices.
    pub fn triangles(&self) -> impl Iterator<Item = [VertIdx; 3]> + '_ {
        self.faces
            .iter()
            .filter(|(_, f)| f.live && f.verts.len() == 3)
            .map(|(_, f)| [f.verts[0], f.verts[1], f.verts[2]])
    }

    /// Check that every live face's half-edge cycle matches its vertex list.
    pub fn is_consistent(&self) -> bool {
        for f in self.live_faces() {
            let face = &self.faces[f];
            let n = face.verts.len();
            if face.edges.len() != n {
                return false;
            }
            for k in 0..n {
                let e = &self.edges[face.edges[k]];
                let next = face.edges[(k + 1) % n];
                if e.face != f
                    || e.from != face.verts[k]
                    || e.to != face.verts[(k + 1) % n]
                    || e.next != next
                    || self.edges[next].prev != face.edges[k]
                {
                    return false;
                }
            }
        }
        true
    }

    // ──────────────────────────── Sweep helpers ──────────────────────────────────

    /// Classify `v` from its neighbors on the face boundary.
    pub fn discover_type(&self, v: VertIdx) -> VertexType {
        match self.neighbors(v) {
            Some((p, q)) => classify(
                &self.verts[p as usize],
                &self.verts[v as usize],
                &self.verts[q as usize],
            ),
            None => VertexType::Regular,
        }
    }

    /// X coordinate where edge `e` crosses height `y`.
    #[inline]
    pub fn edge_x(&self, e: EdgeIdx, y: Real) -> Real {
        let edge = &self.edges[e];
        edge_x_at(self.xy(edge.from), self.xy(edge.to), y)
    }

    /// Among the `active` edges, the one nearest to the left of `v` at the
    /// height of `v`. Edges touching `v` are ignored. `active` must be
    /// sorted left to right at that height.
    pub fn find_left_edge(&self, v: VertIdx, active: &[EdgeIdx]) -> Option<EdgeIdx> {
        let [vx, vy] = self.xy(v);
        let split = active.partition_point(|&e| self.edge_x(e, vy) < vx);
        active[..split].iter().rev().copied().find(|&e| {
            let edge = &self.edges[e];
            edge.from != v && edge.to != v
        })
    }

    // ─────────────────────────── Diagonal insertion ──────────────────────────────

    /// The live face that has both `v` and `u` on its boundary and contains
    /// the midpoint of segment v-u.
    fn shared_face(&self, v: VertIdx, u: VertIdx) -> Result<FaceIdx> {
        let candidates: SmallVec<[FaceIdx; 4]> = self
            .outgoing(v)
            .iter()
            .map(|&e| self.edges[e].face)
            .filter(|&f| self.faces[f].live && self.edge_from_on(u, f).is_some())
            .collect();
        if candidates.len() == 1 {
            return Ok(candidates[0]);
        }

        let [vx, vy] = self.xy(v);
        let [ux, uy] = self.xy(u);
        let mid = [(vx + ux) * 0.5, (vy + uy) * 0.5];
        for &f in &candidates {
            let poly: Vec<[Real; 2]> = self.faces[f].verts.iter().map(|&w| self.xy(w)).collect();
            if point_in_polygon(mid, &poly) {
                return Ok(f);
            }
        }
        Err(TriangulationError::PointOutsideFaces { from: v, to: u })
    }

    /// Insert the diagonal v-u, splitting the face that contains it in two.
    ///
    /// The boundary run from `v` to `u` moves to a new face closed by the
    /// half-edge `u -> v`; the run from `u` back to `v` stays on the original
    /// face, closed by `v -> u`. Returns the new face, or None when nothing
    /// was inserted (`v == u` or the vertices are already joined).
    pub fn connect(&mut self, v: VertIdx, u: VertIdx) -> Result<Option<FaceIdx>> {
        if v == u {
            return Ok(None);
        }
        if self.is_connected(v, u) {
            log::trace!("skipping diagonal {}-{}: already connected", v, u);
            return Ok(None);
        }
        let face = self.shared_face(v, u)?;

        let (old_verts, old_edges) = {
            let f = &mut self.faces[face];
            (core::mem::take(&mut f.verts), core::mem::take(&mut f.edges))
        };
        let n = old_verts.len();
        let i = old_verts.iter().position(|&w| w == v).ok_or(TriangulationError::PointOutsideFaces {
            from: v,
            to: u,
        })?;
        let j = old_verts.iter().position(|&w| w == u).ok_or(TriangulationError::PointOutsideFaces {
            from: v,
            to: u,
        })?;

        // Split the cyclic boundary into the runs [i..=j] and [j..=i].
        let run = |start: usize, end: usize| {
            let mut verts = Vec::new();
            let mut edges = Vec::new();
            let mut k = start;
            loop {
                verts.push(old_verts[k]);
                if k == end {
                    break;
                }
                edges.push(old_edges[k]);
                k = (k + 1) % n;
            }
            (verts, edges)
        };
        let (new_verts, mut new_edges) = run(i, j);
        let (kept_verts, mut kept_edges) = run(j, i);

        let new_face = self.create_face();
        let e_uv = self.create_edge(u, v, new_face);
        let e_vu = self.create_edge(v, u, face);
        new_edges.push(e_uv);
        kept_edges.push(e_vu);

        for &e in &new_edges {
            self.edges[e].face = new_face;
        }
        for k in 0..new_edges.len() {
            self.link(new_edges[k], new_edges[(k + 1) % new_edges.len()]);
        }
        for k in 0..kept_edges.len() {
            self.link(kept_edges[k], kept_edges[(k + 1) % kept_edges.len()]);
        }

        self.faces[new_face].verts = new_verts;
        self.faces[new_face].edges = new_edges;
        self.faces[face].verts = kept_verts;
        self.faces[face].edges = kept_edges;

        log::trace!("diagonal {}-{} split face {} (new face {})", v, u, face, new_face);
        Ok(Some(new_face))
    }

    // ─────────────────────────── Sub-polygon extraction ──────────────────────────

    /// Detach the most recently created live face and return it as an
    /// independent single-face mesh. Returns None once no live face remains.
    pub fn remove_sub_polygon(&mut self) -> Option<Dcel> {
        let face = self.live_faces().last()?;
        self.faces[face].live = false;

        let start = *self.faces[face].edges.first()?;
        let mut verts = Vec::with_capacity(self.faces[face].verts.len());
        let mut e = start;
        loop {
            verts.push(self.verts[self.edges[e].from as usize]);
            e = self.edges[e].next;
            if e == start || e == INVALID {
                break;
            }
        }
        Some(Dcel::from_polygon(verts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_from(xy: &[(f64, f64)]) -> Dcel {
        let verts = xy
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| PlanarVertex {
                id: i as VertIdx,
                coords: [x as f32, y as f32, 0.0],
                x,
                y,
            })
            .collect();
        Dcel::from_polygon(verts)
    }

    fn square() -> Dcel {
        mesh_from(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn bootstrap_is_one_closed_face() {
        let mesh = square();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edges.len(), 4);
        assert!(mesh.is_consistent());
        assert_eq!(mesh.neighbors(0), Some((3, 1)));
        assert!(mesh.is_connected(0, 1));
        assert!(mesh.is_connected(1, 0));
        assert!(!mesh.is_connected(0, 2));
    }

    #[test]
    fn create_edge_is_unlinked() {
        let mut mesh = Dcel::new(square().verts);
        let f = mesh.create_face();
        let e = mesh.create_edge(0, 2, f);
        assert_eq!(mesh.edges[e].next, INVALID);
        assert_eq!(mesh.outgoing(0), &[e]);
        assert_eq!(mesh.faces[f].edges, vec![e]);
    }

    #[test]
    fn connect_splits_square() {
        let mut mesh = square();
        let new_face = mesh.connect(0, 2).unwrap();
        assert_eq!(new_face, Some(1));
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.is_consistent());
        assert_eq!(mesh.face_vertices(1), &[0, 1, 2]);
        assert_eq!(mesh.face_vertices(0), &[2, 3, 0]);
        assert!(mesh.is_connected(0, 2));
        assert_eq!(mesh.triangles().count(), 2);
    }

    #[test]
    fn connect_same_or_adjacent_is_noop() {
        let mut mesh = square();
        assert_eq!(mesh.connect(1, 1).unwrap(), None);
        assert_eq!(mesh.connect(1, 2).unwrap(), None);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn connect_finds_shared_face() {
        // Hexagon split once, then a second diagonal inside one half.
        let mut mesh = mesh_from(&[
            (0.0, 0.0),
            (2.0, -1.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (2.0, 3.0),
            (0.0, 2.0),
        ]);
        mesh.connect(0, 3).unwrap();
        mesh.connect(0, 2).unwrap();
        mesh.connect(3, 5).unwrap();
        assert_eq!(mesh.face_count(), 4);
        assert!(mesh.is_consistent());
        assert_eq!(mesh.triangles().count(), 4);
    }

    #[test]
    fn find_left_edge_picks_nearest() {
        // Edges 0->1 at x=0 and 2->3 at x=2, vertex 4 at x=3.
        let verts: Vec<PlanarVertex> = [(0.0, 2.0), (0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (3.0, 1.0)]
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| PlanarVertex {
                id: i as VertIdx,
                coords: [0.0; 3],
                x,
                y,
            })
            .collect();
        let mut mesh = Dcel::new(verts);
        let f = mesh.create_face();
        let a = mesh.create_edge(0, 1, f);
        let b = mesh.create_edge(2, 3, f);
        assert_eq!(mesh.find_left_edge(4, &[a, b]), Some(b));
        assert_eq!(mesh.edge_x(b, 1.0), 2.0);
        assert_eq!(mesh.find_left_edge(4, &[a]), Some(a));
        assert_eq!(mesh.find_left_edge(1, &[b]), None);
    }

    #[test]
    fn remove_sub_polygon_extracts_faces_newest_first() {
        let mut mesh = square();
        mesh.connect(0, 2).unwrap();
        let first = mesh.remove_sub_polygon().unwrap();
        assert_eq!(first.vertex_count(), 3);
        let ids: Vec<_> = first.verts.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(first.is_consistent());

        let second = mesh.remove_sub_polygon().unwrap();
        let ids: Vec<_> = second.verts.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 3, 0]);
        assert!(mesh.remove_sub_polygon().is_none());
    }
}
