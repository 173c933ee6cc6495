// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Monotone decomposition and monotone triangulation.
//
// The sweep runs top-down over the vertex order produced by `SweepLine`.
// Decomposition inserts diagonals at split and merge vertices using the
// helper of the nearest edge to the left, which leaves only y-monotone
// faces. A y-monotone face is then triangulated with the two-chain stack
// algorithm, producing exactly n - 2 triangles for n vertices.

use smallvec::SmallVec;

use crate::error::{Result, TriangulationError};
use crate::geom::{is_left_turn, vert_over};
use crate::mesh::{Dcel, EdgeIdx, VertIdx, INVALID};
use crate::plane::PlanarVertex;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexType {
    /// Both neighbors below, interior angle under pi.
    Start,
    /// Both neighbors above, interior angle under pi.
    End,
    /// Both neighbors below, reflex.
    Split,
    /// Both neighbors above, reflex.
    Merge,
    /// One neighbor above and one below.
    Regular,
}

/// Classify `v` from its boundary predecessor `p` and successor `q`.
/// The boundary must be counter-clockwise.
pub fn classify(p: &PlanarVertex, v: &PlanarVertex, q: &PlanarVertex) -> VertexType {
    let p_below = vert_over(v.x, v.y, p.x, p.y);
    let q_below = vert_over(v.x, v.y, q.x, q.y);
    let convex = is_left_turn(p.x, p.y, v.x, v.y, q.x, q.y);
    match (p_below, q_below) {
        (true, true) if convex => VertexType::Start,
        (true, true) => VertexType::Split,
        (false, false) if convex => VertexType::End,
        (false, false) => VertexType::Merge,
        _ => VertexType::Regular,
    }
}

/// Per-pass sweep state: vertex types, boundary edges, helpers and the set
/// of edges currently crossing the sweep line.
struct Decomposer {
    types: Vec<VertexType>,
    /// Boundary edge leaving each vertex.
    outgoing: Vec<EdgeIdx>,
    /// Boundary edge arriving at each vertex.
    incoming: Vec<EdgeIdx>,
    /// Interior lies to the right of the vertex (boundary descends through it).
    interior_right: Vec<bool>,
    helper: Vec<VertIdx>,
    active: Vec<EdgeIdx>,
}

impl Decomposer {
    fn new(mesh: &Dcel) -> Self {
        let n = mesh.vertex_count();
        let mut types = Vec::with_capacity(n);
        let mut outgoing = Vec::with_capacity(n);
        let mut incoming = Vec::with_capacity(n);
        let mut interior_right = Vec::with_capacity(n);
        for v in 0..n as VertIdx {
            types.push(mesh.discover_type(v));
            let e = mesh.outgoing(v).first().copied().unwrap_or(INVALID);
            outgoing.push(e);
            incoming.push(if e == INVALID { INVALID } else { mesh.edges[e].prev });
            let right = match mesh.neighbors(v) {
                Some((p, _)) => {
                    let (pv, vv) = (&mesh.verts[p as usize], &mesh.verts[v as usize]);
                    vert_over(pv.x, pv.y, vv.x, vv.y)
                }
                None => false,
            };
            interior_right.push(right);
        }
        Decomposer {
            types,
            outgoing,
            incoming,
            interior_right,
            helper: vec![INVALID; mesh.edges.len()],
            active: Vec::new(),
        }
    }

    fn needs_split(&self) -> bool {
        self.types
            .iter()
            .any(|t| matches!(t, VertexType::Split | VertexType::Merge))
    }

    fn is_merge(&self, v: VertIdx) -> bool {
        v != INVALID && self.types[v as usize] == VertexType::Merge
    }

    /// Insert `e` into the active set, kept sorted left to right at the
    /// height of `v`, with `v` as its helper.
    fn insert(&mut self, mesh: &Dcel, e: EdgeIdx, v: VertIdx) {
        let y = mesh.verts[v as usize].y;
        let x = mesh.edge_x(e, y);
        let pos = self.active.partition_point(|&a| mesh.edge_x(a, y) < x);
        self.active.insert(pos, e);
        self.helper[e as usize] = v;
    }

    /// Drop `e`, which ends at `v`, from the active set.
    fn remove(&mut self, mesh: &Dcel, e: EdgeIdx, v: VertIdx) {
        let y = mesh.verts[v as usize].y;
        let x = mesh.edge_x(e, y);
        let from = self.active.partition_point(|&a| mesh.edge_x(a, y) < x);
        let pos = self.active[from..]
            .iter()
            .position(|&a| a == e)
            .map(|p| from + p)
            .or_else(|| self.active.iter().position(|&a| a == e));
        if let Some(pos) = pos {
            self.active.remove(pos);
        }
    }

    /// Connect `v` to the helper of `e` if that helper is a merge vertex,
    /// then retire `e`.
    fn finish_edge(&mut self, mesh: &mut Dcel, v: VertIdx, e: EdgeIdx) -> Result<()> {
        let h = self.helper[e as usize];
        if self.is_merge(h) {
            mesh.connect(v, h)?;
        }
        self.remove(mesh, e, v);
        Ok(())
    }

    /// Resolve the edge left of `v`, optionally connect to its merge helper,
    /// and make `v` its new helper.
    fn update_left(&mut self, mesh: &mut Dcel, v: VertIdx, always_connect: bool) -> Result<()> {
        let left = mesh
            .find_left_edge(v, &self.active)
            .ok_or(TriangulationError::NonSimple { vertex: v })?;
        let h = self.helper[left as usize];
        if always_connect || self.is_merge(h) {
            mesh.connect(v, h)?;
        }
        self.helper[left as usize] = v;
        Ok(())
    }

    fn handle(&mut self, mesh: &mut Dcel, v: VertIdx) -> Result<()> {
        let vi = v as usize;
        match self.types[vi] {
            VertexType::Start => {
                self.insert(mesh, self.outgoing[vi], v);
            }
            VertexType::End => {
                self.finish_edge(mesh, v, self.incoming[vi])?;
            }
            VertexType::Split => {
                self.update_left(mesh, v, true)?;
                self.insert(mesh, self.outgoing[vi], v);
            }
            VertexType::Merge => {
                self.finish_edge(mesh, v, self.incoming[vi])?;
                self.update_left(mesh, v, false)?;
            }
            VertexType::Regular if self.interior_right[vi] => {
                self.finish_edge(mesh, v, self.incoming[vi])?;
                self.insert(mesh, self.outgoing[vi], v);
            }
            VertexType::Regular => {
                self.update_left(mesh, v, false)?;
            }
        }
        Ok(())
    }
}

/// Split the single face of `mesh` into y-monotone faces.
///
/// `order` is the ascending sweep permutation of the mesh vertices. Returns
/// false without touching the mesh when the polygon has no split or merge
/// vertex and is therefore already monotone.
pub fn decompose(mesh: &mut Dcel, order: &[VertIdx]) -> Result<bool> {
    let mut state = Decomposer::new(mesh);
    if !state.needs_split() {
        return Ok(false);
    }
    for &v in order.iter().rev() {
        state.handle(mesh, v)?;
    }
    // A split or merge vertex always yields a diagonal on simple input. If
    // every connection was already present the boundary crosses itself.
    if mesh.face_count() < 2 {
        let vertex = order
            .iter()
            .rev()
            .copied()
            .find(|&v| matches!(state.types[v as usize], VertexType::Split | VertexType::Merge))
            .unwrap_or(INVALID);
        return Err(TriangulationError::NonSimple { vertex });
    }
    log::debug!(
        "monotone decomposition of {} vertices produced {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(true)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Chain {
    Left,
    Right,
}

/// Triangulate the single y-monotone face of `mesh` by inserting diagonals.
/// Afterwards every live face of the mesh is a triangle.
pub fn triangulate_monotone(mesh: &mut Dcel, order: &[VertIdx]) -> Result<()> {
    let n = order.len();
    if n < 4 {
        return Ok(());
    }
    let face = mesh.live_faces().next().ok_or(TriangulationError::NotMonotone { face: 0 })?;

    // Walking forward from the top vertex runs down the left chain.
    let top = order[n - 1];
    let bottom = order[0];
    let mut chain = vec![Chain::Right; n];
    {
        let boundary = mesh.face_vertices(face);
        let start = boundary
            .iter()
            .position(|&v| v == top)
            .ok_or(TriangulationError::NotMonotone { face })?;
        let len = boundary.len();
        let over = |a: VertIdx, b: VertIdx| {
            let (a, b) = (&mesh.verts[a as usize], &mesh.verts[b as usize]);
            vert_over(a.x, a.y, b.x, b.y)
        };
        // Both chains must descend strictly from top to bottom.
        let mut k = (start + 1) % len;
        let mut prev = top;
        while boundary[k] != bottom {
            let v = boundary[k];
            if !over(prev, v) {
                return Err(TriangulationError::NotMonotone { face });
            }
            chain[v as usize] = Chain::Left;
            prev = v;
            k = (k + 1) % len;
        }
        prev = top;
        let mut k = (start + len - 1) % len;
        while boundary[k] != bottom {
            let v = boundary[k];
            if !over(prev, v) {
                return Err(TriangulationError::NotMonotone { face });
            }
            prev = v;
            k = (k + len - 1) % len;
        }
        chain[top as usize] = Chain::Left;
    }

    let xy = |mesh: &Dcel, v: VertIdx| mesh.xy(v);
    let mut stack: SmallVec<[VertIdx; 64]> = SmallVec::new();
    stack.push(order[n - 1]);
    stack.push(order[n - 2]);

    for rank in (1..n - 2).rev() {
        let u = order[rank];
        let top_of_stack = *stack.last().ok_or(TriangulationError::NotMonotone { face })?;
        if chain[u as usize] != chain[top_of_stack as usize] {
            // Opposite chain: fan to everything on the stack.
            let prev = order[rank + 1];
            while let Some(w) = stack.pop() {
                if !stack.is_empty() {
                    mesh.connect(u, w)?;
                }
            }
            stack.push(prev);
            stack.push(u);
        } else {
            let mut last = stack.pop().ok_or(TriangulationError::NotMonotone { face })?;
            while let Some(&s) = stack.last() {
                let [ux, uy] = xy(mesh, u);
                let [lx, ly] = xy(mesh, last);
                let [sx, sy] = xy(mesh, s);
                let inside = match chain[u as usize] {
                    Chain::Left => is_left_turn(sx, sy, lx, ly, ux, uy),
                    Chain::Right => is_left_turn(ux, uy, lx, ly, sx, sy),
                };
                if !inside {
                    break;
                }
                mesh.connect(u, s)?;
                last = s;
                stack.pop();
            }
            stack.push(last);
            stack.push(u);
        }
    }

    // The lowest vertex sees every remaining stack entry except the two
    // it already shares an edge with.
    stack.pop();
    while let Some(w) = stack.pop() {
        if !stack.is_empty() {
            mesh.connect(bottom, w)?;
        }
    }

    if mesh.face_count() != n - 2 || mesh.triangles().count() != n - 2 {
        return Err(TriangulationError::NotMonotone { face });
    }
    Ok(())
}
