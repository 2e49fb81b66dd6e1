use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{Result, SliceError},
    Pos,
};

/// An immutable mesh made of vertices and triangular faces. The vertex data
/// lives behind an [`Arc`], so cloning a mesh is cheap and a single mesh can
/// be sliced from many threads at once.
#[derive(Debug, Clone)]
pub struct Mesh {
    inner: Arc<MeshInner>,
}

#[derive(Debug)]
struct MeshInner {
    vertices: Box<[Pos]>,
    faces: Box<[[u32; 3]]>,
    bounds: (Pos, Pos),
}

impl Mesh {
    /// Creates a new mesh from the given vertices and faces. Fails if any
    /// coordinate is not finite or a face points past the end of the vertex
    /// list. Degenerate faces are kept.
    pub fn new(vertices: Vec<Pos>, faces: Vec<[u32; 3]>) -> Result<Self> {
        if let Some(idx) = vertices.iter().position(|v| !v.iter().all(|x| x.is_finite())) {
            return Err(SliceError::NonFiniteVertex(idx));
        }

        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(SliceError::FaceIndexOutOfBounds {
                    face,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self::from_valid(vertices, faces))
    }

    pub(crate) fn from_valid(vertices: Vec<Pos>, faces: Vec<[u32; 3]>) -> Self {
        let bounds = vertex_bounds(&vertices);
        Self {
            inner: Arc::new(MeshInner {
                vertices: vertices.into_boxed_slice(),
                faces: faces.into_boxed_slice(),
                bounds,
            }),
        }
    }

    /// Creates a mesh from a triangle soup, where every triangle carries its
    /// own three corners. Shared corners are not merged.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [Pos; 3]>) -> Result<Self> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for triangle in triangles {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&triangle);
            faces.push([base, base + 1, base + 2]);
        }

        Self::new(vertices, faces)
    }

    /// Concatenates several meshes into a single triangle set, the same way a
    /// scene with multiple objects is flattened before it is analyzed.
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Self {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for mesh in meshes {
            let offset = vertices.len() as u32;
            vertices.extend_from_slice(mesh.vertices());
            faces.extend(mesh.faces().iter().map(|face| face.map(|i| i + offset)));
        }

        Self::from_valid(vertices, faces)
    }

    pub fn vertices(&self) -> &[Pos] {
        self.inner.vertices.as_ref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        self.inner.faces.as_ref()
    }

    pub fn face_verts(&self, index: usize) -> [Pos; 3] {
        let vertices = self.vertices();
        self.faces()[index].map(|i| vertices[i as usize])
    }

    /// Unit normal of a face, following the right hand rule on its vertex
    /// order. Degenerate faces have a zero normal.
    pub fn normal(&self, index: usize) -> Pos {
        let [v0, v1, v2] = self.face_verts(index);
        (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(0.0)
            .unwrap_or_else(Pos::zeros)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces().is_empty()
    }

    /// Checks that every edge is shared by exactly two faces. Slicing a
    /// non-manifold mesh still works, but loops may not close.
    pub fn is_manifold(&self) -> bool {
        let mut edges = HashMap::<_, u32>::new();

        for [a, b, c] in self.faces() {
            for (a, b) in [(a, b), (b, c), (c, a)] {
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        edges.values().all(|&count| count == 2)
    }

    /// Get the minimum and maximum of each component of every vertex in the
    /// model. These points define the bounding box of the model.
    pub fn bounds(&self) -> (Pos, Pos) {
        self.inner.bounds
    }

    /// Length of the bounding box diagonal, the scale all tolerances are
    /// relative to.
    pub fn diagonal(&self) -> f64 {
        let (min, max) = self.bounds();
        (max - min).norm()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::from_valid(Vec::new(), Vec::new())
    }
}

fn vertex_bounds(vertices: &[Pos]) -> (Pos, Pos) {
    if vertices.is_empty() {
        return (Pos::zeros(), Pos::zeros());
    }

    vertices.iter().fold(
        (Pos::repeat(f64::MAX), Pos::repeat(f64::MIN)),
        |(min, max), v| (min.inf(v), max.sup(v)),
    )
}
