use crate::{
    error::{Result, SliceError},
    mesh::Mesh,
    Point2, Pos,
};

pub mod segments_1d;
pub mod triangle;
pub use segments_1d::Segments1D;

use triangle::plane_triangle_intersection;

/// An infinite cutting plane, stored as a point on the plane and a unit
/// normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    origin: Pos,
    normal: Pos,
}

impl Plane {
    /// Creates a plane through `origin`. The normal is normalized, so any
    /// finite, non-zero vector is accepted.
    pub fn new(origin: Pos, normal: Pos) -> Result<Self> {
        if !origin.iter().all(|x| x.is_finite()) {
            return Err(SliceError::NonFiniteOrigin);
        }

        Ok(Self {
            origin,
            normal: unit_direction(normal)?,
        })
    }

    /// Plane perpendicular to `axis` (already a unit vector) at `offset`
    /// along it.
    pub(crate) fn perpendicular(axis: Pos, offset: f64) -> Self {
        Self {
            origin: axis * offset,
            normal: axis,
        }
    }

    pub fn origin(&self) -> Pos {
        self.origin
    }

    pub fn normal(&self) -> Pos {
        self.normal
    }

    /// Positive above the plane (in the direction of the normal), negative
    /// below.
    pub fn signed_distance(&self, point: &Pos) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Two orthonormal vectors spanning the plane, ordered so that
    /// `u × v = normal`. The seed axis is the principal axis least aligned
    /// with the normal, so a Z plane gets the usual X / Y frame.
    pub fn basis(&self) -> (Pos, Pos) {
        let n = self.normal;
        let abs = n.abs();
        let seed = if abs.x <= abs.y && abs.x <= abs.z {
            Pos::x()
        } else if abs.y <= abs.z {
            Pos::y()
        } else {
            Pos::z()
        };

        let u = (seed - n * n.dot(&seed)).normalize();
        (u, n.cross(&u))
    }

    /// Expresses a point in the plane's 2D frame, relative to its origin.
    pub fn project(&self, point: &Pos) -> Point2 {
        let (u, v) = self.basis();
        project_onto(point - self.origin, u, v)
    }

    /// Projects many points, computing the frame once.
    pub fn project_all<'a>(&self, points: impl IntoIterator<Item = &'a Pos>) -> Vec<Point2> {
        let (u, v) = self.basis();
        points
            .into_iter()
            .map(|p| project_onto(p - self.origin, u, v))
            .collect()
    }
}

fn project_onto(offset: Pos, u: Pos, v: Pos) -> Point2 {
    Point2::new(offset.dot(&u), offset.dot(&v))
}

/// Normalizes a direction, rejecting zero length and non-finite vectors.
pub(crate) fn unit_direction(direction: Pos) -> Result<Pos> {
    if !direction.iter().all(|x| x.is_finite()) {
        return Err(SliceError::ZeroDirection);
    }

    direction.try_normalize(0.0).ok_or(SliceError::ZeroDirection)
}

/// Intersect every face of the mesh with a plane, in linear time. Use
/// [`Segments1D`] when many parallel planes are cut from the same mesh.
///
/// Vertex distances are computed once up front, so faces sharing a vertex
/// always agree on which side of the plane it is on.
pub fn intersect_plane(mesh: &Mesh, plane: &Plane, epsilon: f64) -> Vec<[Pos; 2]> {
    let distances = mesh
        .vertices()
        .iter()
        .map(|v| plane.signed_distance(v))
        .collect::<Vec<_>>();

    (0..mesh.face_count())
        .filter_map(|face| {
            let distances = mesh.faces()[face].map(|i| distances[i as usize]);
            plane_triangle_intersection(mesh.face_verts(face), distances, plane.normal(), epsilon)
        })
        .collect()
}
