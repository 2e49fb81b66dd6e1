use crate::{intersection::triangle::plane_triangle_intersection, mesh::Mesh, Pos};

/// Acceleration structure for cutting many parallel planes out of one mesh.
/// By splitting the extent of the mesh along the slicing axis into segments
/// and adding references to all the triangles that overlap each segment, a
/// plane only has to visit the faces in its own segment instead of every
/// face in the mesh.
pub struct Segments1D {
    axis: Pos,
    start: f64,
    end: f64,
    epsilon: f64,
    layer_height: f64,

    layers: Vec<Vec<usize>>,
    projections: Vec<f64>,
}

impl Segments1D {
    /// Creates a new Segments structure for planes perpendicular to `axis`
    /// (a unit vector). Faces within `epsilon` of a segment are also filed
    /// under it, so tangent faces are never missed.
    pub fn from_mesh(mesh: &Mesh, axis: Pos, layer_count: usize, epsilon: f64) -> Self {
        // Caching the position of each vertex along the axis means every
        // plane sees the same value for a vertex, and saves a dot product per
        // vertex per plane.
        let projections = mesh
            .vertices()
            .iter()
            .map(|v| v.dot(&axis))
            .collect::<Vec<_>>();

        let (start, end) = projections
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), &x| (min.min(x), max.max(x)));
        let (start, end) = if start > end { (0.0, 0.0) } else { (start, end) };

        let layer_count = layer_count.max(1);
        let layer_height = (end - start) / layer_count as f64;

        let mut this = Self {
            axis,
            start,
            end,
            epsilon,
            layer_height,

            layers: vec![Vec::new(); layer_count],
            projections,
        };

        // Padding in layers that covers epsilon on both sides of a face.
        let padding = if layer_height > 0.0 {
            (epsilon / layer_height).ceil().min(layer_count as f64) as usize + 1
        } else {
            0
        };

        for face in 0..mesh.face_count() {
            let (min, max) = this.face_range(mesh, face);
            let first = this.layer(min).saturating_sub(padding);
            let last = this.layer(max).saturating_add(padding).min(layer_count - 1);

            for layer in &mut this.layers[first..=last] {
                layer.push(face);
            }
        }

        this
    }

    pub fn axis(&self) -> Pos {
        self.axis
    }

    /// Minimum and maximum position of the mesh along the axis.
    pub fn extent(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Indices of every face that could touch the plane at `offset` along
    /// the axis.
    pub fn candidates(&self, offset: f64) -> &[usize] {
        if offset < self.start - self.epsilon || offset > self.end + self.epsilon {
            return &[];
        }

        &self.layers[self.layer(offset)]
    }

    /// Intersects the plane at `offset` along the axis with the mesh this
    /// Segments instance was built from.
    pub fn intersect_plane(&self, mesh: &Mesh, offset: f64) -> Vec<[Pos; 2]> {
        self.candidates(offset)
            .iter()
            .filter_map(|&face| {
                let distances = mesh.faces()[face].map(|i| self.projections[i as usize] - offset);
                plane_triangle_intersection(
                    mesh.face_verts(face),
                    distances,
                    self.axis,
                    self.epsilon,
                )
            })
            .collect()
    }

    fn layer(&self, offset: f64) -> usize {
        if self.layer_height <= 0.0 {
            return 0;
        }

        let layer = ((offset - self.start) / self.layer_height).floor().max(0.0) as usize;
        layer.min(self.layers.len() - 1)
    }

    /// Gets the min and max positions of the vertices of a face along the axis.
    fn face_range(&self, mesh: &Mesh, face: usize) -> (f64, f64) {
        let [a, b, c] = mesh.faces()[face].map(|i| self.projections[i as usize]);
        (a.min(b).min(c), a.max(b).max(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        intersection::{intersect_plane, Plane},
        primitives,
    };

    #[test]
    fn matches_linear_intersection() {
        let sphere = primitives::uv_sphere(2.0, 24, 12);
        let segments = Segments1D::from_mesh(&sphere, Pos::z(), 10, 1e-9);
        assert_eq!(segments.extent(), (-2.0, 2.0));

        for i in 0..=40 {
            let height = -2.0 + 0.1 * i as f64;
            let plane = Plane::new(Pos::new(0.0, 0.0, height), Pos::z()).unwrap();
            let linear = intersect_plane(&sphere, &plane, 1e-9);
            let binned = segments.intersect_plane(&sphere, height);
            assert_eq!(linear.len(), binned.len(), "height {height}");
        }
    }

    #[test]
    fn outside_extent_has_no_candidates() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let segments = Segments1D::from_mesh(&cube, Pos::x(), 4, 1e-9);
        assert!(segments.candidates(-0.5).is_empty());
        assert!(segments.candidates(1.5).is_empty());
        assert!(!segments.candidates(0.5).is_empty());
        assert!(segments.intersect_plane(&cube, 2.0).is_empty());
    }

    #[test]
    fn very_thin_mesh() {
        let thin = primitives::cuboid(Pos::new(1.0, 1.0, 1e-300));
        let segments = Segments1D::from_mesh(&thin, Pos::z(), 100, 1e-9);
        assert_eq!(segments.candidates(0.0).len(), thin.face_count());
        assert_eq!(segments.candidates(1e-300).len(), thin.face_count());
    }

    #[test]
    fn flat_mesh_uses_single_layer() {
        let flat = primitives::cuboid(Pos::new(1.0, 1.0, 0.0));
        let segments = Segments1D::from_mesh(&flat, Pos::z(), 8, 1e-9);
        assert_eq!(segments.candidates(0.0).len(), flat.face_count());
    }
}
