//! Cross-sectional area profiles along an axis.

use std::{
    fmt::{self, Display},
    time::Instant,
};

use common::{config::DistributionConfig, progress::Progress};
use itertools::{iproduct, Itertools};
use ordered_float::OrderedFloat;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    diagnostic::Diagnostic,
    error::{Result, SliceError},
    intersection::{unit_direction, Plane, Segments1D},
    mesh::Mesh,
    section::build_section,
    Pos,
};

/// One of the three principal axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Area profile of a mesh along one direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Unit direction the planes are perpendicular to.
    pub axis: Pos,
    /// Position of the first plane along the axis, in mesh coordinates.
    /// Entry locations are relative to this.
    pub start: f64,
    /// Position of the last plane along the axis, in mesh coordinates.
    pub end: f64,
    pub entries: Vec<Entry>,
}

/// Area of one slice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Distance from the first slice along the axis.
    pub location: f64,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Computes area distributions of a single mesh. Holds the shared
/// [`Progress`] so another thread can watch or cancel the work.
pub struct Distributor {
    mesh: Mesh,
    config: DistributionConfig,
    progress: Progress,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn direction(&self) -> Pos {
        match self {
            Axis::X => Pos::x(),
            Axis::Y => Pos::y(),
            Axis::Z => Pos::z(),
        }
    }

    /// The principal axis a direction points along, if any.
    pub fn from_direction(direction: &Pos) -> Option<Self> {
        Axis::ALL.into_iter().find(|axis| axis.direction() == *direction)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distance between the first and last plane.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn locations(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|x| x.location)
    }

    pub fn areas(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|x| x.area)
    }

    /// Slice with the largest area. The first one wins ties.
    pub fn peak(&self) -> Option<&Entry> {
        self.entries
            .iter()
            .rev()
            .max_by_key(|x| OrderedFloat(x.area))
    }

    /// Every diagnostic along with the location of its slice.
    pub fn diagnostics(&self) -> impl Iterator<Item = (f64, &Diagnostic)> + '_ {
        self.entries
            .iter()
            .flat_map(|x| x.diagnostics.iter().map(move |d| (x.location, d)))
    }
}

impl Distributor {
    pub fn new(mesh: Mesh, config: DistributionConfig) -> Self {
        Self {
            mesh,
            config,
            progress: Progress::new(),
        }
    }

    /// Gets an instance of the shared [`Progress`], counted in slices.
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    /// Slices the mesh with `slice_count` evenly spaced planes perpendicular
    /// to `axis`, from the lowest to the highest point of its bounding box
    /// along the axis (both included). Planes are sliced in parallel.
    ///
    /// Invalid input is rejected before any slicing is done. Degenerate
    /// geometry is not an error, it is reported on the affected entry.
    pub fn distribution(&self, axis: Pos) -> Result<Distribution> {
        let slice_count = self.config.slice_count;
        if slice_count < 2 {
            return Err(SliceError::InvalidSliceCount(slice_count));
        }

        let axis = unit_direction(axis)?;
        if self.mesh.is_empty() {
            return Err(SliceError::EmptyMesh);
        }

        let label = Axis::from_direction(&axis)
            .map(|x| format!("{x} axis"))
            .unwrap_or_else(|| format!("[{:.3}, {:.3}, {:.3}]", axis.x, axis.y, axis.z));
        info!("Analyzing geometry along {label} with {slice_count} slices");
        let start_time = Instant::now();

        let diagonal = self.mesh.diagonal();
        let weld = self.config.weld_distance(diagonal);
        let segments = Segments1D::from_mesh(
            &self.mesh,
            axis,
            self.config.segment_layers,
            self.config.plane_distance(diagonal),
        );

        let (start, end) = extent(&self.mesh, &axis);
        let step = (end - start) / (slice_count - 1) as f64;
        debug!(start, end, step, "Computed slice locations");

        self.progress.add_total(slice_count as u64);
        let entries = (0..slice_count)
            .into_par_iter()
            .map(|i| {
                if self.progress.is_cancelled() {
                    return Err(SliceError::Cancelled);
                }

                // The last plane is pinned to the end of the extent so it
                // never overshoots through rounding.
                let location = if i + 1 == slice_count {
                    end
                } else {
                    (start + step * i as f64).min(end)
                };

                let plane = Plane::perpendicular(axis, location);
                let section = build_section(
                    &segments.intersect_plane(&self.mesh, location),
                    &plane,
                    weld,
                );
                self.progress.add_complete(1);

                Ok(Entry {
                    location: location - start,
                    area: section.area,
                    diagnostics: section.diagnostics,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Area distribution along {label} completed in {:?}",
            start_time.elapsed()
        );

        Ok(Distribution {
            axis,
            start,
            end,
            entries,
        })
    }

    /// Distributions along X, Y and Z (in that order), computed concurrently.
    pub fn principal_distributions(&self) -> Result<[Distribution; 3]> {
        let (x, (y, z)) = rayon::join(
            || self.distribution(Axis::X.direction()),
            || {
                rayon::join(
                    || self.distribution(Axis::Y.direction()),
                    || self.distribution(Axis::Z.direction()),
                )
            },
        );

        Ok([x?, y?, z?])
    }
}

/// Area distribution along `axis` with `slice_count` planes, see
/// [`Distributor::distribution`].
pub fn compute_distribution(mesh: &Mesh, axis: Pos, slice_count: usize) -> Result<Distribution> {
    let config = DistributionConfig::default().with_slice_count(slice_count);
    Distributor::new(mesh.clone(), config).distribution(axis)
}

/// Area distributions along X, Y and Z, in that order.
pub fn compute_principal_distributions(
    mesh: &Mesh,
    slice_count: usize,
) -> Result<[Distribution; 3]> {
    let config = DistributionConfig::default().with_slice_count(slice_count);
    Distributor::new(mesh.clone(), config).principal_distributions()
}

/// Lowest and highest projection of the bounding box corners onto `axis`.
/// For the positive principal axes this is just the matching components of
/// the min and max corners.
fn extent(mesh: &Mesh, axis: &Pos) -> (f64, f64) {
    let (min, max) = mesh.bounds();
    iproduct!([min.x, max.x], [min.y, max.y], [min.z, max.z])
        .map(|(x, y, z)| Pos::new(x, y, z).dot(axis))
        .minmax()
        .into_option()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::primitives;

    #[test]
    fn rejects_invalid_input() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        assert_eq!(
            compute_distribution(&cube, Pos::z(), 1),
            Err(SliceError::InvalidSliceCount(1))
        );
        assert_eq!(
            compute_distribution(&cube, Pos::zeros(), 10),
            Err(SliceError::ZeroDirection)
        );
        assert_eq!(
            compute_distribution(&Mesh::default(), Pos::z(), 10),
            Err(SliceError::EmptyMesh)
        );
    }

    #[test]
    fn invalid_input_does_no_work() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let distributor = Distributor::new(cube, DistributionConfig::default().with_slice_count(0));
        assert!(distributor.distribution(Pos::x()).is_err());
        assert_eq!(distributor.progress().total(), 0);
    }

    #[test]
    fn box_profile() {
        let cube = primitives::cuboid(Pos::new(2.0, 3.0, 4.0));
        let distribution = compute_distribution(&cube, Pos::z(), 9).unwrap();

        assert_eq!(distribution.len(), 9);
        assert_eq!(distribution.start, 0.0);
        assert_eq!(distribution.length(), 4.0);

        let locations = distribution.locations().collect::<Vec<_>>();
        assert_eq!(locations[0], 0.0);
        assert_eq!(locations[8], 4.0);
        assert!((locations[4] - 2.0).abs() < 1e-12);

        for entry in &distribution.entries[1..8] {
            assert!((entry.area - 6.0).abs() < 1e-9, "{entry:?}");
        }
    }

    #[test]
    fn locations_are_relative() {
        let mut vertices = primitives::cuboid(Pos::repeat(1.0)).vertices().to_vec();
        vertices.iter_mut().for_each(|v| *v += Pos::new(10.0, -5.0, 3.0));
        let faces = primitives::cuboid(Pos::repeat(1.0)).faces().to_vec();
        let moved = Mesh::new(vertices, faces).unwrap();

        let distribution = compute_distribution(&moved, Pos::y(), 5).unwrap();
        assert_eq!(distribution.start, -5.0);
        assert_eq!(distribution.end, -4.0);
        assert_eq!(distribution.entries[0].location, 0.0);
        assert!((distribution.entries[2].area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sphere_profile() {
        let sphere = primitives::uv_sphere(2.0, 128, 64);
        let distribution = compute_distribution(&sphere, Pos::z(), 21).unwrap();

        let areas = distribution.areas().collect::<Vec<_>>();
        assert_eq!(areas[0], 0.0);
        assert_eq!(areas[20], 0.0);

        let expected = primitives::regular_polygon_area(128, 2.0);
        assert!((areas[10] - expected).abs() < 1e-9);
        assert!((areas[10] - 4.0 * PI).abs() / (4.0 * PI) < 1e-3);

        let peak = distribution.peak().unwrap();
        assert!((peak.location - 2.0).abs() < 1e-12);
    }

    #[test]
    fn negative_axis_runs_the_other_way() {
        let cube = primitives::cuboid(Pos::new(1.0, 1.0, 2.0));
        let distribution = compute_distribution(&cube, -Pos::z(), 3).unwrap();

        assert_eq!((distribution.start, distribution.end), (-2.0, 0.0));
        assert!(distribution.locations().tuple_windows().all(|(a, b)| a <= b));
        assert!((distribution.entries[1].area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_axis() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let distribution = compute_distribution(&cube, Pos::new(1.0, 1.0, 0.0), 3).unwrap();

        assert!((distribution.length() - 2.0_f64.sqrt()).abs() < 1e-12);
        // Halfway along the diagonal the cut is a sqrt(2) by 1 rectangle.
        assert!((distribution.entries[1].area - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn principal_axes() {
        let cube = primitives::cuboid(Pos::new(1.0, 2.0, 3.0));
        let [x, y, z] = compute_principal_distributions(&cube, 5).unwrap();

        assert_eq!(x.axis, Pos::x());
        assert!((x.entries[2].area - 6.0).abs() < 1e-9);
        assert!((y.entries[2].area - 3.0).abs() < 1e-9);
        assert!((z.entries[2].area - 2.0).abs() < 1e-9);
    }

    #[test]
    fn progress_counts_slices() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let distributor = Distributor::new(cube, DistributionConfig::default().with_slice_count(7));
        let progress = distributor.progress();

        distributor.principal_distributions().unwrap();
        assert_eq!(progress.total(), 21);
        assert_eq!(progress.completed(), 21);
        assert!(progress.complete());
    }

    #[test]
    fn diagnostics_stay_with_their_slice() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let faces = cube.faces()[..cube.face_count() - 2].to_vec();
        let open = Mesh::new(cube.vertices().to_vec(), faces).unwrap();

        let distributor = Distributor::new(open, DistributionConfig::default().with_slice_count(5));
        let distribution = distributor.distribution(Pos::z()).unwrap();

        for entry in &distribution.entries[1..4] {
            assert_eq!(entry.area, 0.0);
            assert!(
                entry
                    .diagnostics
                    .iter()
                    .any(|d| matches!(d, Diagnostic::OpenChains { chains: 1, .. })),
                "{entry:?}"
            );
        }
        assert!(distribution.diagnostics().count() >= 3);
    }

    #[test]
    fn cancelled_run_returns_nothing() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let distributor = Distributor::new(cube, DistributionConfig::default());
        distributor.progress().cancel();

        assert_eq!(
            distributor.distribution(Pos::z()),
            Err(SliceError::Cancelled)
        );
    }

    #[test]
    fn axis_names() {
        assert_eq!(Axis::from_direction(&Pos::y()), Some(Axis::Y));
        assert_eq!(Axis::from_direction(&Pos::new(1.0, 1.0, 0.0)), None);
        assert_eq!(Axis::Z.to_string(), "Z");
    }

    #[test]
    fn serializes_entries() {
        let cube = primitives::cuboid(Pos::repeat(1.0));
        let distribution = compute_distribution(&cube, Pos::z(), 2).unwrap();
        let json = serde_json::to_value(&distribution).unwrap();

        assert_eq!(json["entries"].as_array().unwrap().len(), 2);
        assert!(json["entries"][0].get("diagnostics").is_none());

        let back: Distribution = serde_json::from_value(json).unwrap();
        assert_eq!(back, distribution);
    }
}
