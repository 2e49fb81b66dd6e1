use serde::{Deserialize, Serialize};

/// Slice count used when a caller does not ask for a specific one.
pub const DEFAULT_SLICE_COUNT: usize = 100;

/// Tunables for computing an area distribution. Tolerances are relative to
/// the diagonal of the mesh bounding box, so the same config works for a part
/// modeled in millimeters or in meters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DistributionConfig {
    /// Number of evenly spaced planes, including both ends of the extent.
    pub slice_count: usize,
    /// Two segment endpoints closer than this (times the diagonal) are
    /// treated as the same node when building loops.
    pub weld_tolerance: f64,
    /// Vertices closer to the plane than this (times the diagonal) are
    /// considered to lie on it.
    pub plane_epsilon: f64,
    /// Number of bins used to index faces along the slicing axis.
    pub segment_layers: usize,
}

impl DistributionConfig {
    pub fn with_slice_count(self, slice_count: usize) -> Self {
        Self {
            slice_count,
            ..self
        }
    }

    /// Absolute weld distance for a mesh with the given bounding box diagonal.
    pub fn weld_distance(&self, diagonal: f64) -> f64 {
        (self.weld_tolerance * diagonal).max(f64::MIN_POSITIVE)
    }

    /// Absolute on-plane distance for a mesh with the given bounding box diagonal.
    pub fn plane_distance(&self, diagonal: f64) -> f64 {
        self.plane_epsilon * diagonal
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            slice_count: DEFAULT_SLICE_COUNT,
            weld_tolerance: 1e-6,
            plane_epsilon: 1e-9,
            segment_layers: 100,
        }
    }
}
