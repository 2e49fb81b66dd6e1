//! Cutting a mesh with a single plane.

use common::config::DistributionConfig;
use tracing::{debug, warn};

use crate::{
    diagnostic::Diagnostic,
    error::{Result, SliceError},
    intersection::{intersect_plane, Plane},
    mesh::Mesh,
    polygon::{self, Loop, LoopKind},
    Pos,
};

mod assemble;
pub use assemble::{assemble, Assembly};

/// Cross-section of a mesh at one plane.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliceResult {
    /// Closed loops in the plane's 2D frame (see [`Plane::basis`]).
    pub loops: Vec<Loop>,
    /// Whether each loop bounds material or a hole.
    pub kinds: Vec<LoopKind>,
    /// Net enclosed area, never negative.
    pub area: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl SliceResult {
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

/// Cuts the mesh with a plane using the default tolerances.
pub fn slice_at(mesh: &Mesh, plane: &Plane) -> Result<SliceResult> {
    slice_at_with(mesh, plane, &DistributionConfig::default())
}

/// Cuts the mesh with a plane, visiting every face. Tolerances come from
/// `config`, scaled by the mesh bounding box diagonal.
pub fn slice_at_with(mesh: &Mesh, plane: &Plane, config: &DistributionConfig) -> Result<SliceResult> {
    if mesh.is_empty() {
        return Err(SliceError::EmptyMesh);
    }

    let diagonal = mesh.diagonal();
    let segments = intersect_plane(mesh, plane, config.plane_distance(diagonal));
    Ok(build_section(&segments, plane, config.weld_distance(diagonal)))
}

/// Turns the raw segments cut from a mesh into loops and an area.
pub(crate) fn build_section(segments: &[[Pos; 2]], plane: &Plane, tolerance: f64) -> SliceResult {
    if segments.is_empty() {
        return SliceResult::default();
    }

    let assembly = assemble(segments, tolerance);
    let mut diagnostics = Vec::new();

    if assembly.open_chains > 0 {
        diagnostics.push(Diagnostic::OpenChains {
            chains: assembly.open_chains,
            segments: assembly.open_segments,
        });
    }

    if assembly.non_manifold_nodes > 0 {
        diagnostics.push(Diagnostic::NonManifoldNodes {
            nodes: assembly.non_manifold_nodes,
        });
    }

    let loops = assembly
        .loops
        .iter()
        .map(|points| Loop::new(plane.project_all(points)))
        .collect::<Vec<_>>();

    let evaluation = polygon::evaluate(&loops);
    if evaluation.overlapping > 0 {
        diagnostics.push(Diagnostic::OverlappingLoops {
            loops: evaluation.overlapping,
        });
    }

    let offset = plane.origin().dot(&plane.normal());
    for diagnostic in &diagnostics {
        warn!(offset, "Degenerate geometry in slice: {diagnostic}");
    }

    debug!(
        offset,
        segments = segments.len(),
        loops = loops.len(),
        area = evaluation.area,
        "Sliced plane"
    );

    SliceResult {
        loops,
        kinds: evaluation.kinds,
        area: evaluation.area,
        diagnostics,
    }
}
