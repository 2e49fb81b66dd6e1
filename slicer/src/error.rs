use thiserror::Error;

/// Reasons an area computation is rejected before any slicing happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SliceError {
    #[error("Mesh has no faces")]
    EmptyMesh,

    #[error("Invalid slice count: {0} (at least 2 are needed)")]
    InvalidSliceCount(usize),

    #[error("Direction must be a finite, non-zero vector")]
    ZeroDirection,

    #[error("Plane origin must be a finite point")]
    NonFiniteOrigin,

    #[error("Vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),

    #[error("Face {face} references vertex {index}, but the mesh only has {vertex_count}")]
    FaceIndexOutOfBounds {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Operation was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SliceError>;
