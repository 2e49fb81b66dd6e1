//! Cross-sectional area analysis of closed triangle meshes.
//!
//! A [`mesh::Mesh`] is cut by a plane into closed loops of segments
//! ([`section::slice_at`]), the enclosed area of those loops is found with
//! even-odd nesting ([`polygon::evaluate`]) and a whole profile along an axis
//! is computed in parallel by the [`distribution::Distributor`].

use nalgebra::{Vector2, Vector3};

pub mod diagnostic;
pub mod distribution;
pub mod error;
pub mod intersection;
pub mod mesh;
pub mod polygon;
pub mod primitives;
pub mod section;

pub type Pos = Vector3<f64>;
pub type Point2 = Vector2<f64>;

pub use distribution::{compute_distribution, compute_principal_distributions, Distribution};
pub use error::{Result, SliceError};
pub use section::{slice_at, SliceResult};
