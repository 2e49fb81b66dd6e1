use std::{fs, path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Ok, Result};
use clap::{Parser, ValueEnum};
use common::{config::DistributionConfig, format::Format};
use nalgebra::{ArrayStorage, Const, Matrix, Scalar, Vector2, Vector3, U1};
use num_traits::Zero;

use area_slicer::{distribution::Axis, mesh::Mesh, primitives, Pos};

#[derive(Debug, Parser)]
/// Computes the cross-sectional area distribution of a solid.
pub struct Args {
    #[arg(long, value_enum, default_value_t = Shape::Cuboid)]
    /// Procedural solid to analyze.
    pub shape: Shape,
    #[arg(long, default_value = "1, 1, 1", value_parser = vector_value_parser::<f64, 3>)]
    /// Size of the cuboid along the X, Y, and Z axes.
    pub size: Vector3<f64>,
    #[arg(long, default_value_t = 1.0)]
    /// Radius of the sphere, or outer radius of the washer.
    pub radius: f64,
    #[arg(long, default_value_t = 0.5)]
    /// Inner radius of the washer.
    pub inner_radius: f64,
    #[arg(long, default_value_t = 0.25)]
    /// Thickness of the washer along Z.
    pub thickness: f64,
    #[arg(long, default_value = "64, 32", value_parser = vector_value_parser::<u32, 2>)]
    /// Tessellation of round shapes: vertices around each ring, then number
    /// of bands from pole to pole (sphere only).
    pub resolution: Vector2<u32>,

    #[arg(long, default_value = "all", value_parser = axis_value_parser)]
    /// Slicing direction: x, y, z, all (the three of them) or a vector
    /// like `1, 1, 0`.
    pub axis: AxisArg,
    #[arg(long)]
    /// Number of slices per axis, both ends included. Overrides the config.
    pub slices: Option<usize>,
    #[arg(long)]
    /// TOML file with distribution settings.
    pub config: Option<PathBuf>,

    #[arg(long, value_parser = format_value_parser)]
    /// Output format, json or csv. Defaults to the extension of the output
    /// file, or json.
    pub format: Option<Format>,
    #[arg(long)]
    /// File to write the distribution to. Printed to stdout when missing.
    pub output: Option<PathBuf>,
    #[arg(long, short)]
    /// Log per-slice details.
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    Cuboid,
    Sphere,
    Washer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisArg {
    All,
    Direction(Pos),
}

impl Args {
    pub fn mesh(&self) -> Result<Mesh> {
        let [segments, rings] = [self.resolution.x, self.resolution.y];
        Ok(match self.shape {
            Shape::Cuboid => primitives::cuboid(self.size),
            Shape::Sphere => primitives::uv_sphere(self.radius, segments, rings),
            Shape::Washer => {
                if self.inner_radius >= self.radius {
                    bail!(
                        "Inner radius ({}) must be smaller than the outer radius ({})",
                        self.inner_radius,
                        self.radius
                    );
                }
                primitives::washer(self.radius, self.inner_radius, self.thickness, segments)
            }
        })
    }

    pub fn distribution_config(&self) -> Result<DistributionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Reading config `{}`", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Parsing config `{}`", path.display()))?
            }
            None => DistributionConfig::default(),
        };

        if let Some(slices) = self.slices {
            config.slice_count = slices;
        }

        Ok(config)
    }

    pub fn output_format(&self) -> Format {
        self.format
            .or_else(|| {
                let extension = self.output.as_ref()?.extension()?;
                Format::from_extension(&extension.to_string_lossy())
            })
            .unwrap_or(Format::Json)
    }
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cuboid => "cuboid",
            Shape::Sphere => "sphere",
            Shape::Washer => "washer",
        }
    }
}

fn axis_value_parser(raw: &str) -> Result<AxisArg> {
    Ok(match raw.trim().to_lowercase().as_str() {
        "all" => AxisArg::All,
        "x" => AxisArg::Direction(Axis::X.direction()),
        "y" => AxisArg::Direction(Axis::Y.direction()),
        "z" => AxisArg::Direction(Axis::Z.direction()),
        _ => AxisArg::Direction(
            vector_value_parser::<f64, 3>(raw)
                .context("Expected x, y, z, all or a vector like `1, 0, 0`")?,
        ),
    })
}

fn format_value_parser(raw: &str) -> Result<Format> {
    Format::from_extension(raw.trim()).with_context(|| format!("Unknown format `{raw}`"))
}

fn vector_value_parser<T, const N: usize>(
    raw: &str,
) -> Result<Matrix<T, Const<N>, U1, ArrayStorage<T, N, 1>>>
where
    T: FromStr + Scalar + Zero,
    T::Err: Send + Sync + std::error::Error,
{
    let mut vec = Matrix::<T, Const<N>, U1, ArrayStorage<T, N, 1>>::zeros();

    let mut parts = raw.splitn(N, ',');
    for i in 0..N {
        let element = parts.next().context("Missing vector element")?.trim();
        vec[i] = element
            .parse()
            .context("Can't convert element from string")?;
    }

    Ok(vec)
}
