//! Procedural reference solids. Every generator produces a closed, manifold
//! mesh with outward facing (counter-clockwise) faces, which makes them
//! useful as known answers when checking slice areas.

use std::f64::consts::{PI, TAU};

use crate::{mesh::Mesh, Pos};

/// Axis aligned box with one corner at the origin and the opposite corner at
/// `size`.
pub fn cuboid(size: Pos) -> Mesh {
    let (w, d, h) = (size.x, size.y, size.z);
    let vertices = vec![
        Pos::new(0.0, 0.0, 0.0),
        Pos::new(w, 0.0, 0.0),
        Pos::new(w, d, 0.0),
        Pos::new(0.0, d, 0.0),
        Pos::new(0.0, 0.0, h),
        Pos::new(w, 0.0, h),
        Pos::new(w, d, h),
        Pos::new(0.0, d, h),
    ];

    #[rustfmt::skip]
    let faces = vec![
        [0, 2, 1], [0, 3, 2], // -Z
        [4, 5, 6], [4, 6, 7], // +Z
        [0, 1, 5], [0, 5, 4], // -Y
        [2, 3, 7], [2, 7, 6], // +Y
        [0, 4, 7], [0, 7, 3], // -X
        [1, 2, 6], [1, 6, 5], // +X
    ];

    Mesh::from_valid(vertices, faces)
}

/// Latitude / longitude sphere centered on the origin with its poles on the
/// Z axis. `segments` is the number of vertices around each ring and `rings`
/// the number of bands from pole to pole. An even ring count puts a ring of
/// vertices exactly on the equator.
pub fn uv_sphere(radius: f64, segments: u32, rings: u32) -> Mesh {
    let (segments, rings) = (segments.max(3), rings.max(2));

    let mut vertices = vec![Pos::new(0.0, 0.0, radius)];
    for ring in 1..rings {
        let theta = PI * ring as f64 / rings as f64;
        let (rho, z) = (radius * theta.sin(), radius * theta.cos());
        vertices.extend((0..segments).map(|j| {
            let phi = TAU * j as f64 / segments as f64;
            Pos::new(rho * phi.cos(), rho * phi.sin(), z)
        }));
    }
    vertices.push(Pos::new(0.0, 0.0, -radius));

    let south = vertices.len() as u32 - 1;
    let ring_start = |ring: u32| 1 + (ring - 1) * segments;

    let mut faces = Vec::new();
    for j in 0..segments {
        let next = (j + 1) % segments;

        let first = ring_start(1);
        faces.push([0, first + j, first + next]);

        for ring in 1..rings - 1 {
            let (a, b) = (ring_start(ring), ring_start(ring + 1));
            faces.push([a + j, b + j, b + next]);
            faces.push([a + j, b + next, a + next]);
        }

        let last = ring_start(rings - 1);
        faces.push([last + j, south, last + next]);
    }

    Mesh::from_valid(vertices, faces)
}

/// Flat ring (an annular prism) lying on the XY plane, centered on the Z axis
/// and extending from `z = 0` to `z = thickness`.
pub fn washer(outer_radius: f64, inner_radius: f64, thickness: f64, segments: u32) -> Mesh {
    let n = segments.max(3);

    let ring = |radius: f64, z: f64| {
        (0..n).map(move |j| {
            let phi = TAU * j as f64 / n as f64;
            Pos::new(radius * phi.cos(), radius * phi.sin(), z)
        })
    };

    let vertices = ring(outer_radius, 0.0)
        .chain(ring(outer_radius, thickness))
        .chain(ring(inner_radius, 0.0))
        .chain(ring(inner_radius, thickness))
        .collect::<Vec<_>>();

    let (outer_bottom, outer_top, inner_bottom, inner_top) = (0, n, 2 * n, 3 * n);

    let mut faces = Vec::new();
    for j in 0..n {
        let k = (j + 1) % n;

        let (ot, ob) = (outer_top, outer_bottom);
        faces.push([ot + j, ob + j, ob + k]);
        faces.push([ot + j, ob + k, ot + k]);

        let (it, ib) = (inner_top, inner_bottom);
        faces.push([it + j, ib + k, ib + j]);
        faces.push([it + j, it + k, ib + k]);

        faces.push([it + j, ot + j, ot + k]);
        faces.push([it + j, ot + k, it + k]);

        faces.push([ib + j, ob + k, ob + j]);
        faces.push([ib + j, ib + k, ob + k]);
    }

    Mesh::from_valid(vertices, faces)
}

/// Area of a regular polygon with `sides` vertices on a circle of `radius`.
/// This is the exact cross-section of the round primitives above.
pub fn regular_polygon_area(sides: u32, radius: f64) -> f64 {
    let n = sides as f64;
    0.5 * n * radius * radius * (TAU / n).sin()
}
