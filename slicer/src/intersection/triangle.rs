use crate::Pos;

/// Where a vertex sits relative to a plane, after snapping distances within
/// epsilon onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Below,
    On,
    Above,
}

impl Side {
    pub fn classify(distance: f64, epsilon: f64) -> Self {
        if distance > epsilon {
            Side::Above
        } else if distance < -epsilon {
            Side::Below
        } else {
            Side::On
        }
    }
}

/// Intersects a plane with a triangle.
///
/// `distances` are the signed distances of the three vertices to the plane.
/// They are passed in rather than computed here so every face sharing a
/// vertex sees exactly the same value for it. The returned segment is
/// oriented along `plane_normal × face_normal`, which walks outer boundaries
/// of an outward facing solid counter-clockwise.
///
/// Tangent cases:
/// - a single vertex touching the plane, or a face lying in it, gives nothing
/// - an edge lying in the plane is only emitted by the face whose third vertex
///   is above the plane. When both faces sharing it are above, they report
///   it in opposite directions and loop assembly cancels the pair
pub fn plane_triangle_intersection(
    verts: [Pos; 3],
    distances: [f64; 3],
    plane_normal: Pos,
    epsilon: f64,
) -> Option<[Pos; 2]> {
    let sides = distances.map(|d| Side::classify(d, epsilon));
    let count = |side: Side| sides.iter().filter(|&&s| s == side).count();
    let (above, below, on) = (count(Side::Above), count(Side::Below), count(Side::On));

    let mut out = [Pos::zeros(); 2];
    let mut n = 0;
    let mut push = |point: Pos| {
        if n < 2 {
            out[n] = point;
            n += 1;
        }
    };

    if above > 0 && below > 0 {
        // A proper crossing. Vertices on the plane are part of the cut as is,
        // and every edge with one end above and one below gets interpolated.
        for i in 0..3 {
            let j = (i + 1) % 3;
            if sides[i] == Side::On {
                push(verts[i]);
            }

            let spans = matches!(
                (sides[i], sides[j]),
                (Side::Above, Side::Below) | (Side::Below, Side::Above)
            );
            spans.then(|| push(edge_crossing(verts[i], verts[j], distances[i], distances[j])));
        }
    } else if on == 2 && above == 1 {
        for i in (0..3).filter(|&i| sides[i] == Side::On) {
            push(verts[i]);
        }
    }

    if n != 2 {
        return None;
    }

    let [v0, v1, v2] = verts;
    let direction = plane_normal.cross(&(v1 - v0).cross(&(v2 - v0)));
    if (out[1] - out[0]).dot(&direction) < 0.0 {
        out.swap(0, 1);
    }

    Some(out)
}

/// Point where the edge `a`-`b` crosses the plane. Always interpolates from
/// the end below the plane, so both faces sharing an edge compute the same
/// bits no matter which way round they store it.
fn edge_crossing(a: Pos, b: Pos, da: f64, db: f64) -> Pos {
    let (a, b, da, db) = if da < db { (a, b, da, db) } else { (b, a, db, da) };
    let t = (da / (da - db)).clamp(0.0, 1.0);
    a + t * (b - a)
}
