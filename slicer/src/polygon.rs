//! Area of a cross-section made of possibly nested loops.

use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Point2;

/// A closed polygon in the 2D frame of a cutting plane. The closing edge from
/// the last point back to the first is implicit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    points: Vec<Point2>,
}

/// Role of a loop in a cross-section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopKind {
    /// Boundary of material, adds to the area.
    Outer,
    /// Boundary of a void inside material, removed from the area.
    Hole,
}

/// Net area of a set of loops along with how each loop was classified.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub area: f64,
    pub kinds: Vec<LoopKind>,
    /// Number of loops that crossed another loop. When this is non-zero the
    /// classification comes from winding instead of containment.
    pub overlapping: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relation {
    Inside,
    Outside,
    Crossing,
}

impl Loop {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace formula. Positive for counter-clockwise loops, negative for
    /// clockwise ones.
    pub fn signed_area(&self) -> f64 {
        let Some(&origin) = self.points.first() else {
            return 0.0;
        };

        // Working relative to the first point keeps the cross products small
        // for loops far from the plane origin.
        let twice_area = self
            .points
            .iter()
            .map(|p| p - origin)
            .circular_tuple_windows::<(_, _)>()
            .map(|(a, b)| a.perp(&b))
            .sum::<f64>();

        twice_area / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn bounds(&self) -> (Point2, Point2) {
        self.points.iter().fold(
            (Point2::repeat(f64::MAX), Point2::repeat(f64::MIN)),
            |(min, max), p| (min.inf(p), max.sup(p)),
        )
    }

    /// Point in polygon test by ray casting. Points exactly on the boundary
    /// may land on either side.
    pub fn contains(&self, point: &Point2) -> bool {
        let mut inside = false;

        for (a, b) in self.points.iter().circular_tuple_windows::<(_, _)>() {
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
        }

        inside
    }

    /// Where `self` lies relative to `outer`, which must be at least as large.
    fn relation(
        &self,
        outer: &Loop,
        bounds: (Point2, Point2),
        outer_bounds: (Point2, Point2),
    ) -> Relation {
        let (min, max) = bounds;
        let (outer_min, outer_max) = outer_bounds;
        let disjoint = (0..2).any(|i| max[i] < outer_min[i] || min[i] > outer_max[i]);
        if disjoint {
            return Relation::Outside;
        }

        let inside = self.points.iter().filter(|p| outer.contains(p)).count();
        if inside == self.len() {
            Relation::Inside
        } else if inside > 0
            || outer.points.iter().any(|p| self.contains(p))
            || self.edges_cross(outer)
        {
            Relation::Crossing
        } else {
            Relation::Outside
        }
    }

    /// Checks if any edge of `self` properly crosses an edge of `other`.
    fn edges_cross(&self, other: &Loop) -> bool {
        let orient = |a: &Point2, b: &Point2, c: &Point2| (b - a).perp(&(c - a));

        self.points
            .iter()
            .circular_tuple_windows::<(_, _)>()
            .cartesian_product(other.points.iter().circular_tuple_windows::<(_, _)>())
            .any(|((a, b), (c, d))| {
                orient(a, b, c) * orient(a, b, d) < 0.0 && orient(c, d, a) * orient(c, d, b) < 0.0
            })
    }
}

/// Net enclosed area of a set of loops, see [`evaluate`].
pub fn net_area(loops: &[Loop]) -> f64 {
    evaluate(loops).area
}

/// Resolves nesting and computes the net area of a cross-section.
///
/// Each loop is tested against every larger loop. A loop inside an even
/// number of others is an outer boundary, inside an odd number it is a hole,
/// and the area is the outer areas minus the hole areas.
///
/// If any two loops cross, containment means nothing, so the signed areas are
/// summed instead: the largest loop is taken as an outer boundary and every
/// loop wound the other way counts as a hole.
pub fn evaluate(loops: &[Loop]) -> Evaluation {
    if loops.is_empty() {
        return Evaluation {
            area: 0.0,
            kinds: Vec::new(),
            overlapping: 0,
        };
    }

    let areas = loops.iter().map(Loop::signed_area).collect::<Vec<_>>();
    let bounds = loops.iter().map(Loop::bounds).collect::<Vec<_>>();

    // Largest first, a loop can only be inside the loops before it.
    let order = (0..loops.len())
        .sorted_by_key(|&i| Reverse(OrderedFloat(areas[i].abs())))
        .collect::<Vec<_>>();

    let mut depth = vec![0_usize; loops.len()];
    let mut crossing = vec![false; loops.len()];
    for (k, &outer) in order.iter().enumerate() {
        for &inner in &order[k + 1..] {
            match loops[inner].relation(&loops[outer], bounds[inner], bounds[outer]) {
                Relation::Inside => depth[inner] += 1,
                Relation::Crossing => {
                    crossing[inner] = true;
                    crossing[outer] = true;
                }
                Relation::Outside => {}
            }
        }
    }

    let overlapping = crossing.iter().filter(|&&x| x).count();
    if overlapping == 0 {
        let kinds = depth
            .iter()
            .map(|d| if d % 2 == 0 { LoopKind::Outer } else { LoopKind::Hole })
            .collect::<Vec<_>>();
        let area = kinds
            .iter()
            .zip(&areas)
            .map(|(kind, area)| match kind {
                LoopKind::Outer => area.abs(),
                LoopKind::Hole => -area.abs(),
            })
            .sum::<f64>();

        // Adding 0.0 turns a negative zero positive.
        return Evaluation {
            area: area.max(0.0) + 0.0,
            kinds,
            overlapping,
        };
    }

    let sign = order.first().map_or(1.0, |&i| areas[i].signum());
    let kinds = areas
        .iter()
        .map(|a| if a * sign >= 0.0 { LoopKind::Outer } else { LoopKind::Hole })
        .collect();

    Evaluation {
        area: (sign * areas.iter().sum::<f64>()).max(0.0) + 0.0,
        kinds,
        overlapping,
    }
}
