use std::collections::HashMap;

use crate::Pos;

/// Loops recovered from an unordered bag of segments, along with counts of
/// everything that did not fit into a closed loop.
#[derive(Debug, Default)]
pub struct Assembly {
    pub loops: Vec<Vec<Pos>>,
    pub open_chains: usize,
    pub open_segments: usize,
    pub non_manifold_nodes: usize,
}

/// Welds segment endpoints together. Points are hashed into cubic cells the
/// size of the tolerance, so a point only has to be compared against the
/// nodes in its own and the 26 neighboring cells.
struct NodeIndex {
    tolerance: f64,
    cells: HashMap<[i64; 3], Vec<usize>>,
    nodes: Vec<Pos>,
}

impl NodeIndex {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    fn cell(&self, point: &Pos) -> [i64; 3] {
        let cell = (point / self.tolerance).map(|x| x.floor() as i64);
        [cell.x, cell.y, cell.z]
    }

    /// Returns the node within tolerance of `point`, creating one if there is
    /// none.
    fn insert(&mut self, point: Pos) -> usize {
        let [x, y, z] = self.cell(&point);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(ids) = self.cells.get(&[x + dx, y + dy, z + dz]) else {
                        continue;
                    };

                    let close = ids
                        .iter()
                        .find(|&&id| (self.nodes[id] - point).norm() <= self.tolerance);
                    if let Some(&id) = close {
                        return id;
                    }
                }
            }
        }

        let id = self.nodes.len();
        self.nodes.push(point);
        self.cells.entry([x, y, z]).or_default().push(id);
        id
    }
}

/// Joins segments into closed loops.
///
/// Each endpoint becomes a node in an undirected graph (after welding points
/// within `tolerance`) and each segment an edge. On a manifold mesh every node
/// has exactly two edges, so following unused edges from any start always
/// comes back around to it. Segments that collapse to a single node are
/// dropped. Repeats of an edge in the same direction are kept once, while a
/// pair running in opposite directions cancels. Chains that run into a dead
/// end are discarded and counted.
///
/// The walk follows the orientation of the first segment of each loop, so
/// consistently oriented segments come out as consistently wound loops.
pub fn assemble(segments: &[[Pos; 2]], tolerance: f64) -> Assembly {
    let mut index = NodeIndex::new(tolerance);

    // Net number of times each edge was walked forward (low to high node)
    // minus backward. An edge lying in the plane between two faces that are
    // both above it is reported once in each direction, so it cancels out.
    let mut net = HashMap::<(usize, usize), i32>::new();
    let mut order = Vec::new();
    for [a, b] in segments {
        let (a, b) = (index.insert(*a), index.insert(*b));
        if a == b {
            continue;
        }

        let key = (a.min(b), a.max(b));
        let count = net.entry(key).or_insert_with(|| {
            order.push(key);
            0
        });
        *count += if a < b { 1 } else { -1 };
    }

    let edges = order
        .into_iter()
        .filter_map(|(a, b)| match net[&(a, b)].signum() {
            1 => Some([a, b]),
            -1 => Some([b, a]),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut adjacency = vec![Vec::new(); index.nodes.len()];
    for (edge, &[a, b]) in edges.iter().enumerate() {
        adjacency[a].push(edge);
        adjacency[b].push(edge);
    }

    let mut out = Assembly {
        non_manifold_nodes: adjacency
            .iter()
            .filter(|x| !x.is_empty() && x.len() != 2)
            .count(),
        ..Default::default()
    };

    let mut used = vec![false; edges.len()];
    let next_edge = |node: usize, used: &mut [bool]| {
        let edge = *adjacency[node].iter().find(|&&e| !used[e])?;
        used[edge] = true;
        let [a, b] = edges[edge];
        Some(if a == node { b } else { a })
    };

    for first in 0..edges.len() {
        if used[first] {
            continue;
        }

        used[first] = true;
        let [start, mut current] = edges[first];
        let mut chain = vec![start];
        let mut length = 1;

        let closed = loop {
            if current == start {
                break true;
            }

            chain.push(current);
            match next_edge(current, &mut used) {
                Some(next) => {
                    current = next;
                    length += 1;
                }
                None => break false,
            }
        };

        if closed {
            if chain.len() >= 3 {
                out.loops.push(chain.iter().map(|&n| index.nodes[n]).collect());
            }
            continue;
        }

        // Dead end, so use up the rest of this chain behind the start too.
        let mut current = start;
        while let Some(next) = next_edge(current, &mut used) {
            current = next;
            length += 1;
        }

        out.open_chains += 1;
        out.open_segments += length;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64, z: f64) -> Vec<[Pos; 2]> {
        let corners = [
            Pos::new(0.0, 0.0, z),
            Pos::new(size, 0.0, z),
            Pos::new(size, size, z),
            Pos::new(0.0, size, z),
        ];
        (0..4).map(|i| [corners[i], corners[(i + 1) % 4]]).collect()
    }

    #[test]
    fn closes_shuffled_square() {
        let mut segments = square(1.0, 0.0);
        segments.swap(0, 2);
        segments.swap(1, 3);

        let assembly = assemble(&segments, 1e-9);
        assert_eq!(assembly.loops.len(), 1);
        assert_eq!(assembly.loops[0].len(), 4);
        assert_eq!(assembly.open_chains, 0);
        assert_eq!(assembly.non_manifold_nodes, 0);
    }

    #[test]
    fn keeps_segment_orientation() {
        let assembly = assemble(&square(1.0, 0.0), 1e-9);
        let points = &assembly.loops[0];
        assert_eq!(points[0], Pos::new(0.0, 0.0, 0.0));
        assert_eq!(points[1], Pos::new(1.0, 0.0, 0.0));
        assert_eq!(points[2], Pos::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn welds_nearby_endpoints() {
        let mut segments = square(1.0, 0.0);
        segments[1][0].x += 1e-12;
        segments[3][1].y -= 1e-12;

        let assembly = assemble(&segments, 1e-9);
        assert_eq!(assembly.loops.len(), 1);
        assert_eq!(assembly.open_chains, 0);
    }

    #[test]
    fn drops_duplicates_and_degenerate_segments() {
        let mut segments = square(1.0, 0.0);
        segments.push(segments[0]);
        segments.push(segments[2]);
        segments.push([Pos::new(0.5, 0.5, 0.0), Pos::new(0.5, 0.5, 1e-12)]);

        let assembly = assemble(&segments, 1e-9);
        assert_eq!(assembly.loops.len(), 1);
        assert_eq!(assembly.loops[0].len(), 4);
    }

    #[test]
    fn opposite_edges_cancel() {
        // A chord across the square, reported once each way, as the bottom
        // of a groove is by the two walls above it.
        let chord = [Pos::new(0.5, 0.0, 0.0), Pos::new(0.5, 1.0, 0.0)];
        let mut segments = vec![chord, [chord[1], chord[0]]];
        segments.extend(square(1.0, 0.0));

        let assembly = assemble(&segments, 1e-9);
        assert_eq!(assembly.loops.len(), 1);
        assert_eq!(assembly.loops[0].len(), 4);
        assert_eq!(assembly.open_chains, 0);
        assert_eq!(assembly.non_manifold_nodes, 0);

        let alone = assemble(&[chord, [chord[1], chord[0]]], 1e-9);
        assert!(alone.loops.is_empty());
        assert_eq!(alone.open_chains, 0);
        assert_eq!(alone.non_manifold_nodes, 0);
    }

    #[test]
    fn reports_open_chains() {
        let mut segments = square(1.0, 0.0);
        segments.remove(1);
        segments.extend(square(1.0, 5.0));

        let assembly = assemble(&segments, 1e-9);
        assert_eq!(assembly.loops.len(), 1);
        assert_eq!(assembly.open_chains, 1);
        assert_eq!(assembly.open_segments, 3);
        assert_eq!(assembly.non_manifold_nodes, 2);
    }

    #[test]
    fn separates_disjoint_loops() {
        let mut segments = square(1.0, 0.0);
        segments.extend(square(1.0, 3.0));
        assert_eq!(assemble(&segments, 1e-9).loops.len(), 2);
    }

    #[test]
    fn nothing_in_nothing_out() {
        let assembly = assemble(&[], 1e-9);
        assert!(assembly.loops.is_empty());
        assert_eq!(assembly.open_chains, 0);
    }
}
