//! Dijkstra shortest paths over the graph model.
//!
//! [`shortest_path_tree`] runs a single-source search and keeps both the
//! distance map and the predecessor map, so paths can be reconstructed
//! without a second traversal. [`distance_matrix`] repeats the search once
//! per vertex; the matrix is built transiently per solve and never cached.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::graph::{Graph, VertexId};

/// Errors from shortest-path computation and reconstruction.
// Display/Error are implemented by hand: thiserror would treat the
// `source` field of `PathNotFound` as the error source, and `VertexId`
// is not an `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortestPathError {
    /// An edge weight was negative; Dijkstra requires nonnegative weights.
    NegativeWeight {
        /// First endpoint of the offending edge.
        v1: VertexId,
        /// Second endpoint of the offending edge.
        v2: VertexId,
        /// The offending weight.
        weight: f64,
    },
    /// The destination is unreachable from the source.
    PathNotFound {
        /// Source vertex of the failed reconstruction.
        source: VertexId,
        /// Unreachable destination vertex.
        dest: VertexId,
    },
}

impl std::fmt::Display for ShortestPathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeWeight { v1, v2, weight } => {
                write!(f, "edge ({v1}, {v2}) has negative weight {weight}")
            }
            Self::PathNotFound { source, dest } => {
                write!(f, "no path from {source} to {dest}")
            }
        }
    }
}

impl std::error::Error for ShortestPathError {}

/// Heap entry ordered so the smallest tentative distance pops first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    distance: f64,
    vertex: VertexId,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed comparison turns the max-heap into a min-heap; ties break
        // on vertex id so traversal order stays deterministic.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a single-source Dijkstra run.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: VertexId,
    distances: BTreeMap<VertexId, f64>,
    predecessors: BTreeMap<VertexId, VertexId>,
}

impl ShortestPathTree {
    /// The source vertex this tree was grown from.
    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Distance from the source to `dest`; `None` when unreachable.
    pub fn distance_to(&self, dest: VertexId) -> Option<f64> {
        self.distances.get(&dest).copied()
    }

    /// Reconstruct the vertex sequence from the source to `dest`, inclusive.
    ///
    /// Walks the predecessor chain backwards and reverses it. On a connected
    /// graph every destination is reachable; an unreachable `dest` yields
    /// [`ShortestPathError::PathNotFound`].
    pub fn path_to(&self, dest: VertexId) -> Result<Vec<VertexId>, ShortestPathError> {
        if !self.distances.contains_key(&dest) {
            return Err(ShortestPathError::PathNotFound {
                source: self.source,
                dest,
            });
        }
        let mut path = vec![dest];
        let mut current = dest;
        while current != self.source {
            match self.predecessors.get(&current) {
                Some(&previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => {
                    return Err(ShortestPathError::PathNotFound {
                        source: self.source,
                        dest,
                    });
                }
            }
        }
        path.reverse();
        Ok(path)
    }
}

/// All-pairs distances built from one tree per vertex.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    trees: BTreeMap<VertexId, ShortestPathTree>,
}

impl DistanceMatrix {
    /// Distance between `source` and `dest`; `None` when unreachable.
    pub fn distance(&self, source: VertexId, dest: VertexId) -> Option<f64> {
        self.trees.get(&source).and_then(|t| t.distance_to(dest))
    }

    /// The full tree rooted at `source`, for path reconstruction.
    pub fn tree(&self, source: VertexId) -> Option<&ShortestPathTree> {
        self.trees.get(&source)
    }
}

fn check_weights<P>(graph: &Graph<P>) -> Result<(), ShortestPathError> {
    for edge in graph.edges() {
        if edge.weight < 0.0 {
            return Err(ShortestPathError::NegativeWeight {
                v1: edge.v1,
                v2: edge.v2,
                weight: edge.weight,
            });
        }
    }
    Ok(())
}

/// Classic binary-heap Dijkstra from `source`.
///
/// Vertices unreachable from `source` are absent from the resulting maps.
pub fn shortest_path_tree<P>(
    graph: &Graph<P>,
    source: VertexId,
) -> Result<ShortestPathTree, ShortestPathError> {
    check_weights(graph)?;

    let mut distances: BTreeMap<VertexId, f64> = BTreeMap::new();
    let mut predecessors: BTreeMap<VertexId, VertexId> = BTreeMap::new();
    let mut heap = BinaryHeap::new();

    if graph.vertex(source).is_some() {
        distances.insert(source, 0.0);
        heap.push(QueueEntry {
            distance: 0.0,
            vertex: source,
        });
    }

    while let Some(QueueEntry { distance, vertex }) = heap.pop() {
        // Stale entry: a shorter route to this vertex was already settled.
        if distances.get(&vertex).is_some_and(|&d| distance > d) {
            continue;
        }
        let Some(current) = graph.vertex(vertex) else {
            continue;
        };
        for (neighbour, weight) in current.neighbours() {
            let candidate = distance + weight;
            let improved = distances
                .get(&neighbour)
                .is_none_or(|&known| candidate < known);
            if improved {
                distances.insert(neighbour, candidate);
                predecessors.insert(neighbour, vertex);
                heap.push(QueueEntry {
                    distance: candidate,
                    vertex: neighbour,
                });
            }
        }
    }

    Ok(ShortestPathTree {
        source,
        distances,
        predecessors,
    })
}

/// All-pairs shortest paths: one Dijkstra run per vertex.
///
/// Cost is `O(V * E log V)`; acceptable at street-network patch scale.
pub fn distance_matrix<P>(graph: &Graph<P>) -> Result<DistanceMatrix, ShortestPathError> {
    let mut trees = BTreeMap::new();
    for id in graph.vertex_ids() {
        trees.insert(id, shortest_path_tree(graph, id)?);
    }
    Ok(DistanceMatrix { trees })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Diamond with a shortcut: 1-2 (1), 2-4 (1), 1-3 (10), 3-4 (1).
    #[fixture]
    fn diamond() -> Graph<()> {
        let mut graph = Graph::new("diamond");
        for id in 1..=4 {
            graph.add_vertex(id, id.to_string(), ());
        }
        graph.add_edge(1, 2, 1.0).unwrap();
        graph.add_edge(2, 4, 1.0).unwrap();
        graph.add_edge(1, 3, 10.0).unwrap();
        graph.add_edge(3, 4, 1.0).unwrap();
        graph
    }

    #[rstest]
    fn picks_the_cheaper_route(diamond: Graph<()>) {
        let tree = shortest_path_tree(&diamond, 1).unwrap();
        assert_eq!(tree.distance_to(4), Some(2.0));
        // Vertex 3 is cheapest through the far side of the diamond.
        assert_eq!(tree.distance_to(3), Some(3.0));
        assert_eq!(tree.path_to(3).unwrap(), vec![1, 2, 4, 3]);
    }

    #[rstest]
    fn path_to_source_is_singleton(diamond: Graph<()>) {
        let tree = shortest_path_tree(&diamond, 2).unwrap();
        assert_eq!(tree.path_to(2).unwrap(), vec![2]);
    }

    #[rstest]
    fn unreachable_destination_is_reported(diamond: Graph<()>) {
        let mut graph = diamond;
        graph.add_vertex(9, "island", ());
        let tree = shortest_path_tree(&graph, 1).unwrap();
        let err = tree.path_to(9).unwrap_err();
        assert_eq!(err, ShortestPathError::PathNotFound { source: 1, dest: 9 });
    }

    #[rstest]
    fn negative_weight_is_rejected() {
        let mut graph = Graph::new("negative");
        graph.add_vertex(1, "1", ());
        graph.add_vertex(2, "2", ());
        graph.add_edge(1, 2, -3.0).unwrap();
        let err = shortest_path_tree(&graph, 1).unwrap_err();
        assert!(matches!(err, ShortestPathError::NegativeWeight { .. }));
    }

    #[rstest]
    fn matrix_is_symmetric_on_undirected_graphs(diamond: Graph<()>) {
        let matrix = distance_matrix(&diamond).unwrap();
        for &a in &[1, 2, 3, 4] {
            for &b in &[1, 2, 3, 4] {
                assert_eq!(matrix.distance(a, b), matrix.distance(b, a));
            }
        }
        assert_eq!(matrix.distance(1, 1), Some(0.0));
    }
}
