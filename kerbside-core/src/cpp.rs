//! Chinese Postman solving: orchestration of the full pipeline.
//!
//! [`CppSolver::solve`] wires the stages together: connectivity check,
//! odd-vertex detection, all-pairs shortest paths, oracle matching over the
//! inverse-distance graph, virtual-edge construction, and Eulerian tour
//! extraction. The solver holds nothing but the matching oracle; every solve
//! builds its augmented edge list fresh and discards it with the call.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::euler::{self, EulerError, TourEdge};
use crate::graph::{Graph, VertexId};
use crate::matching::{MatchingError, MatchingOracle, inverse_distance_weight};
use crate::shortest_path::{self, ShortestPathError};

/// Errors returned by [`CppSolver::solve`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CppError {
    /// The graph has no vertices or no edges; there is nothing to traverse.
    #[error("a non-empty graph is required for a postman tour")]
    InvalidGraph,
    /// The graph splits into more than one component.
    #[error("all {vertex_count} vertices must form a single connected component")]
    DisconnectedGraph {
        /// Vertex count of the rejected graph.
        vertex_count: usize,
    },
    /// Shortest-path computation or reconstruction failed.
    #[error(transparent)]
    ShortestPath(#[from] ShortestPathError),
    /// The matching oracle failed or returned a malformed result.
    #[error(transparent)]
    Matching(#[from] MatchingError),
    /// Tour extraction failed; with a connected graph and a validated
    /// matching this indicates an internal augmentation bug.
    #[error(transparent)]
    Tour(#[from] EulerError),
}

/// Chinese Postman solver parameterised over its matching oracle.
///
/// # Examples
///
/// ```
/// use kerbside_core::{CppSolver, Graph, MatchingError, MatchingOracle};
///
/// // The square is Eulerian, so the oracle is never consulted.
/// struct UnreachableOracle;
///
/// impl MatchingOracle for UnreachableOracle {
///     fn matching(
///         &self,
///         _edges: &[(usize, usize, f64)],
///         nodes: usize,
///     ) -> Result<Vec<usize>, MatchingError> {
///         Err(MatchingError::NoPerfectMatching { nodes })
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = Graph::new("square");
/// for id in 1..=4 {
///     graph.add_vertex(id, id.to_string(), ());
/// }
/// graph.add_edge(1, 2, 1.0)?;
/// graph.add_edge(2, 3, 1.0)?;
/// graph.add_edge(3, 4, 1.0)?;
/// graph.add_edge(4, 1, 1.0)?;
///
/// let solver = CppSolver::new(UnreachableOracle);
/// let tour = solver.solve(&graph)?;
/// assert_eq!(tour.first(), tour.last());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CppSolver<M> {
    oracle: M,
}

impl<M: MatchingOracle> CppSolver<M> {
    /// Construct a solver around a matching oracle.
    pub fn new(oracle: M) -> Self {
        Self { oracle }
    }

    /// Solve the Chinese Postman Problem for `graph`.
    ///
    /// Returns the tour as an ordered vertex-id sequence with every virtual
    /// detour already unfolded; the caller resolves ids back into its own
    /// payloads. When the graph is Eulerian already (no odd vertices) the
    /// shortest-path matrix and the oracle are skipped entirely.
    pub fn solve<P>(&self, graph: &Graph<P>) -> Result<Vec<VertexId>, CppError> {
        if graph.vertex_count() == 0 || graph.edge_count() == 0 {
            return Err(CppError::InvalidGraph);
        }
        if !graph.is_connected() {
            return Err(CppError::DisconnectedGraph {
                vertex_count: graph.vertex_count(),
            });
        }

        let mut tour_edges: Vec<TourEdge> = Vec::new();

        let odd_vertices = graph.odd_degree_vertices();
        if !odd_vertices.is_empty() {
            log::debug!(
                "found {} odd-degree vertices (of {}) in graph {}",
                odd_vertices.len(),
                graph.vertex_count(),
                graph.name()
            );
            tour_edges = self.build_virtual_edges(graph, &odd_vertices)?;
        }

        for edge in graph.edges() {
            tour_edges.push(TourEdge::Real {
                v1: edge.v1,
                v2: edge.v2,
                weight: edge.weight,
            });
        }

        Ok(euler::find_tour(&graph.vertex_ids(), &tour_edges)?)
    }

    /// Pair the odd vertices via the oracle and emit one virtual edge per
    /// matched pair.
    fn build_virtual_edges<P>(
        &self,
        graph: &Graph<P>,
        odd_vertices: &[VertexId],
    ) -> Result<Vec<TourEdge>, CppError> {
        let matrix = shortest_path::distance_matrix(graph)?;

        // Complete graph over logical odd-vertex indices, weights inverted
        // so the maximizing oracle minimizes added detour distance.
        let mut oracle_edges = Vec::new();
        for (i, &v) in odd_vertices.iter().enumerate() {
            for (j, &w) in odd_vertices.iter().enumerate().skip(i + 1) {
                let distance = matrix.distance(v, w).ok_or(
                    ShortestPathError::PathNotFound {
                        source: v,
                        dest: w,
                    },
                )?;
                oracle_edges.push((i, j, inverse_distance_weight(distance)));
            }
        }

        let mates = self.oracle.matching(&oracle_edges, odd_vertices.len())?;
        if mates.len() != odd_vertices.len() {
            return Err(MatchingError::SizeMismatch {
                expected: odd_vertices.len(),
                actual: mates.len(),
            }
            .into());
        }

        // Each pair is processed exactly once; the guard prevents emitting
        // the mirrored (j, i) entry a second time.
        let mut processed: BTreeSet<usize> = BTreeSet::new();
        let mut virtual_edges = Vec::new();
        for (index, &mate) in mates.iter().enumerate() {
            if processed.contains(&index) {
                continue;
            }
            let (Some(&v), Some(&w)) = (odd_vertices.get(index), odd_vertices.get(mate)) else {
                return Err(MatchingError::SizeMismatch {
                    expected: odd_vertices.len(),
                    actual: mate,
                }
                .into());
            };
            let tree = matrix
                .tree(v)
                .ok_or(ShortestPathError::PathNotFound { source: v, dest: w })?;
            let path = tree.path_to(w).map_err(CppError::ShortestPath)?;
            let distance = tree
                .distance_to(w)
                .ok_or(ShortestPathError::PathNotFound { source: v, dest: w })?;
            virtual_edges.push(TourEdge::Virtual {
                v1: v,
                v2: w,
                weight: distance,
                path,
            });
            processed.insert(index);
            processed.insert(mate);
        }
        Ok(virtual_edges)
    }
}
