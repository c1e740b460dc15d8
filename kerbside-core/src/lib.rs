//! Chinese Postman solving for undirected street networks.
//!
//! The crate covers the full pipeline for patrol-route computation: a graph
//! model with stable edge indices ([`graph`]), Dijkstra shortest paths
//! ([`shortest_path`]), the pluggable odd-vertex matching boundary
//! ([`matching`]), Eulerian tour extraction with bridge avoidance
//! ([`euler`]), the orchestrating solver ([`cpp`]), and the BFS subgraph
//! expansion heuristic that carves large networks into solvable patches
//! ([`expand`]).
//!
//! All algorithms are single-threaded pure compute. A [`Graph`] is built
//! once and treated as read-only while solving; every solve call owns its
//! transient state, so sequential solves never interfere.
//!
//! Rendering, geometry, and the external vehicle-routing services consume
//! the vertex-id sequences produced here; none of that lives in this crate.

#![forbid(unsafe_code)]

pub mod cpp;
pub mod euler;
pub mod expand;
pub mod graph;
pub mod matching;
pub mod shortest_path;
pub mod test_support;

pub use cpp::{CppError, CppSolver};
pub use euler::{EulerError, TourEdge, find_tour};
pub use expand::{
    ExpandError, Expansion, expand_from_seed, find_optimum_expansion, nearest_uncovered_edge,
};
pub use graph::{Edge, Graph, GraphError, Vertex, VertexId};
pub use matching::{INVERSE_WEIGHT_SCALE, MatchingError, MatchingOracle, inverse_distance_weight};
pub use shortest_path::{
    DistanceMatrix, ShortestPathError, ShortestPathTree, distance_matrix, shortest_path_tree,
};
