//! Facade crate for the kerbside postman engine.
//!
//! Re-exports the core graph and solver types and, behind a feature flag,
//! the bundled matching oracles.

#![forbid(unsafe_code)]

pub use kerbside_core::{
    CppError, CppSolver, DistanceMatrix, Edge, EulerError, ExpandError, Expansion, Graph,
    GraphError, MatchingError, MatchingOracle, ShortestPathError, ShortestPathTree, TourEdge,
    INVERSE_WEIGHT_SCALE, Vertex, VertexId, distance_matrix, expand_from_seed,
    find_optimum_expansion, find_tour, inverse_distance_weight, nearest_uncovered_edge,
    shortest_path_tree,
};

#[cfg(feature = "matcher-exact")]
pub use kerbside_matcher::{ExactMatcher, GreedyMatcher};
