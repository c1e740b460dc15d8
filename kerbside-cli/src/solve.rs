//! Full-network postman solve.

use geo::Coord;
use kerbside_core::{CppError, Graph, VertexId};
use kerbside_matcher::{DEFAULT_NODE_LIMIT, ExactMatcher, GreedyMatcher};
use serde::Serialize;

use crate::error::CliError;

/// Result of a single postman solve, as emitted on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Ordered vertex-id sequence of the tour.
    pub tour: Vec<VertexId>,
    /// Total traversal weight along the tour.
    pub total_weight: f64,
    /// Distinct real edges covered by the tour.
    pub edges_covered: usize,
}

/// Solve `graph`, choosing the matcher by odd-vertex count.
///
/// Small odd sets get the exact matcher; larger ones fall back to the
/// greedy matcher so whole-network solves stay tractable.
pub fn solve_graph(graph: &Graph<Coord<f64>>) -> Result<Vec<VertexId>, CppError> {
    let odd_count = graph.odd_degree_vertices().len();
    if odd_count <= DEFAULT_NODE_LIMIT {
        kerbside_core::CppSolver::new(ExactMatcher::new()).solve(graph)
    } else {
        log::debug!("{odd_count} odd vertices; switching to the greedy matcher");
        kerbside_core::CppSolver::new(GreedyMatcher).solve(graph)
    }
}

/// Build the stdout report for a solved tour.
pub fn report_for(graph: &Graph<Coord<f64>>, tour: Vec<VertexId>) -> SolveReport {
    let total_weight = tour
        .windows(2)
        .filter_map(|pair| {
            graph
                .vertex(pair[0])
                .and_then(|v| v.edge_weight_to(pair[1]))
        })
        .sum();
    let edges_covered = tour
        .windows(2)
        .filter_map(|pair| graph.edge_index(pair[0], pair[1]))
        .collect::<std::collections::BTreeSet<usize>>()
        .len();
    SolveReport {
        tour,
        total_weight,
        edges_covered,
    }
}

/// Run the `solve` subcommand.
pub fn run_solve(network: &std::path::Path) -> Result<SolveReport, CliError> {
    let graph = crate::network::load_network(network)?;
    let tour = solve_graph(&graph)?;
    Ok(report_for(&graph, tour))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn square() -> Graph<Coord<f64>> {
        let mut graph = Graph::new("square");
        for (id, x, y) in [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (4, 0.0, 1.0)] {
            graph.add_vertex(id, id.to_string(), Coord { x, y });
        }
        for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
            graph.add_edge(a, b, 1.0).unwrap();
        }
        graph
    }

    #[rstest]
    fn square_report_covers_all_edges() {
        let graph = square();
        let tour = solve_graph(&graph).unwrap();
        let report = report_for(&graph, tour);
        assert_eq!(report.edges_covered, 4);
        assert_eq!(report.total_weight, 4.0);
        assert_eq!(report.tour.len(), 5);
    }
}
