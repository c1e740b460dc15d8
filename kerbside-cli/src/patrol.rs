//! Progressive patrol-coverage simulation.
//!
//! Round by round: grow the best local patch from the current seed, solve
//! it as an independent postman problem, commit its edges to the shared
//! excluded set, and continue from wherever the patrol finished. When the
//! local neighbourhood is fully covered, jump to the globally nearest
//! uncovered edge, exactly as the interactive caller would.

use std::collections::BTreeSet;
use std::path::Path;

use geo::Coord;
use kerbside_core::{Graph, VertexId, find_optimum_expansion, nearest_uncovered_edge};
use serde::Serialize;

use crate::error::CliError;
use crate::solve::solve_graph;

/// One patrol round, as emitted on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct PatrolRound {
    /// 1-based round number.
    pub round: usize,
    /// Seed vertex this round's expansion grew from.
    pub seed: VertexId,
    /// Vertices in the solved patch.
    pub patch_vertices: usize,
    /// Edges in the solved patch.
    pub patch_edges: usize,
    /// Odd-degree vertices the patch carried into its solve.
    pub patch_odd_vertices: usize,
    /// Tour of the patch.
    pub tour: Vec<VertexId>,
    /// Edges covered across all rounds so far.
    pub covered_total: usize,
}

/// Full patrol simulation output.
#[derive(Debug, Clone, Serialize)]
pub struct PatrolReport {
    /// Per-round records in order.
    pub rounds: Vec<PatrolRound>,
    /// Total edges in the network.
    pub network_edges: usize,
    /// Whether every edge ended up covered.
    pub complete: bool,
}

/// Drive the patrol loop until the network is covered.
///
/// `max_rounds` bounds the simulation; `None` runs to completion.
pub fn patrol_graph(
    graph: &Graph<Coord<f64>>,
    start_seed: VertexId,
    max_rounds: Option<usize>,
) -> Result<PatrolReport, CliError> {
    let mut excluded: BTreeSet<usize> = BTreeSet::new();
    let mut rounds: Vec<PatrolRound> = Vec::new();
    let mut seed = start_seed;
    let mut stalled_at: Option<VertexId> = None;

    while excluded.len() < graph.edge_count() {
        if max_rounds.is_some_and(|limit| rounds.len() >= limit) {
            break;
        }

        let expansion = find_optimum_expansion(graph, seed, &excluded)?;
        if expansion.is_empty() {
            // Local neighbourhood exhausted: jump to the nearest uncovered
            // edge, or stop if nothing reachable remains.
            match nearest_uncovered_edge(graph, seed, &excluded)? {
                Some((_, resume)) => {
                    if stalled_at == Some(resume) {
                        return Err(CliError::Stalled(resume));
                    }
                    stalled_at = Some(resume);
                    seed = resume;
                    continue;
                }
                None => break,
            }
        }
        stalled_at = None;

        let patch = expansion.graph();
        let odd = patch.odd_degree_vertices().len();
        let tour = solve_graph(patch)?;
        expansion.commit(&mut excluded);

        let next_seed = tour.last().copied().unwrap_or(seed);
        rounds.push(PatrolRound {
            round: rounds.len() + 1,
            seed,
            patch_vertices: patch.vertex_count(),
            patch_edges: patch.edge_count(),
            patch_odd_vertices: odd,
            tour,
            covered_total: excluded.len(),
        });
        seed = next_seed;
    }

    Ok(PatrolReport {
        rounds,
        network_edges: graph.edge_count(),
        complete: excluded.len() == graph.edge_count(),
    })
}

/// Run the `patrol` subcommand.
pub fn run_patrol(
    network: &Path,
    seed: VertexId,
    max_rounds: Option<usize>,
) -> Result<PatrolReport, CliError> {
    let graph = crate::network::load_network(network)?;
    patrol_graph(&graph, seed, max_rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// 3x3 unit grid with planar coordinates.
    fn grid() -> Graph<Coord<f64>> {
        let mut graph = Graph::new("grid");
        for r in 0..3_u32 {
            for c in 0..3_u32 {
                let id = r * 3 + c + 1;
                graph.add_vertex(id, id.to_string(), Coord {
                    x: f64::from(c),
                    y: f64::from(r),
                });
            }
        }
        for r in 0..3_u32 {
            for c in 0..3_u32 {
                let id = r * 3 + c + 1;
                if c < 2 {
                    graph.add_edge(id, id + 1, 1.0).unwrap();
                }
                if r < 2 {
                    graph.add_edge(id, id + 3, 1.0).unwrap();
                }
            }
        }
        graph
    }

    #[rstest]
    fn patrol_covers_the_grid_completely() {
        let graph = grid();
        let report = patrol_graph(&graph, 1, None).unwrap();
        assert!(report.complete);
        let covered: usize = report.rounds.iter().map(|r| r.patch_edges).sum();
        assert_eq!(covered, graph.edge_count());
        assert_eq!(
            report.rounds.last().map(|r| r.covered_total),
            Some(graph.edge_count())
        );
    }

    #[rstest]
    fn round_limit_truncates_the_simulation() {
        let graph = grid();
        let report = patrol_graph(&graph, 1, Some(1)).unwrap();
        assert_eq!(report.rounds.len(), 1);
        assert!(!report.complete);
    }

    #[rstest]
    fn unknown_seed_is_reported() {
        let graph = grid();
        let err = patrol_graph(&graph, 99, None).unwrap_err();
        assert!(matches!(err, CliError::Expansion(_)));
    }
}
