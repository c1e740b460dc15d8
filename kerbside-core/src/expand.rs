//! Incremental subgraph growth for progressive network coverage.
//!
//! Large street networks are carved into small, cheaply solvable patches:
//! [`expand_from_seed`] grows a bounded subgraph outwards from a seed vertex
//! by BFS, re-checking the patch's odd-degree count after every edge it
//! takes and stopping as soon as the patch looks near-Eulerian.
//! [`find_optimum_expansion`] sweeps the edge bound over a fixed range and
//! keeps the best candidate. Both are heuristics: bounded local search, no
//! optimality claim.
//!
//! The excluded-edge set is owned by the caller and threaded through
//! successive expansions to track global coverage. When local growth stalls
//! because every incident edge is already covered,
//! [`nearest_uncovered_edge`] finds the globally closest uncovered edge so
//! the caller can resume from there.

use std::collections::{BTreeSet, VecDeque};

use thiserror::Error;

use crate::graph::{Graph, GraphError, VertexId};
use crate::shortest_path::{self, ShortestPathError};

/// Inclusive lower bound of the [`find_optimum_expansion`] edge-count sweep.
const SWEEP_MIN_EDGES: usize = 6;
/// Exclusive upper bound of the sweep.
const SWEEP_MAX_EDGES: usize = 26;

/// Errors returned by the expansion routines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// The seed vertex is not part of the parent graph.
    #[error("seed vertex {0} not found in the parent graph")]
    UnknownSeedVertex(VertexId),
    /// Copying the selected edges into the patch graph failed.
    ///
    /// Cannot occur for a well-formed parent graph; surfaced rather than
    /// asserted so the caller sees the underlying construction error.
    #[error("failed to build the expansion subgraph: {0}")]
    Subgraph(#[from] GraphError),
}

/// A grown patch: a standalone sub-[`Graph`] plus the parent-graph indices
/// of the edges it contains.
///
/// The indices are what the caller merges into its long-lived excluded set
/// once the patch has been solved, via [`Expansion::commit`].
#[derive(Debug, Clone)]
pub struct Expansion<P> {
    graph: Graph<P>,
    edge_indices: BTreeSet<usize>,
}

impl<P> Expansion<P> {
    /// The patch as an independent graph, solvable on its own.
    pub fn graph(&self) -> &Graph<P> {
        &self.graph
    }

    /// Parent-graph indices of the included edges.
    pub fn edge_indices(&self) -> &BTreeSet<usize> {
        &self.edge_indices
    }

    /// Number of edges in the patch.
    pub fn edge_count(&self) -> usize {
        self.edge_indices.len()
    }

    /// Whether the expansion found no edges at all.
    pub fn is_empty(&self) -> bool {
        self.edge_indices.is_empty()
    }

    /// Merge this patch's edges into the caller's excluded set.
    ///
    /// Must happen between one expansion's completion and the next's start;
    /// the set is shared mutable state across rounds.
    pub fn commit(&self, excluded: &mut BTreeSet<usize>) {
        excluded.extend(self.edge_indices.iter().copied());
    }
}

/// Grow a patch from `seed` by BFS, taking at most `max_edges` edges.
///
/// Edges already in `excluded` (covered in earlier rounds) are never taken.
/// After each addition the patch's odd-degree vertex count is recomputed;
/// growth stops early the first time it reaches zero, or reaches two with at
/// least three edges taken. Those thresholds are "good enough" heuristics
/// for a cheap postman patch, not a proof of anything.
pub fn expand_from_seed<P: Clone>(
    graph: &Graph<P>,
    seed: VertexId,
    excluded: &BTreeSet<usize>,
    max_edges: usize,
) -> Result<Expansion<P>, ExpandError> {
    if graph.vertex(seed).is_none() {
        return Err(ExpandError::UnknownSeedVertex(seed));
    }

    let mut visited: BTreeSet<VertexId> = BTreeSet::new();
    let mut included: BTreeSet<usize> = BTreeSet::new();
    let mut queue: VecDeque<VertexId> = VecDeque::from([seed]);
    let mut settled = false;

    'grow: while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let Some(vertex) = graph.vertex(current) else {
            continue;
        };
        let mut frontier: BTreeSet<VertexId> = BTreeSet::new();
        for (neighbour, _) in vertex.neighbours() {
            let Some(index) = graph.edge_index(current, neighbour) else {
                continue;
            };
            if included.contains(&index) || excluded.contains(&index) {
                continue;
            }
            if included.len() >= max_edges {
                break 'grow;
            }
            frontier.insert(neighbour);
            included.insert(index);

            let odd_count = graph.odd_degree_count_for_edges(&included);
            if odd_count == 0 || (odd_count == 2 && included.len() >= 3) {
                settled = true;
                break 'grow;
            }
        }
        queue.extend(frontier);
    }

    if settled {
        log::debug!(
            "expansion from {seed} settled at {} edges",
            included.len()
        );
    }
    build_expansion(graph, included)
}

fn build_expansion<P: Clone>(
    graph: &Graph<P>,
    included: BTreeSet<usize>,
) -> Result<Expansion<P>, ExpandError> {
    let mut vertex_ids: BTreeSet<VertexId> = BTreeSet::new();
    for &index in &included {
        if let Some(edge) = graph.edge(index) {
            vertex_ids.insert(edge.v1);
            vertex_ids.insert(edge.v2);
        }
    }

    let mut patch = Graph::new(format!("{} patch", graph.name()));
    for &id in &vertex_ids {
        if let Some(vertex) = graph.vertex(id) {
            patch.add_vertex(id, vertex.label().to_owned(), vertex.payload().clone());
        }
    }
    for &index in &included {
        if let Some(edge) = graph.edge(index) {
            patch.add_edge(edge.v1, edge.v2, edge.weight)?;
        }
    }

    Ok(Expansion {
        graph: patch,
        edge_indices: included,
    })
}

/// Sweep [`expand_from_seed`] over a fixed `max_edges` range and keep the
/// candidate with the fewest odd-degree vertices, tie-broken by larger
/// vertex count.
///
/// Bounded local search; the winner is merely the best patch the sweep saw.
pub fn find_optimum_expansion<P: Clone>(
    graph: &Graph<P>,
    seed: VertexId,
    excluded: &BTreeSet<usize>,
) -> Result<Expansion<P>, ExpandError> {
    let mut best: Option<(Expansion<P>, usize)> = None;
    for max_edges in SWEEP_MIN_EDGES..SWEEP_MAX_EDGES {
        let candidate = expand_from_seed(graph, seed, excluded, max_edges)?;
        let odd_count = candidate.graph().odd_degree_vertices().len();
        let better = match &best {
            None => true,
            Some((current, current_odd)) => {
                odd_count < *current_odd
                    || (odd_count == *current_odd
                        && candidate.graph().vertex_count() > current.graph().vertex_count())
            }
        };
        if better {
            best = Some((candidate, odd_count));
        }
    }
    match best {
        Some((expansion, _)) => Ok(expansion),
        // The sweep range is non-empty; reaching here means the seed lookup
        // failed, which expand_from_seed already reports.
        None => Err(ExpandError::UnknownSeedVertex(seed)),
    }
}

/// Globally nearest uncovered edge by shortest-path distance from `from`.
///
/// The caller's fallback when local expansion stalls: returns the stable
/// index of the closest edge not in `covered` together with its nearer
/// endpoint, the vertex to resume expansion from. `Ok(None)` means every
/// reachable edge is covered.
pub fn nearest_uncovered_edge<P>(
    graph: &Graph<P>,
    from: VertexId,
    covered: &BTreeSet<usize>,
) -> Result<Option<(usize, VertexId)>, ShortestPathError> {
    let tree = shortest_path::shortest_path_tree(graph, from)?;
    let mut best: Option<(f64, usize, VertexId)> = None;
    for (index, edge) in graph.edges().iter().enumerate() {
        if covered.contains(&index) {
            continue;
        }
        let candidates = [
            (tree.distance_to(edge.v1), edge.v1),
            (tree.distance_to(edge.v2), edge.v2),
        ];
        for (distance, endpoint) in candidates {
            let Some(distance) = distance else { continue };
            let closer = best.is_none_or(|(best_distance, _, _)| distance < best_distance);
            if closer {
                best = Some((distance, index, endpoint));
            }
        }
    }
    Ok(best.map(|(_, index, endpoint)| (index, endpoint)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unit_cycle;
    use rstest::rstest;

    /// Ladder-shaped network: two rails 1-2-3-4 and 5-6-7-8 with rungs.
    fn ladder() -> Graph<()> {
        let mut graph = Graph::new("ladder");
        for id in 1..=8 {
            graph.add_vertex(id, id.to_string(), ());
        }
        for (a, b) in [(1, 2), (2, 3), (3, 4), (5, 6), (6, 7), (7, 8)] {
            graph.add_edge(a, b, 1.0).unwrap();
        }
        for (a, b) in [(1, 5), (2, 6), (3, 7), (4, 8)] {
            graph.add_edge(a, b, 1.0).unwrap();
        }
        graph
    }

    #[rstest]
    fn unknown_seed_is_rejected() {
        let graph = ladder();
        let err = expand_from_seed(&graph, 99, &BTreeSet::new(), 10).unwrap_err();
        assert_eq!(err, ExpandError::UnknownSeedVertex(99));
    }

    #[rstest]
    fn expansion_respects_the_edge_budget() {
        let graph = ladder();
        let expansion = expand_from_seed(&graph, 1, &BTreeSet::new(), 4).unwrap();
        assert!(expansion.edge_count() <= 4);
        assert!(!expansion.is_empty());
    }

    #[rstest]
    fn expansion_skips_excluded_edges() {
        let graph = ladder();
        let excluded: BTreeSet<usize> = (0..graph.edge_count()).collect();
        let expansion = expand_from_seed(&graph, 1, &excluded, 10).unwrap();
        assert!(expansion.is_empty());
    }

    #[rstest]
    fn eulerian_patch_stops_the_growth_early() {
        // On a cycle the patch closes after the final edge, leaving zero
        // odd vertices; growth must stop there even with budget to spare.
        let graph = unit_cycle(4);
        let expansion = expand_from_seed(&graph, 1, &BTreeSet::new(), 10).unwrap();
        assert_eq!(
            expansion.graph().odd_degree_vertices().len() % 2,
            0
        );
        assert!(expansion.edge_count() <= 4);
    }

    #[rstest]
    fn patch_graph_is_standalone_and_consistent() {
        let graph = ladder();
        let expansion = expand_from_seed(&graph, 1, &BTreeSet::new(), 5).unwrap();
        let patch = expansion.graph();
        assert_eq!(patch.edge_count(), expansion.edge_count());
        for edge in patch.edges() {
            assert!(graph.edge_index(edge.v1, edge.v2).is_some());
        }
        assert!(patch.is_connected());
    }

    #[rstest]
    fn optimum_sweep_prefers_fewest_odd_vertices() {
        let graph = ladder();
        let expansion = find_optimum_expansion(&graph, 1, &BTreeSet::new()).unwrap();
        let odd = expansion.graph().odd_degree_vertices().len();
        // The sweep must do at least as well as any single fixed budget.
        for max_edges in 6..26 {
            let candidate = expand_from_seed(&graph, 1, &BTreeSet::new(), max_edges).unwrap();
            assert!(odd <= candidate.graph().odd_degree_vertices().len());
        }
    }

    #[rstest]
    fn commit_merges_into_the_excluded_set() {
        let graph = ladder();
        let mut excluded = BTreeSet::new();
        let first = find_optimum_expansion(&graph, 1, &excluded).unwrap();
        first.commit(&mut excluded);
        assert_eq!(excluded.len(), first.edge_count());

        let second = find_optimum_expansion(&graph, 1, &excluded).unwrap();
        assert!(second.edge_indices().is_disjoint(&excluded) || second.is_empty());
    }

    #[rstest]
    fn nearest_uncovered_edge_finds_the_closest() {
        let graph = ladder();
        // Cover everything incident to vertex 1.
        let covered: BTreeSet<usize> = [
            graph.edge_index(1, 2).unwrap(),
            graph.edge_index(1, 5).unwrap(),
        ]
        .into_iter()
        .collect();
        let (index, resume) = nearest_uncovered_edge(&graph, 1, &covered)
            .unwrap()
            .expect("uncovered edges remain");
        assert!(!covered.contains(&index));
        let edge = graph.edge(index).unwrap();
        assert!(edge.touches(resume));
    }

    #[rstest]
    fn fully_covered_network_yields_none() {
        let graph = ladder();
        let covered: BTreeSet<usize> = (0..graph.edge_count()).collect();
        assert_eq!(nearest_uncovered_edge(&graph, 1, &covered).unwrap(), None);
    }
}
