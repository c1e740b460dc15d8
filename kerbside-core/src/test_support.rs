//! Test-only graph fixtures and deterministic matching oracles used by unit
//! and behaviour tests.

use std::cell::Cell;

use crate::graph::{Graph, VertexId};
use crate::matching::{MatchingError, MatchingOracle};

/// Cycle of `n` vertices (ids `1..=n`) with unit weights; Eulerian.
pub fn unit_cycle(n: VertexId) -> Graph<()> {
    let mut graph = Graph::new(format!("cycle-{n}"));
    for id in 1..=n {
        graph.add_vertex(id, id.to_string(), ());
    }
    for id in 1..=n {
        let next = if id == n { 1 } else { id + 1 };
        graph
            .add_edge(id, next, 1.0)
            .unwrap_or_else(|err| panic!("cycle fixture edge ({id}, {next}): {err}"));
    }
    graph
}

/// Path of `n` vertices (ids `1..=n`) with unit weights; both ends odd.
pub fn unit_path(n: VertexId) -> Graph<()> {
    let mut graph = Graph::new(format!("path-{n}"));
    for id in 1..=n {
        graph.add_vertex(id, id.to_string(), ());
    }
    for id in 1..n {
        graph
            .add_edge(id, id + 1, 1.0)
            .unwrap_or_else(|err| panic!("path fixture edge ({id}, {}): {err}", id + 1));
    }
    graph
}

/// Unit-weight grid with `rows * cols` vertices, ids assigned row-major
/// starting at 1.
pub fn unit_grid(rows: VertexId, cols: VertexId) -> Graph<()> {
    let mut graph = Graph::new(format!("grid-{rows}x{cols}"));
    let id_at = |r: VertexId, c: VertexId| r * cols + c + 1;
    for r in 0..rows {
        for c in 0..cols {
            graph.add_vertex(id_at(r, c), format!("{r},{c}"), ());
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                graph
                    .add_edge(id_at(r, c), id_at(r, c + 1), 1.0)
                    .unwrap_or_else(|err| panic!("grid fixture: {err}"));
            }
            if r + 1 < rows {
                graph
                    .add_edge(id_at(r, c), id_at(r + 1, c), 1.0)
                    .unwrap_or_else(|err| panic!("grid fixture: {err}"));
            }
        }
    }
    graph
}

/// Oracle pairing nodes in index order: `0 <-> 1`, `2 <-> 3`, and so on.
///
/// Any perfect matching is valid input for tour construction, so this keeps
/// solver tests independent of a real maximizing oracle.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialOracle;

impl MatchingOracle for SequentialOracle {
    fn matching(
        &self,
        _edges: &[(usize, usize, f64)],
        nodes: usize,
    ) -> Result<Vec<usize>, MatchingError> {
        if nodes % 2 == 1 {
            return Err(MatchingError::NoPerfectMatching { nodes });
        }
        let mut mates = vec![0; nodes];
        for pair in 0..nodes / 2 {
            mates[2 * pair] = 2 * pair + 1;
            mates[2 * pair + 1] = 2 * pair;
        }
        Ok(mates)
    }
}

/// Oracle wrapper counting how often the solver consults it.
#[derive(Debug, Default)]
pub struct CountingOracle {
    calls: Cell<usize>,
}

impl CountingOracle {
    /// Number of `matching` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl MatchingOracle for CountingOracle {
    fn matching(
        &self,
        edges: &[(usize, usize, f64)],
        nodes: usize,
    ) -> Result<Vec<usize>, MatchingError> {
        self.calls.set(self.calls.get() + 1);
        SequentialOracle.matching(edges, nodes)
    }
}
