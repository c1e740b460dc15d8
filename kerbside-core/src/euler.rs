//! Eulerian tour extraction with bridge avoidance.
//!
//! [`find_tour`] consumes the augmented edge list the postman solver builds
//! (original edges plus matching-derived virtual edges) and extracts a walk
//! covering every edge exactly once, Fleury style: from the current vertex,
//! take the first incident edge that is either the last one remaining or not
//! a bridge of the still-enabled subgraph. Virtual edges unfold into the
//! shortest-path vertex sequence they abbreviate, so the emitted tour only
//! ever names real vertices.
//!
//! Edge consumption is tracked in a disabled-flag arena owned by the call,
//! never on shared edge state, so sequential solves cannot interfere. The
//! naive bridge test costs `O(V + E)` per decision; fine for patches of tens
//! of edges. Hierholzer's algorithm would be the `O(E)` upgrade if patches
//! ever grow beyond that.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::graph::VertexId;

/// One edge of the augmented tour graph, tagged real or virtual.
#[derive(Debug, Clone, PartialEq)]
pub enum TourEdge {
    /// An edge present in the original graph.
    Real {
        /// First endpoint.
        v1: VertexId,
        /// Second endpoint.
        v2: VertexId,
        /// Traversal cost.
        weight: f64,
    },
    /// A matching-derived detour standing in for a shortest path.
    Virtual {
        /// First endpoint (head of `path`).
        v1: VertexId,
        /// Second endpoint (tail of `path`).
        v2: VertexId,
        /// Total shortest-path distance between the endpoints.
        weight: f64,
        /// Full vertex sequence of the represented path, `v1..=v2`.
        path: Vec<VertexId>,
    },
}

impl TourEdge {
    /// Both endpoints, in stored order.
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        match self {
            Self::Real { v1, v2, .. } | Self::Virtual { v1, v2, .. } => (*v1, *v2),
        }
    }

    /// Traversal cost of the edge.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Real { weight, .. } | Self::Virtual { weight, .. } => *weight,
        }
    }
}

/// Errors from tour extraction.
///
/// `UnevenDegree` is a consistency check on the augmentation precondition:
/// every vertex must have even total degree by the time extraction starts.
/// Seeing it means the upstream matching step is broken, not that the input
/// graph was invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EulerError {
    /// The vertex list or edge list was empty.
    #[error("tour extraction requires at least one vertex and one edge")]
    EmptyInput,
    /// An edge endpoint is missing from the vertex list.
    #[error("edge endpoint {0} is not in the vertex set")]
    UnknownEndpoint(VertexId),
    /// A vertex had odd degree after augmentation; upstream bug.
    #[error("vertex {vertex} has odd degree {degree} after augmentation")]
    UnevenDegree {
        /// The offending vertex.
        vertex: VertexId,
        /// Its (odd) augmented degree.
        degree: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct AdjacencyEntry {
    neighbour: VertexId,
    edge: usize,
}

/// Per-call extraction state: adjacency over the augmented edges plus the
/// disabled-flag arena indexed by augmented-edge index.
struct TourState<'a> {
    edges: &'a [TourEdge],
    adjacency: BTreeMap<VertexId, Vec<AdjacencyEntry>>,
    disabled: Vec<bool>,
}

impl<'a> TourState<'a> {
    fn new(vertex_ids: &[VertexId], edges: &'a [TourEdge]) -> Result<Self, EulerError> {
        if vertex_ids.is_empty() || edges.is_empty() {
            return Err(EulerError::EmptyInput);
        }

        let mut adjacency: BTreeMap<VertexId, Vec<AdjacencyEntry>> = BTreeMap::new();
        for &id in vertex_ids {
            adjacency.entry(id).or_default();
        }
        for (index, edge) in edges.iter().enumerate() {
            let (v1, v2) = edge.endpoints();
            for (from, to) in [(v1, v2), (v2, v1)] {
                let Some(list) = adjacency.get_mut(&from) else {
                    return Err(EulerError::UnknownEndpoint(from));
                };
                list.push(AdjacencyEntry {
                    neighbour: to,
                    edge: index,
                });
            }
        }

        Ok(Self {
            edges,
            adjacency,
            disabled: vec![false; edges.len()],
        })
    }

    fn check_even_degrees(&self) -> Result<(), EulerError> {
        for (&vertex, list) in &self.adjacency {
            if list.len() % 2 == 1 {
                return Err(EulerError::UnevenDegree {
                    vertex,
                    degree: list.len(),
                });
            }
        }
        Ok(())
    }

    fn enabled_degree(&self, vertex: VertexId) -> usize {
        self.adjacency
            .get(&vertex)
            .map(|list| list.iter().filter(|e| !self.disabled[e.edge]).count())
            .unwrap_or(0)
    }

    /// Count of vertices reachable from `start` over enabled edges.
    fn reachable_count(&self, start: VertexId) -> usize {
        let mut visited: BTreeSet<VertexId> = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(list) = self.adjacency.get(&current) {
                for entry in list {
                    if !self.disabled[entry.edge] && !visited.contains(&entry.neighbour) {
                        stack.push(entry.neighbour);
                    }
                }
            }
        }
        visited.len()
    }

    /// An edge is a valid next choice when it is the last enabled incident
    /// edge, or when hypothetically disabling it does not shrink the set of
    /// vertices reachable from `source` (i.e. it is not currently a bridge).
    fn is_valid_next_edge(&mut self, source: VertexId, edge: usize) -> bool {
        if self.enabled_degree(source) == 1 {
            return true;
        }
        let before = self.reachable_count(source);
        self.disabled[edge] = true;
        let after = self.reachable_count(source);
        self.disabled[edge] = false;
        after >= before
    }

    /// First valid enabled edge incident to `source`, in stable adjacency
    /// order.
    fn next_valid_edge(&mut self, source: VertexId) -> Option<AdjacencyEntry> {
        let candidates: Vec<AdjacencyEntry> = self
            .adjacency
            .get(&source)
            .map(|list| {
                list.iter()
                    .filter(|e| !self.disabled[e.edge])
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        candidates
            .into_iter()
            .find(|entry| self.is_valid_next_edge(source, entry.edge))
    }

    /// Append the traversal of `entry` to the tour, unfolding virtual edges
    /// into their stored path (reversed when traversed tail-to-head).
    fn append_traversal(&self, from: VertexId, entry: AdjacencyEntry, tour: &mut Vec<VertexId>) {
        match &self.edges[entry.edge] {
            TourEdge::Real { .. } => tour.push(entry.neighbour),
            TourEdge::Virtual { path, .. } => {
                if path.first() == Some(&from) {
                    tour.extend(path.iter().skip(1));
                } else {
                    tour.extend(path.iter().rev().skip(1));
                }
            }
        }
    }
}

/// Extract a walk covering every augmented edge exactly once.
///
/// Preconditions: every vertex has even augmented degree (checked, see
/// [`EulerError::UnevenDegree`]) and the enabled subgraph touching edges is
/// connected. The walk starts from the lowest vertex id that has an incident
/// edge; on a correctly augmented graph any start vertex is valid, so the
/// choice only pins down which of the equivalent tours is emitted.
pub fn find_tour(vertex_ids: &[VertexId], edges: &[TourEdge]) -> Result<Vec<VertexId>, EulerError> {
    let mut state = TourState::new(vertex_ids, edges)?;
    state.check_even_degrees()?;

    let start = state
        .adjacency
        .iter()
        .find(|(_, list)| !list.is_empty())
        .map(|(&id, _)| id)
        .ok_or(EulerError::EmptyInput)?;

    let mut tour = vec![start];
    let mut current = start;
    while let Some(entry) = state.next_valid_edge(current) {
        state.disabled[entry.edge] = true;
        state.append_traversal(current, entry, &mut tour);
        current = entry.neighbour;
    }

    Ok(tour)
}
