//! Undirected, weighted street-network graph.
//!
//! [`Graph`] stores vertices in id order together with an ordered edge list.
//! An edge's position in that list is its *stable index*: every other module
//! in the crate (tour extraction, subgraph expansion, coverage tracking)
//! identifies edges by that index, so the list is append-only and indices
//! never shift. The vertex payload `P` is opaque to all algorithms; callers
//! use it to carry positions or any other display data.
//!
//! Construction is the only mutating phase. Once a graph feeds into the
//! postman pipeline it is treated as read-only.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;

/// Identifier of a vertex within a [`Graph`].
pub type VertexId = u32;

/// Errors returned by [`Graph::add_edge`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge endpoint does not exist in the graph.
    #[error("vertex {0} does not exist in the graph")]
    UnknownVertex(VertexId),
    /// Both endpoints refer to the same vertex.
    #[error("self-loop edge on vertex {0} is not permitted")]
    SelfLoopEdge(VertexId),
    /// The unordered endpoint pair already carries an edge.
    #[error("edge ({0}, {1}) already exists")]
    DuplicateEdge(VertexId, VertexId),
}

/// A vertex with its adjacency map.
///
/// The degree is derived from the adjacency map rather than stored, so it can
/// never drift out of sync with the edges.
#[derive(Debug, Clone)]
pub struct Vertex<P> {
    id: VertexId,
    label: String,
    payload: P,
    adjacency: BTreeMap<VertexId, f64>,
}

impl<P> Vertex<P> {
    fn new(id: VertexId, label: String, payload: P) -> Self {
        Self {
            id,
            label,
            payload,
            adjacency: BTreeMap::new(),
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Caller-supplied payload; never inspected by the algorithms.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Number of incident edges.
    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether an edge to `other` exists.
    pub fn is_adjacent_to(&self, other: VertexId) -> bool {
        self.adjacency.contains_key(&other)
    }

    /// Weight of the edge to `other`, if present.
    pub fn edge_weight_to(&self, other: VertexId) -> Option<f64> {
        self.adjacency.get(&other).copied()
    }

    /// Neighbours in ascending id order with the connecting edge weight.
    pub fn neighbours(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.adjacency.iter().map(|(&id, &weight)| (id, weight))
    }
}

/// An undirected edge between two vertices.
///
/// The pair is unordered; `v1`/`v2` merely record insertion order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// First endpoint as supplied to [`Graph::add_edge`].
    pub v1: VertexId,
    /// Second endpoint.
    pub v2: VertexId,
    /// Positive traversal cost.
    pub weight: f64,
}

impl Edge {
    /// Whether this edge connects the unordered pair `(a, b)`.
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.v1 == a && self.v2 == b) || (self.v1 == b && self.v2 == a)
    }

    /// Whether `v` is one of the endpoints.
    pub fn touches(&self, v: VertexId) -> bool {
        self.v1 == v || self.v2 == v
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    pub fn other_endpoint(&self, v: VertexId) -> Option<VertexId> {
        if self.v1 == v {
            Some(self.v2)
        } else if self.v2 == v {
            Some(self.v1)
        } else {
            None
        }
    }
}

/// An undirected weighted graph with stable edge indices.
///
/// # Examples
///
/// ```
/// use kerbside_core::Graph;
///
/// # fn main() -> Result<(), kerbside_core::GraphError> {
/// let mut graph = Graph::new("demo");
/// graph.add_vertex(1, "a", ());
/// graph.add_vertex(2, "b", ());
/// graph.add_edge(1, 2, 5.0)?;
/// assert_eq!(graph.edge_index(1, 2), Some(0));
/// assert!(graph.is_connected());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Graph<P> {
    name: String,
    vertices: BTreeMap<VertexId, Vertex<P>>,
    edges: Vec<Edge>,
}

impl<P> Graph<P> {
    /// Create an empty graph with a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    /// Display name of the graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ordered edge list; positions are the stable edge indices.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge at `index`, if in range.
    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Look up a vertex by id.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<P>> {
        self.vertices.get(&id)
    }

    /// All vertex ids in ascending order.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// Vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<P>> {
        self.vertices.values()
    }

    /// Register a vertex.
    ///
    /// Re-registering an existing id is an idempotent no-op: the original
    /// vertex is kept untouched and a warning is logged. Overwriting would
    /// silently orphan adjacency entries, so it is never done.
    pub fn add_vertex(&mut self, id: VertexId, label: impl Into<String>, payload: P) {
        if self.vertices.contains_key(&id) {
            log::warn!("vertex {id} already exists in graph {}", self.name);
            return;
        }
        self.vertices.insert(id, Vertex::new(id, label.into(), payload));
    }

    /// Append an edge between two existing vertices.
    ///
    /// The new edge's index in [`Graph::edges`] is permanent. On error the
    /// graph is left untouched; both adjacency maps are only updated after
    /// every check has passed.
    pub fn add_edge(&mut self, v1: VertexId, v2: VertexId, weight: f64) -> Result<(), GraphError> {
        if v1 == v2 {
            return Err(GraphError::SelfLoopEdge(v1));
        }
        if !self.vertices.contains_key(&v1) {
            return Err(GraphError::UnknownVertex(v1));
        }
        if !self.vertices.contains_key(&v2) {
            return Err(GraphError::UnknownVertex(v2));
        }
        if self
            .vertices
            .get(&v1)
            .is_some_and(|v| v.is_adjacent_to(v2))
        {
            return Err(GraphError::DuplicateEdge(v1, v2));
        }

        if let Some(vertex) = self.vertices.get_mut(&v1) {
            vertex.adjacency.insert(v2, weight);
        }
        if let Some(vertex) = self.vertices.get_mut(&v2) {
            vertex.adjacency.insert(v1, weight);
        }
        self.edges.push(Edge { v1, v2, weight });
        Ok(())
    }

    /// Stable index of the edge connecting the unordered pair `(v1, v2)`.
    ///
    /// Lookups against working sets that no longer contain the pair are
    /// expected during iterative algorithms, so a miss is reported as `None`
    /// with a warning rather than an error.
    pub fn edge_index(&self, v1: VertexId, v2: VertexId) -> Option<usize> {
        let found = self.edges.iter().position(|e| e.connects(v1, v2));
        if found.is_none() {
            log::warn!("edge ({v1}, {v2}) not found in graph {}", self.name);
        }
        found
    }

    /// Ids of all odd-degree vertices in ascending order.
    ///
    /// The ordering is part of the contract: it decides which logical index
    /// each odd vertex receives in the matching step, so it must be stable
    /// for reproducible tours.
    pub fn odd_degree_vertices(&self) -> Vec<VertexId> {
        self.vertices
            .values()
            .filter(|v| v.degree() % 2 == 1)
            .map(Vertex::id)
            .collect()
    }

    /// Number of connected components, via repeated BFS in id order.
    pub fn connected_components(&self) -> usize {
        let mut visited: BTreeSet<VertexId> = BTreeSet::new();
        let mut components = 0;
        for &start in self.vertices.keys() {
            if visited.contains(&start) {
                continue;
            }
            components += 1;
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                if !visited.insert(current) {
                    continue;
                }
                if let Some(vertex) = self.vertices.get(&current) {
                    for (neighbour, _) in vertex.neighbours() {
                        if !visited.contains(&neighbour) {
                            queue.push_back(neighbour);
                        }
                    }
                }
            }
        }
        components
    }

    /// Whether every vertex is reachable from every other.
    ///
    /// The empty graph is not considered connected.
    pub fn is_connected(&self) -> bool {
        self.connected_components() == 1
    }

    /// Count of odd-degree vertices when only the given edge indices exist.
    ///
    /// Used by subgraph expansion to judge how close a growing patch is to
    /// being Eulerian. Indices outside the edge list are ignored.
    pub fn odd_degree_count_for_edges(&self, edge_indices: &BTreeSet<usize>) -> usize {
        let mut degrees: BTreeMap<VertexId, usize> = BTreeMap::new();
        for &index in edge_indices {
            if let Some(edge) = self.edges.get(index) {
                *degrees.entry(edge.v1).or_insert(0) += 1;
                *degrees.entry(edge.v2).or_insert(0) += 1;
            }
        }
        degrees.values().filter(|&&d| d % 2 == 1).count()
    }
}
