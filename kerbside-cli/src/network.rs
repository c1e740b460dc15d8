//! JSON street-network loading.
//!
//! The network file lists vertices with planar coordinates and edges by
//! endpoint ids. Edge weights are optional: a missing weight is derived
//! from the Euclidean distance between the endpoints, scaled and rounded so
//! hand-written fixtures and exported map data mix cleanly.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::Coord;
use kerbside_core::{Graph, VertexId};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Scale applied to Euclidean distances when deriving weights.
const DERIVED_WEIGHT_SCALE: f64 = 10_000.0;

/// Root of the network JSON document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkFile {
    /// Display name; defaults to the file stem when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Vertex records.
    pub vertices: Vec<VertexRecord>,
    /// Edge records.
    pub edges: Vec<EdgeRecord>,
}

/// One vertex of the network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VertexRecord {
    /// Unique positive id.
    pub id: VertexId,
    /// Optional display label; defaults to the id.
    #[serde(default)]
    pub label: Option<String>,
    /// Planar x coordinate.
    pub x: f64,
    /// Planar y coordinate.
    pub y: f64,
}

/// One edge of the network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeRecord {
    /// First endpoint id.
    pub v1: VertexId,
    /// Second endpoint id.
    pub v2: VertexId,
    /// Optional explicit weight; derived from coordinates when absent.
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Weight derived from endpoint coordinates.
fn derived_weight(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    ((dx * dx + dy * dy).sqrt() * DERIVED_WEIGHT_SCALE).round()
}

/// Build a graph from a parsed network description.
pub fn build_graph(network: &NetworkFile, fallback_name: &str) -> Result<Graph<Coord<f64>>, CliError> {
    let name = network.name.clone().unwrap_or_else(|| fallback_name.to_owned());
    let mut graph = Graph::new(name);

    for vertex in &network.vertices {
        let label = vertex
            .label
            .clone()
            .unwrap_or_else(|| vertex.id.to_string());
        graph.add_vertex(vertex.id, label, Coord {
            x: vertex.x,
            y: vertex.y,
        });
    }

    for edge in &network.edges {
        let weight = match edge.weight {
            Some(weight) => weight,
            None => {
                let (Some(a), Some(b)) = (graph.vertex(edge.v1), graph.vertex(edge.v2)) else {
                    return Err(CliError::DanglingEdge {
                        v1: edge.v1,
                        v2: edge.v2,
                    });
                };
                derived_weight(*a.payload(), *b.payload())
            }
        };
        graph.add_edge(edge.v1, edge.v2, weight)?;
    }

    Ok(graph)
}

/// Load and build a network graph from a JSON file.
pub fn load_network(path: &Path) -> Result<Graph<Coord<f64>>, CliError> {
    let file = File::open(path).map_err(|source| CliError::ReadNetwork {
        path: path.to_path_buf(),
        source,
    })?;
    let network: NetworkFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseNetwork {
            path: path.to_path_buf(),
            source,
        })?;
    let fallback = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network".to_owned());
    build_graph(&network, &fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> NetworkFile {
        NetworkFile {
            name: Some("sample".to_owned()),
            vertices: vec![
                VertexRecord {
                    id: 1,
                    label: None,
                    x: 0.0,
                    y: 0.0,
                },
                VertexRecord {
                    id: 2,
                    label: Some("corner".to_owned()),
                    x: 0.0003,
                    y: 0.0004,
                },
            ],
            edges: vec![EdgeRecord {
                v1: 1,
                v2: 2,
                weight: None,
            }],
        }
    }

    #[rstest]
    fn derives_weight_from_coordinates() {
        let graph = build_graph(&sample(), "fallback").unwrap();
        // 3-4-5 triangle scaled down: distance 0.0005, scaled to 5.
        assert_eq!(graph.edges()[0].weight, 5.0);
        assert_eq!(graph.name(), "sample");
        assert_eq!(graph.vertex(2).unwrap().label(), "corner");
        assert_eq!(graph.vertex(1).unwrap().label(), "1");
    }

    #[rstest]
    fn explicit_weight_wins_over_derivation() {
        let mut network = sample();
        network.edges[0].weight = Some(42.0);
        let graph = build_graph(&network, "fallback").unwrap();
        assert_eq!(graph.edges()[0].weight, 42.0);
    }

    #[rstest]
    fn dangling_edge_is_reported() {
        let mut network = sample();
        network.edges.push(EdgeRecord {
            v1: 1,
            v2: 9,
            weight: None,
        });
        let err = build_graph(&network, "fallback").unwrap_err();
        assert!(matches!(err, CliError::DanglingEdge { v1: 1, v2: 9 }));
    }

    #[rstest]
    fn json_round_trips() {
        let text = serde_json::to_string(&sample()).unwrap();
        let parsed: NetworkFile = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.vertices.len(), 2);
        assert_eq!(parsed.edges.len(), 1);
    }
}
