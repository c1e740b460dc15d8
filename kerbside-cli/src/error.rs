//! Error types emitted by the kerbside CLI.

use std::path::PathBuf;

use kerbside_core::{CppError, ExpandError, GraphError, ShortestPathError, VertexId};
use thiserror::Error;

/// Errors emitted by the kerbside CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// The network file could not be read.
    #[error("failed to read network file {path:?}: {source}")]
    ReadNetwork {
        /// Offending path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The network file is not valid JSON of the expected shape.
    #[error("failed to parse network file {path:?}: {source}")]
    ParseNetwork {
        /// Offending path.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// The network description violates a graph invariant.
    #[error("invalid network: {0}")]
    InvalidNetwork(#[from] GraphError),
    /// An edge record referenced a vertex id absent from the vertex list.
    #[error("edge ({v1}, {v2}) references an unknown vertex")]
    DanglingEdge {
        /// First endpoint of the offending record.
        v1: VertexId,
        /// Second endpoint.
        v2: VertexId,
    },
    /// Solving the postman tour failed.
    #[error(transparent)]
    Solve(#[from] CppError),
    /// Subgraph expansion failed.
    #[error(transparent)]
    Expansion(#[from] ExpandError),
    /// The fallback shortest-path search failed.
    #[error(transparent)]
    ShortestPath(#[from] ShortestPathError),
    /// The patrol loop stopped making progress.
    #[error("patrol made no progress from vertex {0}")]
    Stalled(VertexId),
    /// Serializing the report failed.
    #[error("failed to serialise output: {0}")]
    Output(#[from] serde_json::Error),
}
