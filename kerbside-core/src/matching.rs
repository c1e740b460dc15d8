//! Pluggable minimum-weight pairing of odd-degree vertices.
//!
//! The postman solver never implements matching itself; it hands a complete
//! weighted graph over the odd vertices to a [`MatchingOracle`] and trusts
//! the result. Oracles maximize total matched weight, so shortest-path
//! distances are fed through the strictly decreasing
//! [`inverse_distance_weight`] transform first: minimizing added detour
//! distance becomes maximizing matched weight, and the oracle stays entirely
//! distance-agnostic.

use thiserror::Error;

/// Scale constant of the inverse-distance transform.
pub const INVERSE_WEIGHT_SCALE: f64 = 1000.0;

/// Map a positive shortest-path distance to an oracle weight.
///
/// Strictly decreasing, so a maximum-weight matching over transformed
/// weights is a minimum-distance pairing.
pub fn inverse_distance_weight(distance: f64) -> f64 {
    INVERSE_WEIGHT_SCALE / distance
}

/// Errors surfaced by matching oracles and their call sites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    /// No perfect matching exists for the instance.
    ///
    /// The postman pipeline always supplies an even node count (handshake
    /// lemma) over a complete graph, so this indicates a malformed instance.
    #[error("no perfect matching exists over {nodes} nodes")]
    NoPerfectMatching {
        /// Node count of the failed instance.
        nodes: usize,
    },
    /// The oracle returned a partner array of the wrong length.
    #[error("matching result length {actual} does not match node count {expected}")]
    SizeMismatch {
        /// Expected partner-array length (the node count).
        expected: usize,
        /// Length actually returned.
        actual: usize,
    },
    /// The instance is larger than the oracle supports.
    #[error("matching instance with {nodes} nodes exceeds the supported limit of {limit}")]
    InstanceTooLarge {
        /// Node count of the rejected instance.
        nodes: usize,
        /// The oracle's node limit.
        limit: usize,
    },
}

/// Maximum-weight perfect matching over a complete weighted graph.
///
/// Nodes are logical indices `0..nodes`; `edges` lists `(i, j, weight)`
/// entries with `i < j`. A successful result maps every node to its matched
/// partner, i.e. `result[i] == j` implies `result[j] == i`.
///
/// Implementations must return a partner array of exactly `nodes` entries;
/// callers treat any other length as fatal
/// [`MatchingError::SizeMismatch`].
pub trait MatchingOracle {
    /// Compute a perfect matching maximizing total matched weight.
    fn matching(
        &self,
        edges: &[(usize, usize, f64)],
        nodes: usize,
    ) -> Result<Vec<usize>, MatchingError>;
}

impl<M: MatchingOracle + ?Sized> MatchingOracle for &M {
    fn matching(
        &self,
        edges: &[(usize, usize, f64)],
        nodes: usize,
    ) -> Result<Vec<usize>, MatchingError> {
        (**self).matching(edges, nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_is_strictly_decreasing() {
        let near = inverse_distance_weight(2.0);
        let far = inverse_distance_weight(500.0);
        assert!(near > far);
        assert_eq!(near, 500.0);
    }
}
