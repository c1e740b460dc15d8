//! Matching oracles for the postman pipeline.
//!
//! [`ExactMatcher`] computes a true maximum-weight perfect matching by
//! dynamic programming over vertex subsets: exponential in the node count,
//! exact, and comfortably fast for the odd-vertex sets street-network
//! patches produce (a handful to about twenty nodes). [`GreedyMatcher`]
//! trades optimality for scale: it repeatedly pairs the heaviest remaining
//! edge and handles any node count, which keeps whole-network solves viable
//! when the odd set outgrows the exact matcher's limit.

#![forbid(unsafe_code)]

use kerbside_core::{MatchingError, MatchingOracle};

/// Default node limit of [`ExactMatcher`].
///
/// `2^20` subset states is a few megabytes of table; beyond that the DP
/// stops being a sensible trade and callers should switch to
/// [`GreedyMatcher`].
pub const DEFAULT_NODE_LIMIT: usize = 20;

const UNSET: usize = usize::MAX;

/// Exact maximum-weight perfect matching via subset dynamic programming.
///
/// # Examples
///
/// ```
/// use kerbside_core::MatchingOracle;
/// use kerbside_matcher::ExactMatcher;
///
/// // Complete graph over four nodes; pairing (0,1) + (2,3) wins.
/// let edges = [
///     (0, 1, 10.0),
///     (0, 2, 1.0),
///     (0, 3, 1.0),
///     (1, 2, 1.0),
///     (1, 3, 1.0),
///     (2, 3, 10.0),
/// ];
/// let mates = ExactMatcher::new().matching(&edges, 4).unwrap();
/// assert_eq!(mates, vec![1, 0, 3, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    node_limit: usize,
}

impl Default for ExactMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactMatcher {
    /// Matcher with the default node limit.
    pub fn new() -> Self {
        Self {
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }

    /// Matcher with an explicit node limit.
    ///
    /// Table size grows as `2^limit`; limits much above the default trade
    /// large amounts of memory for little practical gain.
    pub fn with_node_limit(node_limit: usize) -> Self {
        Self { node_limit }
    }
}

/// Dense weight table from the sparse edge list; `None` marks absent pairs.
fn weight_table(edges: &[(usize, usize, f64)], nodes: usize) -> Vec<Option<f64>> {
    let mut table = vec![None; nodes * nodes];
    for &(i, j, weight) in edges {
        if i < nodes && j < nodes && i != j {
            table[i * nodes + j] = Some(weight);
            table[j * nodes + i] = Some(weight);
        }
    }
    table
}

impl MatchingOracle for ExactMatcher {
    fn matching(
        &self,
        edges: &[(usize, usize, f64)],
        nodes: usize,
    ) -> Result<Vec<usize>, MatchingError> {
        if nodes == 0 {
            return Ok(Vec::new());
        }
        if nodes % 2 == 1 {
            return Err(MatchingError::NoPerfectMatching { nodes });
        }
        if nodes > self.node_limit {
            return Err(MatchingError::InstanceTooLarge {
                nodes,
                limit: self.node_limit,
            });
        }

        let weights = weight_table(edges, nodes);
        let full: usize = (1 << nodes) - 1;

        // best[mask] = maximum matched weight pairing exactly the set bits.
        let mut best = vec![f64::NEG_INFINITY; full + 1];
        // choice[mask] = the pair (i, j) completing mask in the best pairing.
        let mut choice = vec![(UNSET, UNSET); full + 1];
        best[0] = 0.0;

        for mask in 0..=full {
            if best[mask] == f64::NEG_INFINITY {
                continue;
            }
            // Always match the lowest unmatched node first; every perfect
            // matching is reached exactly once this way.
            let i = (mask as u64).trailing_ones() as usize;
            if i >= nodes {
                continue;
            }
            for j in (i + 1)..nodes {
                if mask & (1 << j) != 0 {
                    continue;
                }
                let Some(weight) = weights[i * nodes + j] else {
                    continue;
                };
                let next = mask | (1 << i) | (1 << j);
                let candidate = best[mask] + weight;
                if candidate > best[next] {
                    best[next] = candidate;
                    choice[next] = (i, j);
                }
            }
        }

        if best[full] == f64::NEG_INFINITY {
            return Err(MatchingError::NoPerfectMatching { nodes });
        }

        let mut mates = vec![UNSET; nodes];
        let mut mask = full;
        while mask != 0 {
            let (i, j) = choice[mask];
            if i == UNSET {
                // Unreachable once best[full] is finite; guard anyway.
                return Err(MatchingError::NoPerfectMatching { nodes });
            }
            mates[i] = j;
            mates[j] = i;
            mask &= !((1 << i) | (1 << j));
        }
        Ok(mates)
    }
}

/// Greedy approximate matching: heaviest remaining pair first.
///
/// Valid perfect matching on complete graphs of any even size; at least
/// half the optimal total weight. Deterministic: ties break on the lower
/// index pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatcher;

impl MatchingOracle for GreedyMatcher {
    fn matching(
        &self,
        edges: &[(usize, usize, f64)],
        nodes: usize,
    ) -> Result<Vec<usize>, MatchingError> {
        if nodes % 2 == 1 {
            return Err(MatchingError::NoPerfectMatching { nodes });
        }

        let mut ranked: Vec<&(usize, usize, f64)> = edges
            .iter()
            .filter(|&&(i, j, _)| i < nodes && j < nodes && i != j)
            .collect();
        ranked.sort_by(|a, b| {
            b.2.total_cmp(&a.2)
                .then_with(|| (a.0, a.1).cmp(&(b.0, b.1)))
        });

        let mut mates = vec![UNSET; nodes];
        let mut remaining = nodes;
        for &&(i, j, _) in &ranked {
            if mates[i] == UNSET && mates[j] == UNSET {
                mates[i] = j;
                mates[j] = i;
                remaining -= 2;
                if remaining == 0 {
                    break;
                }
            }
        }

        if remaining != 0 {
            log::warn!("greedy matching left {remaining} of {nodes} nodes unpaired");
            return Err(MatchingError::NoPerfectMatching { nodes });
        }
        Ok(mates)
    }
}
