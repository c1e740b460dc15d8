//! Behavioural tests for progressive coverage via subgraph expansion.
//!
//! Drives the full patrol loop the way a caller would: expand a patch,
//! solve it, commit its edges to the shared excluded set, and fall back to
//! the nearest uncovered edge when local growth stalls.

use std::collections::BTreeSet;

use kerbside_core::test_support::{SequentialOracle, unit_grid};
use kerbside_core::{
    CppSolver, VertexId, expand_from_seed, find_optimum_expansion, nearest_uncovered_edge,
};
use rstest::rstest;

#[rstest]
fn patrol_loop_covers_the_whole_grid() {
    let graph = unit_grid(3, 3);
    let solver = CppSolver::new(SequentialOracle);
    let mut excluded: BTreeSet<usize> = BTreeSet::new();
    let mut seed: VertexId = 1;
    let mut rounds = 0;

    while excluded.len() < graph.edge_count() {
        rounds += 1;
        assert!(
            rounds <= 2 * graph.edge_count(),
            "patrol loop failed to progress"
        );

        let expansion = find_optimum_expansion(&graph, seed, &excluded).expect("valid seed");
        if expansion.is_empty() {
            let (_, resume) = nearest_uncovered_edge(&graph, seed, &excluded)
                .expect("shortest paths")
                .expect("uncovered edges remain");
            seed = resume;
            continue;
        }

        // Patches never overlap earlier rounds.
        assert!(expansion.edge_indices().is_disjoint(&excluded));

        let tour = solver.solve(expansion.graph()).expect("patch solve");
        assert!(tour.len() > 1);

        expansion.commit(&mut excluded);
        // Resume from wherever the patrol finished.
        seed = *tour.last().expect("non-empty tour");
    }

    assert_eq!(excluded.len(), graph.edge_count());
}

#[rstest]
fn stalled_local_growth_falls_back_to_remote_edges() {
    let graph = unit_grid(2, 4);

    // Everything around the seed is already covered; only a remote rung of
    // the far column remains.
    let remote = graph.edge_index(4, 8).expect("grid edge");
    let excluded: BTreeSet<usize> = (0..graph.edge_count()).filter(|&i| i != remote).collect();

    let local = expand_from_seed(&graph, 1, &excluded, 10).expect("valid seed");
    assert!(local.is_empty(), "seed neighbourhood is fully covered");

    let (index, resume) = nearest_uncovered_edge(&graph, 1, &excluded)
        .expect("shortest paths")
        .expect("one edge remains");
    assert_eq!(index, remote);
    assert!(graph.edge(index).expect("edge").touches(resume));

    // Expansion resumes and picks up the remote edge.
    let resumed = expand_from_seed(&graph, resume, &excluded, 10).expect("valid resume");
    assert!(resumed.edge_indices().contains(&remote));
}

#[rstest]
fn nothing_uncovered_reports_completion() {
    let graph = unit_grid(2, 4);
    let excluded: BTreeSet<usize> = (0..graph.edge_count()).collect();
    assert_eq!(
        nearest_uncovered_edge(&graph, 1, &excluded).expect("shortest paths"),
        None
    );
}

#[rstest]
fn expansion_from_an_interior_seed_stays_consistent() {
    let graph = unit_grid(3, 3);
    // Vertex 5 is the grid centre.
    let expansion = find_optimum_expansion(&graph, 5, &BTreeSet::new()).expect("valid seed");
    assert!(!expansion.is_empty());
    let odd = expansion.graph().odd_degree_vertices().len();
    assert_eq!(odd % 2, 0, "handshake lemma");
    assert!(expansion.graph().is_connected());
}
