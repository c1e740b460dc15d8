//! End-to-end tests over network files on disk.

use std::io::Write;

use kerbside_cli::{patrol, solve};
use rstest::rstest;
use tempfile::NamedTempFile;

/// Unit-square network with one derived-weight diagonal omitted.
const SQUARE_JSON: &str = r#"{
    "name": "square",
    "vertices": [
        { "id": 1, "x": 0.0, "y": 0.0 },
        { "id": 2, "x": 0.0001, "y": 0.0 },
        { "id": 3, "x": 0.0001, "y": 0.0001 },
        { "id": 4, "x": 0.0, "y": 0.0001 }
    ],
    "edges": [
        { "v1": 1, "v2": 2 },
        { "v1": 2, "v2": 3 },
        { "v1": 3, "v2": 4 },
        { "v1": 4, "v2": 1 }
    ]
}"#;

fn network_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp network file");
    file.write_all(contents.as_bytes()).expect("write network");
    file
}

#[rstest]
fn solve_command_produces_a_closed_tour() {
    let file = network_file(SQUARE_JSON);
    let report = solve::run_solve(file.path()).expect("solve");
    assert_eq!(report.tour.len(), 5);
    assert_eq!(report.tour.first(), report.tour.last());
    assert_eq!(report.edges_covered, 4);
    // Each side is 0.0001 long, scaled to weight 1.
    assert_eq!(report.total_weight, 4.0);
}

#[rstest]
fn patrol_command_covers_the_square() {
    let file = network_file(SQUARE_JSON);
    let report = patrol::run_patrol(file.path(), 1, None).expect("patrol");
    assert!(report.complete);
    assert_eq!(report.network_edges, 4);
    let covered: usize = report.rounds.iter().map(|r| r.patch_edges).sum();
    assert_eq!(covered, 4);
}

#[rstest]
fn malformed_network_is_rejected() {
    let file = network_file("{ not json");
    let err = solve::run_solve(file.path()).expect_err("parse failure");
    assert!(matches!(err, kerbside_cli::CliError::ParseNetwork { .. }));
}

#[rstest]
fn missing_file_is_rejected() {
    let err = solve::run_solve(std::path::Path::new("/nonexistent/net.json"))
        .expect_err("read failure");
    assert!(matches!(err, kerbside_cli::CliError::ReadNetwork { .. }));
}
