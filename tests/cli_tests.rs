//! CLI integration tests for the comparison tools

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(name: &str) -> Command {
    let mut cmd = Command::cargo_bin(name).unwrap();
    cmd.env("RUST_LOG", "warn").env_remove("IDXFIDELITY_CONFIG");
    cmd
}

// ============================================================================
// ARGUMENT HANDLING
// ============================================================================

#[test]
fn test_ids_wrong_arity_prints_usage() {
    cli("compare-ids")
        .arg("only_one.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_reference_names_path() {
    let temp_dir = TempDir::new().unwrap();
    let candidate = temp_dir.path().join("cand.txt");
    fs::write(&candidate, "q\t1\n").unwrap();

    cli("compare-ids")
        .current_dir(temp_dir.path())
        .arg("missing_ref.txt")
        .arg(&candidate)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_ref.txt"));

    assert!(!temp_dir.path().join("missing_ref_comparisons.txt").exists());
}

#[test]
fn test_batch_rejects_unknown_format() {
    let temp_dir = TempDir::new().unwrap();
    cli("compare-batch")
        .arg(temp_dir.path())
        .arg(temp_dir.path())
        .args(["--format", "fasta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown result format"));
}

// ============================================================================
// SUCCESSFUL RUNS
// ============================================================================

#[test]
fn test_ids_writes_and_echoes_report() {
    let temp_dir = TempDir::new().unwrap();
    let reference = temp_dir.path().join("q1_result.txt");
    let candidate = temp_dir.path().join("q1_compressed.txt");
    fs::write(&reference, "q1\t1\t2\t3\t4\t10\n").unwrap();
    fs::write(&candidate, "q1\t2\t3\t4\t5\t9\n").unwrap();

    cli("compare-ids")
        .arg(&reference)
        .arg(&candidate)
        .assert()
        .success()
        .stdout(predicate::str::contains("Precision:  0.6000"))
        .stdout(predicate::str::contains("FALSE POSITIVES"));

    let report = fs::read_to_string(temp_dir.path().join("q1_result_comparisons.txt")).unwrap();
    assert!(report.contains("Recall:     0.6000"));
}

#[test]
fn test_abundance_with_output_and_json() {
    let temp_dir = TempDir::new().unwrap();
    let reference = temp_dir.path().join("ref.csv");
    let candidate = temp_dir.path().join("cand.csv");
    fs::write(&reference, "id,tag,abundance\na,1,10\nb,1,20\n").unwrap();
    fs::write(&candidate, "id,tag,abundance\na,1,10\nb,1,15\n").unwrap();
    let output = temp_dir.path().join("out/report.txt");
    let json = temp_dir.path().join("out/report.json");

    cli("compare-abundance")
        .arg(&reference)
        .arg(&candidate)
        .arg("-o")
        .arg(&output)
        .arg("--json")
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Mean absolute difference:        2.50"));

    assert!(output.exists());
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["presence"]["true_positives"], 2);
}

#[test]
fn test_matrix_with_plots() {
    let temp_dir = TempDir::new().unwrap();
    let reference = temp_dir.path().join("orig.tsv");
    let candidate = temp_dir.path().join("comp.tsv");
    fs::write(&reference, "#query\tg/a\tg/b\tg/c\ng/a\t0\t0.10\t0.20\ng/b\t0.10\t0\t0.30\ng/c\t0.20\t0.30\t0\n").unwrap();
    fs::write(&candidate, "#query\th/a\th/b\th/c\nh/a\t0\t0.12\t0.20\nh/b\t0.12\t0\t0.31\nh/c\t0.20\t0.31\t0\n").unwrap();
    let plots = temp_dir.path().join("plots");

    cli("compare-matrix")
        .arg(&reference)
        .arg(&candidate)
        .args(["--top", "2", "--thresholds", "0.01,0.05"])
        .arg("--plots")
        .arg(&plots)
        .assert()
        .success()
        .stdout(predicate::str::contains("4. WORST CASES (Top 2 largest differences)"))
        .stdout(predicate::str::contains("% < 0.05"));

    assert!(temp_dir.path().join("orig_matrix_comparison.txt").exists());
    assert!(plots.join("correlation_plot.svg").exists());
    assert!(plots.join("bland_altman_plot.svg").exists());
}

#[test]
fn test_colored_writes_default_report() {
    let temp_dir = TempDir::new().unwrap();
    let reference = temp_dir.path().join("q2_result.txt");
    let candidate = temp_dir.path().join("q2_compressed.txt");
    fs::write(&reference, ">h C:3:4\nACGT\n>h C:5:1\nTTTT\n").unwrap();
    fs::write(&candidate, ">h C:3:2\nACGT\n").unwrap();

    cli("compare-colored")
        .arg(&reference)
        .arg(&candidate)
        .assert()
        .success()
        .stdout(predicate::str::contains("COLORED QUERY COMPARISON: q2_result"))
        .stdout(predicate::str::contains("COLOR ABUNDANCE (2 distinct colors, 2 differing)"));

    assert!(temp_dir.path().join("q2_result_colored_comparison.txt").exists());
}

#[test]
fn test_batch_writes_summary() {
    let temp_dir = TempDir::new().unwrap();
    let orig = temp_dir.path().join("orig/query_results");
    let comp = temp_dir.path().join("comp/query_results");
    fs::create_dir_all(&orig).unwrap();
    fs::create_dir_all(&comp).unwrap();
    fs::write(orig.join("q1_result.txt"), ">h C:1:2\nACGT\n>h C:2:1\nTTTT\n").unwrap();
    fs::write(comp.join("q1_result.txt"), ">h C:1:2\nACGT\n").unwrap();
    let out_dir = temp_dir.path().join("summary");

    cli("compare-batch")
        .arg(temp_dir.path().join("orig"))
        .arg(temp_dir.path().join("comp"))
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("q1_result.txt: TP=1 FP=0 FN=1"))
        .stdout(predicate::str::contains("BATCH COMPARISON SUMMARY"));

    assert!(out_dir.join("analysis_summary.txt").exists());
    assert!(out_dir.join("query_analysis_results.json").exists());
}
