//! Smoke tests for the verify and stats commands over generated files.

use ssq_history::generate_cmd::generate;
use ssq_history::stats_cmd::stats;
use ssq_history::verify_cmd;

#[test]
fn test_verify_generated_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    let summary = generate(&path, 50, 42).unwrap();

    let report = verify_cmd::verify(&path).unwrap();
    assert_eq!(report.rows, 50);
    assert_eq!(report.first_identifier, Some(2023001));
    assert_eq!(report.last_identifier, Some(2023050));
    assert_eq!(report.sha256, summary.sha256);
}

#[test]
fn test_verify_detects_tampering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    generate(&path, 5, 42).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    // duplicate a primary number in the second data row
    let mut fields: Vec<String> = lines[2].split(',').map(str::to_string).collect();
    fields[2] = fields[1].clone();
    lines[2] = fields.join(",");
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();

    assert!(verify_cmd::verify(&path).is_err());
}

#[test]
fn test_verify_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    let json = dir.path().join("reports").join("verify.json");
    generate(&path, 8, 3).unwrap();

    verify_cmd::run(path.clone(), Some(json.clone())).unwrap();

    let bytes = std::fs::read(&json).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["rows"], 8);
    assert_eq!(v["last_identifier"], 2023008);
}

#[test]
fn test_stats_over_generated_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    generate(&path, 200, 42).unwrap();

    let report = stats(&path, 6).unwrap();
    assert_eq!(report.rows, 200);
    assert_eq!(report.skipped_rows, 0);

    let f = &report.frequencies;
    assert_eq!(f.primary.iter().map(|c| c.count).sum::<u64>(), 6 * 200);
    assert_eq!(f.secondary.iter().map(|c| c.count).sum::<u64>(), 200);
    assert_eq!(f.hot.len(), 6);
    assert_eq!(f.cold.len(), 6);

    let count_of = |n: u8| f.primary[n as usize - 1].count;
    assert!(count_of(f.hot[0]) >= count_of(f.hot[5]));
    assert!(count_of(f.cold[0]) <= count_of(f.cold[5]));
    assert!(count_of(f.hot[5]) >= count_of(f.cold[5]));
}

#[test]
fn test_stats_tolerates_tab_file_with_junk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.tsv");
    std::fs::write(
        &path,
        "期号\t红1\t红2\t红3\t红4\t红5\t红6\t蓝\n2023001\t1\t2\t3\t4\t5\t6\t7\nbad line\n2023002\t1\t2\t3\n2023003\t7\t8\t9\t10\t11\t12\t13\n",
    )
    .unwrap();

    let report = stats(&path, 3).unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.skipped_rows, 1);
    assert_eq!(report.frequencies.hot, vec![1, 2, 3]);
}
