//! Hot/cold frequency statistics over a draw history.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::schema::{DrawRecord, PRIMARY_MAX, SECONDARY_MAX};
use crate::storage::{Strictness, read_history};
use crate::{HistoryError, HistoryResult, write_json};

pub const DEFAULT_TOP: usize = 6;

/// How often one number was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberCount {
    pub number: u8,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub path: PathBuf,
    pub rows: usize,
    pub skipped_rows: usize,
    #[serde(flatten)]
    pub frequencies: Frequencies,
}

#[derive(Debug, Clone, Serialize)]
pub struct Frequencies {
    /// Counts for 1..=33, in number order.
    pub primary: Vec<NumberCount>,
    /// Counts for 1..=16, in number order.
    pub secondary: Vec<NumberCount>,
    /// Most drawn primaries, most frequent first.
    pub hot: Vec<u8>,
    /// Least drawn primaries, least frequent first.
    pub cold: Vec<u8>,
}

fn tally(max: u8, values: impl Iterator<Item = u8>) -> Vec<NumberCount> {
    let mut counts: Vec<NumberCount> = (1..=max).map(|number| NumberCount { number, count: 0 }).collect();
    for v in values {
        if let Some(slot) = counts.get_mut(usize::from(v).wrapping_sub(1)) {
            slot.count += 1;
        }
    }
    counts
}

/// Ranks primaries by frequency. Ties go to the smaller number in both lists.
pub fn hot_cold(primary: &[NumberCount], top: usize) -> (Vec<u8>, Vec<u8>) {
    let mut by_desc = primary.to_vec();
    by_desc.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
    let mut by_asc = primary.to_vec();
    by_asc.sort_by(|a, b| a.count.cmp(&b.count).then(a.number.cmp(&b.number)));
    (
        by_desc.iter().take(top).map(|c| c.number).collect(),
        by_asc.iter().take(top).map(|c| c.number).collect(),
    )
}

pub fn compute_stats(records: &[DrawRecord], top: usize) -> HistoryResult<Frequencies> {
    if !(1..=PRIMARY_MAX as usize).contains(&top) {
        return Err(HistoryError::InvalidArgument(format!(
            "top must be in 1..={PRIMARY_MAX}, got {top}"
        )));
    }
    let primary = tally(PRIMARY_MAX, records.iter().flat_map(|r| r.primary_numbers));
    let secondary = tally(SECONDARY_MAX, records.iter().map(|r| r.secondary_number));
    let (hot, cold) = hot_cold(&primary, top);
    Ok(Frequencies { primary, secondary, hot, cold })
}

pub fn stats(path: &Path, top: usize) -> HistoryResult<StatsReport> {
    let loaded = read_history(path, Strictness::Lenient)?;
    let frequencies = compute_stats(&loaded.records, top)?;
    info!(path = %path.display(), rows = loaded.records.len(), skipped = loaded.skipped_rows, "stats computed");
    Ok(StatsReport {
        path: path.to_path_buf(),
        rows: loaded.records.len(),
        skipped_rows: loaded.skipped_rows,
        frequencies,
    })
}

fn join(numbers: &[u8]) -> String {
    numbers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
}

pub fn run(input: PathBuf, top: usize, json_out: Option<PathBuf>) -> HistoryResult<()> {
    let report = stats(&input, top)?;
    if let Some(json_path) = json_out {
        write_json(&json_path, &report)?;
    }
    println!(
        "stats: rows={} skipped={} hot=[{}] cold=[{}]",
        report.rows,
        report.skipped_rows,
        join(&report.frequencies.hot),
        join(&report.frequencies.cold)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: u64, primary: [u8; 6], secondary: u8) -> DrawRecord {
        DrawRecord { identifier: id, primary_numbers: primary, secondary_number: secondary }
    }

    #[test]
    fn test_tally_counts() {
        let records = vec![rec(1, [1, 2, 3, 4, 5, 6], 1), rec(2, [1, 2, 3, 30, 31, 33], 16)];
        let Frequencies { primary, secondary, .. } = compute_stats(&records, 6).unwrap();
        assert_eq!(primary.len(), 33);
        assert_eq!(secondary.len(), 16);
        assert_eq!(primary[0], NumberCount { number: 1, count: 2 });
        assert_eq!(primary[32], NumberCount { number: 33, count: 1 });
        assert_eq!(primary[6].count, 0);
        assert_eq!(primary.iter().map(|c| c.count).sum::<u64>(), 12);
        assert_eq!(secondary[0].count, 1);
        assert_eq!(secondary[15].count, 1);
    }

    #[test]
    fn test_hot_cold_tie_break() {
        let records = vec![rec(1, [1, 2, 3, 4, 5, 6], 1), rec(2, [1, 2, 3, 30, 31, 33], 16)];
        let Frequencies { hot, cold, .. } = compute_stats(&records, 6).unwrap();
        assert_eq!(hot, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(cold, vec![7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_top_out_of_range() {
        assert!(matches!(compute_stats(&[], 0), Err(HistoryError::InvalidArgument(_))));
        assert!(matches!(compute_stats(&[], 34), Err(HistoryError::InvalidArgument(_))));
        assert_eq!(compute_stats(&[], 33).unwrap().hot.len(), 33);
    }
}
