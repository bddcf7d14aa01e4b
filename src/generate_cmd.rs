use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{GeneratorConfig, load_generator_config};
use crate::core::draw::{DrawSequence, seeded_rng};
use crate::core::schema::BASE_OFFSET;
use crate::storage::{HistoryCsvWriter, Strictness, read_history};
use crate::{HistoryError, HistoryResult, sha256_hex, write_json};

/// What a generate/extend call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateSummary {
    pub path: PathBuf,
    pub rows: u64,
    pub seed: u64,
    pub first_identifier: u64,
    pub last_identifier: u64,
    pub sha256: String,
}

fn exhausted(last_identifier: u64, count: u64) -> HistoryError {
    HistoryError::InvalidArgument(format!(
        "cannot add {count} draws after identifier {last_identifier}: identifiers exhausted"
    ))
}

fn checked_count(count: i64) -> HistoryResult<u64> {
    u64::try_from(count)
        .ok()
        .filter(|c| *c >= 1)
        .ok_or_else(|| HistoryError::InvalidArgument(format!("count must be >= 1, got {count}")))
}

/// Write a header plus `count` seeded draws to `target`, replacing it.
///
/// The same `(count, seed)` always yields byte-identical output. `count < 1`
/// fails before the filesystem is touched, so an existing `target` survives.
pub fn generate(target: &Path, count: i64, seed: u64) -> HistoryResult<GenerateSummary> {
    let rows = checked_count(count)?;
    debug!(path = %target.display(), rows, seed, "generating history");

    let mut rng = seeded_rng(seed);
    let draws = DrawSequence::fresh(&mut rng, rows).ok_or_else(|| exhausted(BASE_OFFSET, rows))?;
    let bytes = HistoryCsvWriter::new().export(draws, target)?;

    let summary = GenerateSummary {
        path: target.to_path_buf(),
        rows,
        seed,
        first_identifier: BASE_OFFSET + 1,
        last_identifier: BASE_OFFSET + rows,
        sha256: sha256_hex(&bytes),
    };
    info!(path = %target.display(), rows, seed, sha256 = %summary.sha256, "history written");
    Ok(summary)
}

/// Append `count` seeded draws to an existing history, continuing its identifiers.
///
/// The existing file must pass strict reading. The whole file is rewritten
/// atomically, so a failure leaves the previous history intact.
pub fn extend(target: &Path, count: i64, seed: u64) -> HistoryResult<GenerateSummary> {
    let added = checked_count(count)?;
    let loaded = read_history(target, Strictness::Strict)?;
    let existing = loaded.records.len() as u64;
    let first_identifier = loaded.records.first().map_or(BASE_OFFSET + 1, |r| r.identifier);
    let last_existing = loaded.records.last().map_or(BASE_OFFSET, |r| r.identifier);
    debug!(path = %target.display(), existing, added, seed, "extending history");

    let mut rng = seeded_rng(seed);
    let draws = DrawSequence::after(&mut rng, last_existing, added)
        .ok_or_else(|| exhausted(last_existing, added))?;
    let records = loaded.records.into_iter().chain(draws);
    let bytes = HistoryCsvWriter::new().export(records, target)?;

    let summary = GenerateSummary {
        path: target.to_path_buf(),
        rows: existing + added,
        seed,
        first_identifier,
        last_identifier: last_existing + added, // bounded by DrawSequence::after
        sha256: sha256_hex(&bytes),
    };
    info!(path = %target.display(), existing, added, sha256 = %summary.sha256, "history extended");
    Ok(summary)
}

pub fn run(
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    count: Option<i64>,
    seed: Option<u64>,
    json_out: Option<PathBuf>,
) -> HistoryResult<()> {
    let base = match config {
        Some(path) => load_generator_config(&path)?,
        None => GeneratorConfig::default(),
    };
    let cfg = base.with_overrides(output, count, seed);

    let summary = generate(&cfg.output, cfg.count, cfg.seed)?;
    if let Some(json_path) = json_out {
        write_json(&json_path, &summary)?;
    }

    println!(
        "generate: path={} rows={} seed={} sha256={}",
        summary.path.display(),
        summary.rows,
        summary.seed,
        summary.sha256
    );
    Ok(())
}

pub fn run_extend(input: PathBuf, count: i64, seed: u64) -> HistoryResult<()> {
    let summary = extend(&input, count, seed)?;
    println!(
        "extend: path={} rows={} last={} sha256={}",
        summary.path.display(),
        summary.rows,
        summary.last_identifier,
        summary.sha256
    );
    Ok(())
}
