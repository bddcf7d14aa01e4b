//! CSV persistence for draw histories.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::schema::{DrawRecord, HEADERS, PRIMARY_COUNT};
use crate::{HistoryError, HistoryResult};

/// CSV writer for draw histories.
///
/// Always emits the fixed header followed by one row per record, comma
/// delimited with `\n` terminators regardless of platform.
#[derive(Debug, Clone, Default)]
pub struct HistoryCsvWriter;

impl HistoryCsvWriter {
    /// Create a new HistoryCsvWriter.
    pub fn new() -> Self {
        HistoryCsvWriter
    }

    /// Write records to `output`, replacing whatever was there.
    ///
    /// Rows go to a temporary file next to `output` which is renamed into
    /// place only after every row has been written and flushed. On error the
    /// temporary file is removed and an existing `output` keeps its contents.
    ///
    /// Returns the exact bytes written, for fingerprinting.
    pub fn export<I>(&self, records: I, output: &Path) -> HistoryResult<Vec<u8>>
    where
        I: IntoIterator<Item = DrawRecord>,
    {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
        }

        let mut buffer = Vec::new();
        self.export_to_writer(records, &mut buffer)?;

        let mut tmp = staging_file(dir, output).map_err(|e| HistoryError::io(output, e))?;
        debug!(tmp = %tmp.path().display(), "staging history output");
        tmp.write_all(&buffer).map_err(|e| HistoryError::io(output, e))?;
        tmp.as_file().sync_all().map_err(|e| HistoryError::io(output, e))?;
        tmp.persist(output).map_err(|e| HistoryError::io(output, e.error))?;

        Ok(buffer)
    }

    /// Write header and records to any writer implementing Write.
    pub fn export_to_writer<I, W>(&self, records: I, writer: W) -> HistoryResult<()>
    where
        I: IntoIterator<Item = DrawRecord>,
        W: Write,
    {
        let mut csv_writer = ::csv::WriterBuilder::new()
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer
            .write_record(HEADERS)
            .map_err(|e| HistoryError::Message(format!("failed to write CSV headers: {e}")))?;

        for record in records {
            csv_writer
                .write_record(record.to_row())
                .map_err(|e| HistoryError::Message(format!("failed to write CSV row: {e}")))?;
        }

        csv_writer
            .flush()
            .map_err(|e| HistoryError::Message(format!("failed to flush CSV writer: {e}")))?;

        Ok(())
    }
}

/// Temp file for `export`, carrying the permissions the replaced file had, or
/// plain 0644 (less the umask) for a new file instead of tempfile's 0600.
fn staging_file(dir: &Path, output: &Path) -> std::io::Result<NamedTempFile> {
    let existing = std::fs::metadata(output).ok().filter(|m| m.is_file()).map(|m| m.permissions());

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Some(perms) = existing {
        tmp.as_file().set_permissions(perms)?;
    }
    Ok(tmp)
}

/// How the reader treats rows that are not valid draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Skip bad rows and count them.
    Lenient,
    /// Fail on the first bad row, and require identifiers to step by exactly 1.
    Strict,
}

/// Result of reading a history file.
#[derive(Debug, Clone, Default)]
pub struct LoadedHistory {
    pub records: Vec<DrawRecord>,
    /// First non-blank line, if any.
    pub header: Option<Vec<String>>,
    pub skipped_rows: usize,
}

pub fn read_history(path: &Path, strictness: Strictness) -> HistoryResult<LoadedHistory> {
    let text = std::fs::read_to_string(path).map_err(|e| HistoryError::io(path, e))?;
    parse_history(&text, strictness)
}

/// Parse history text line by line. Each line is split on tabs if it
/// contains one, otherwise on commas, so a comma header may precede
/// tab-separated rows. Lines whose first field is not all ASCII digits (the
/// header, notes) are skipped in both modes.
pub fn parse_history(text: &str, strictness: Strictness) -> HistoryResult<LoadedHistory> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut loaded = LoadedHistory::default();
    let mut previous: Option<u64> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx as u64 + 1;
        let Some(row) = split_line(raw)? else {
            continue;
        };

        if loaded.header.is_none() {
            loaded.header = Some(row.iter().map(str::to_string).collect());
        }
        let first = row.get(0).unwrap_or("");
        if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        let parsed = parse_row(&row, strictness).and_then(|record| {
            if strictness == Strictness::Strict {
                if let Some(prev) = previous {
                    if prev.checked_add(1) != Some(record.identifier) {
                        return Err(format!(
                            "identifier {} does not follow {}",
                            record.identifier, prev
                        ));
                    }
                }
            }
            Ok(record)
        });

        match parsed {
            Ok(record) => {
                previous = Some(record.identifier);
                loaded.records.push(record);
            }
            Err(reason) => match strictness {
                Strictness::Strict => return Err(HistoryError::Malformed { line, reason }),
                Strictness::Lenient => {
                    warn!(line, %reason, "skipping history row");
                    loaded.skipped_rows += 1;
                }
            },
        }
    }

    debug!(rows = loaded.records.len(), skipped = loaded.skipped_rows, "history parsed");
    Ok(loaded)
}

/// Split one line into trimmed fields; `None` for a blank line.
fn split_line(raw: &str) -> HistoryResult<Option<::csv::StringRecord>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let delimiter = if raw.contains('\t') { b'\t' } else { b',' };
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut row = ::csv::StringRecord::new();
    let found = reader
        .read_record(&mut row)
        .map_err(|e| HistoryError::Message(format!("failed to read CSV row: {e}")))?;
    Ok(found.then_some(row))
}

fn parse_row(row: &::csv::StringRecord, strictness: Strictness) -> Result<DrawRecord, String> {
    let width = HEADERS.len();
    if row.len() < width || (strictness == Strictness::Strict && row.len() != width) {
        return Err(format!("expected {width} fields, found {}", row.len()));
    }

    let identifier: u64 = row[0]
        .parse()
        .map_err(|e| format!("bad identifier {:?}: {e}", &row[0]))?;
    let mut primary_numbers = [0u8; PRIMARY_COUNT];
    for (i, slot) in primary_numbers.iter_mut().enumerate() {
        let field = &row[i + 1];
        *slot = field
            .parse()
            .map_err(|e| format!("bad primary number {field:?}: {e}"))?;
    }
    let field = &row[PRIMARY_COUNT + 1];
    let secondary_number = field
        .parse()
        .map_err(|e| format!("bad secondary number {field:?}: {e}"))?;

    let record = DrawRecord { identifier, primary_numbers, secondary_number };
    record.validate()?;
    Ok(record)
}
