use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use blackjack::{SettlementRecord, SettlementSink};

/// Appends settled hands to a file, one JSON object per line.
pub struct JsonLinesRecorder {
    path: PathBuf,
}

impl JsonLinesRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last `limit` saved hands, newest first, each with its 1-based
    /// line number as id. A file that does not exist yet holds no rounds.
    pub fn recent(&self, limit: usize) -> io::Result<Vec<(usize, SettlementRecord)>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: SettlementRecord = serde_json::from_str(&line)?;
            entries.push((index + 1, record));
        }

        let skip = entries.len().saturating_sub(limit);
        Ok(entries.into_iter().skip(skip).rev().collect())
    }
}

impl SettlementSink for JsonLinesRecorder {
    type Error = io::Error;

    fn record(&mut self, records: &[SettlementRecord]) -> Result<(), Self::Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut out = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        log::debug!("Appended {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}
