//! Matched-note statistics and summary export

use crate::error::{ResynthError, Result as ResynthResult};
use crate::matcher::MatchedNote;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A note and how many times it was matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCount {
    pub note: String,
    pub count: usize,
}

/// Summary of one resynthesis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Input file that was analyzed
    pub input: String,
    /// Number of detected onset events
    pub onset_count: usize,
    /// Number of distinct notes used in the output
    pub distinct_notes: usize,
    /// Sample rate of the synthesized output
    pub output_sample_rate: u32,
    /// Length of the synthesized output in seconds
    pub output_duration_sec: f32,
    /// Most frequent matched notes, descending
    pub top_notes: Vec<NoteCount>,
}

/// The `n` most frequent notes, descending by count
///
/// Counting walks the sequence in order and the sort is stable, so notes with
/// equal counts keep their first-seen order.
pub fn top_notes(matched: &[MatchedNote], n: usize) -> Vec<NoteCount> {
    let mut counts: Vec<NoteCount> = Vec::new();

    for m in matched {
        match counts.iter_mut().find(|c| c.note == m.note) {
            Some(entry) => entry.count += 1,
            None => counts.push(NoteCount {
                note: m.note.clone(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Write the run summary as a JSON artifact
pub fn export_summary<P: AsRef<Path>>(path: P, summary: &RunSummary) -> ResynthResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path.as_ref(), json).map_err(|e| {
        ResynthError::SummaryExportError(format!(
            "Cannot write summary {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    Ok(())
}
