//! Context-aware matching of onset frequencies to reference notes

use crate::config::MatchingConfig;
use crate::error::Result as ResynthResult;
use crate::notes::NoteTable;
use crate::onset::OnsetEvent;
use serde::{Deserialize, Serialize};

/// An onset matched to a reference note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedNote {
    /// Time in seconds, copied from the onset event
    pub time_sec: f32,
    /// Identifier of the selected reference note
    pub note: String,
}

/// Match each onset event to the reference note with the lowest score
///
/// Score per candidate:
/// fundamental distance, plus `base_octave_penalty` per octave of distance
/// from the target octave, plus `context_weight` per octave of distance from
/// the previously matched note's octave. The previous octave starts at the
/// target octave and follows the winners through the sequence, so matching is
/// a fold over the events, one result per event in input order.
///
/// Candidates are scanned in table insertion order and selection is a strict
/// minimum, so the first entry wins ties. Entries without a parseable octave
/// score as the target octave and leave the carried octave unchanged when
/// they win.
pub fn match_notes(
    events: &[OnsetEvent],
    table: &NoteTable,
    config: &MatchingConfig,
) -> ResynthResult<Vec<MatchedNote>> {
    table.validate()?;

    let mut matched = Vec::with_capacity(events.len());
    let mut previous_octave = config.target_octave;

    for event in events {
        let mut best_entry = &table.entries()[0];
        let mut best_score = f32::INFINITY;

        for entry in table.entries() {
            let note_octave = entry.octave.unwrap_or(config.target_octave);

            let fundamental_diff = (entry.frequency_hz - event.frequency_hz).abs();
            let octave_diff = (note_octave - config.target_octave).abs() as f32;
            let context_diff = (note_octave - previous_octave).abs() as f32;

            let score = fundamental_diff
                + config.base_octave_penalty * octave_diff
                + config.context_weight * context_diff;

            if score < best_score {
                best_score = score;
                best_entry = entry;
            }
        }

        if let Some(octave) = best_entry.octave {
            previous_octave = octave;
        }
        matched.push(MatchedNote {
            time_sec: event.time_sec,
            note: best_entry.id.clone(),
        });
    }

    Ok(matched)
}
