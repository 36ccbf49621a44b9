//! Loading of reference note waveforms

use crate::audio;
use crate::error::Result as ResynthResult;
use crate::matcher::MatchedNote;
use std::collections::HashMap;
use std::path::Path;

/// Raw samples of one reference note at its native rate
#[derive(Debug, Clone)]
pub struct NoteWaveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Distinct note ids referenced by a matched sequence, in first-seen order
pub fn distinct_notes(matched: &[MatchedNote]) -> Vec<String> {
    let mut seen = Vec::new();
    for m in matched {
        if !seen.iter().any(|s| s == &m.note) {
            seen.push(m.note.clone());
        }
    }
    seen
}

/// Load the waveform for each given note id from a sample directory
///
/// Each id is loaded once; the id is the file name within `note_dir`.
pub fn load_note_waveforms<P: AsRef<Path>>(
    note_ids: &[String],
    note_dir: P,
) -> ResynthResult<HashMap<String, NoteWaveform>> {
    let note_dir = note_dir.as_ref();
    let mut waveforms = HashMap::with_capacity(note_ids.len());

    for id in note_ids {
        if waveforms.contains_key(id) {
            continue;
        }
        let (samples, sample_rate) = audio::load_audio_file(note_dir.join(id))?;
        waveforms.insert(
            id.clone(),
            NoteWaveform {
                samples,
                sample_rate,
            },
        );
    }

    Ok(waveforms)
}
