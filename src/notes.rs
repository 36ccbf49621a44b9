//! Reference note table: note identifiers mapped to fundamental frequencies

use crate::audio;
use crate::config::TableConfig;
use crate::error::{ResynthError, Result as ResynthResult};
use crate::pitch;
use serde_json::{Map, Value};
use std::path::Path;

/// One reference note: identifier, fundamental, and pre-parsed octave
#[derive(Debug, Clone)]
pub struct NoteEntry {
    /// Note identifier, e.g. a sample file name such as "c4.wav"
    pub id: String,
    /// Fundamental frequency in Hz
    pub frequency_hz: f32,
    /// Octave number parsed from the id, if it contains one
    pub octave: Option<i32>,
}

/// Immutable mapping from note identifier to fundamental frequency
///
/// Entries keep their insertion order (the order of the JSON file or of the
/// sorted sample directory). That order is the matcher's tie-break order, so
/// it must stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct NoteTable {
    entries: Vec<NoteEntry>,
}

impl NoteTable {
    /// Build a table from (id, frequency) pairs, parsing octaves once
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(id, frequency_hz)| {
                let id = id.into();
                let octave = parse_octave(&id);
                NoteEntry {
                    id,
                    frequency_hz,
                    octave,
                }
            })
            .collect();
        Self { entries }
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[NoteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the table invariants: non-empty, all frequencies positive finite
    pub fn validate(&self) -> ResynthResult<()> {
        if self.entries.is_empty() {
            return Err(ResynthError::InvalidNoteTable(
                "Note table is empty".to_string(),
            ));
        }
        for entry in &self.entries {
            if !entry.frequency_hz.is_finite() || entry.frequency_hz <= 0.0 {
                return Err(ResynthError::InvalidNoteTable(format!(
                    "Note '{}' has non-positive frequency {}",
                    entry.id, entry.frequency_hz
                )));
            }
        }
        Ok(())
    }

    /// Load a table from a JSON object file, keeping the file's key order
    pub fn load<P: AsRef<Path>>(path: P) -> ResynthResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ResynthError::InvalidNoteTable(format!(
                "Cannot read note table {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let map: Map<String, Value> = serde_json::from_str(&contents)
            .map_err(|e| ResynthError::InvalidNoteTable(format!("Invalid table JSON: {}", e)))?;

        let mut pairs = Vec::with_capacity(map.len());
        for (id, value) in map {
            let frequency = value.as_f64().ok_or_else(|| {
                ResynthError::InvalidNoteTable(format!("Note '{}' has a non-numeric frequency", id))
            })?;
            pairs.push((id, frequency as f32));
        }

        let table = Self::from_pairs(pairs);
        table.validate()?;
        Ok(table)
    }

    /// Save the table as a JSON object in entry order
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ResynthResult<()> {
        let mut map = Map::new();
        for entry in &self.entries {
            map.insert(entry.id.clone(), Value::from(entry.frequency_hz as f64));
        }
        let json = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| ResynthError::InvalidNoteTable(e.to_string()))?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            ResynthError::InvalidNoteTable(format!(
                "Cannot write note table {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(())
    }
}

/// Parse the octave number from a note identifier
///
/// The octave is the first run of ASCII digits in the id ("db5.wav" parses
/// as 5). Ids without digits have no octave.
pub fn parse_octave(id: &str) -> Option<i32> {
    let bytes = id.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map(|len| start + len)
        .unwrap_or(bytes.len());
    id[start..end].parse().ok()
}

/// Build a note table from a directory of single-note WAV files
///
/// Each file's fundamental is the median YIN estimate over its frames; files
/// with no voiced pitch are skipped. Entries are in sorted file-name order so
/// repeated builds produce the same table.
pub fn build_note_table<P: AsRef<Path>>(
    dataset_dir: P,
    config: &TableConfig,
) -> ResynthResult<NoteTable> {
    let dataset_dir = dataset_dir.as_ref();
    let mut file_names: Vec<String> = std::fs::read_dir(dataset_dir)
        .map_err(|e| {
            ResynthError::InvalidNoteTable(format!(
                "Cannot read note directory {}: {}",
                dataset_dir.display(),
                e
            ))
        })?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.to_lowercase().ends_with(".wav"))
        .collect();
    file_names.sort();

    let mut pairs = Vec::with_capacity(file_names.len());
    for name in file_names {
        let (samples, sr) = audio::load_audio_file(dataset_dir.join(&name))?;
        let estimate = pitch::estimate_fundamental(
            &samples,
            sr,
            config.frame_size,
            config.frame_hop,
            config.min_frequency_hz,
            config.max_frequency_hz,
        );
        if let Some(frequency_hz) = estimate {
            pairs.push((name, frequency_hz));
        } else {
            eprintln!("Warning: no voiced pitch found in {}, skipping", name);
        }
    }

    let table = NoteTable::from_pairs(pairs);
    table.validate()?;
    Ok(table)
}

/// Load the cached table when present, otherwise build it and cache it
pub fn load_or_build_note_table<P: AsRef<Path>>(
    table_path: P,
    dataset_dir: P,
    config: &TableConfig,
) -> ResynthResult<NoteTable> {
    let table_path = table_path.as_ref();
    if table_path.exists() {
        return NoteTable::load(table_path);
    }
    let table = build_note_table(dataset_dir.as_ref(), config)?;
    table.save(table_path)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_octave_variants() {
        assert_eq!(parse_octave("c4.wav"), Some(4));
        assert_eq!(parse_octave("db5.wav"), Some(5));
        assert_eq!(parse_octave("a0.wav"), Some(0));
        assert_eq!(parse_octave("piano-12-sample.wav"), Some(12));
        assert_eq!(parse_octave("kick.wav"), None);
        assert_eq!(parse_octave(""), None);
    }

    #[test]
    fn test_from_pairs_preserves_order_and_octaves() {
        let table = NoteTable::from_pairs(vec![
            ("b3.wav".to_string(), 246.9),
            ("c4.wav".to_string(), 261.6),
            ("gong.wav".to_string(), 200.0),
        ]);

        let ids: Vec<&str> = table.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b3.wav", "c4.wav", "gong.wav"]);
        assert_eq!(table.entries()[0].octave, Some(3));
        assert_eq!(table.entries()[2].octave, None);
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        let table = NoteTable::default();
        assert!(matches!(
            table.validate(),
            Err(ResynthError::InvalidNoteTable(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_frequency() {
        let table = NoteTable::from_pairs(vec![("c4.wav".to_string(), 0.0)]);
        assert!(matches!(
            table.validate(),
            Err(ResynthError::InvalidNoteTable(_))
        ));
    }
}
