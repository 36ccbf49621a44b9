//! Song synthesis: placement, resampling, and additive overlap

use crate::error::{ResynthError, Result as ResynthResult};
use crate::matcher::MatchedNote;
use crate::resample::resample;
use crate::store::NoteWaveform;
use std::collections::HashMap;

/// Add a waveform into the buffer starting at `start`
///
/// Placement is strictly additive so overlapping notes sum. Waveforms
/// starting at or past the buffer end are dropped; those running past the end
/// are truncated.
pub fn mix_into(buffer: &mut [f32], wave: &[f32], start: usize) {
    if start >= buffer.len() {
        return;
    }
    let copy_len = wave.len().min(buffer.len() - start);
    for (dst, &src) in buffer[start..start + copy_len].iter_mut().zip(wave) {
        *dst += src;
    }
}

/// Recreate the song by placing matched note waveforms at their onset times
///
/// The output buffer covers the last onset plus one second of tail so the
/// final note has room to sound. Waveforms recorded at a different rate are
/// resampled to `sample_rate`, once per distinct note. No clipping or
/// normalization happens here.
pub fn synthesize(
    matched: &[MatchedNote],
    waveforms: &HashMap<String, NoteWaveform>,
    sample_rate: u32,
) -> ResynthResult<Vec<f32>> {
    if matched.is_empty() {
        return Err(ResynthError::EmptyOnsetSequence);
    }

    let max_time = matched.iter().map(|m| m.time_sec).fold(0.0f32, f32::max);

    let buffer_len = (sample_rate as f32 * (max_time + 1.0)).round() as usize;
    let mut buffer = vec![0.0f32; buffer_len];

    // The output rate is fixed for the whole call, so each distinct note is
    // converted at most once.
    let mut resampled: HashMap<&str, Vec<f32>> = HashMap::new();

    for m in matched {
        let waveform = waveforms
            .get(&m.note)
            .ok_or_else(|| ResynthError::MissingNoteWaveform(m.note.clone()))?;

        if !resampled.contains_key(m.note.as_str()) {
            let converted = resample(&waveform.samples, waveform.sample_rate, sample_rate)?;
            resampled.insert(m.note.as_str(), converted);
        }
        let wave = &resampled[m.note.as_str()];

        let start = (sample_rate as f32 * m.time_sec).round() as usize;
        mix_into(&mut buffer, wave, start);
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(time_sec: f32, note: &str) -> MatchedNote {
        MatchedNote {
            time_sec,
            note: note.to_string(),
        }
    }

    fn waveform(samples: Vec<f32>, sample_rate: u32) -> NoteWaveform {
        NoteWaveform {
            samples,
            sample_rate,
        }
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        let waveforms = HashMap::new();
        assert!(matches!(
            synthesize(&[], &waveforms, 44100),
            Err(ResynthError::EmptyOnsetSequence)
        ));
    }

    #[test]
    fn test_missing_waveform_is_a_data_error() {
        let waveforms = HashMap::new();
        let result = synthesize(&[matched(0.0, "c4.wav")], &waveforms, 44100);
        assert!(matches!(
            result,
            Err(ResynthError::MissingNoteWaveform(note)) if note == "c4.wav"
        ));
    }

    #[test]
    fn test_output_length_covers_last_onset_plus_tail() {
        let mut waveforms = HashMap::new();
        waveforms.insert("c4.wav".to_string(), waveform(vec![0.1; 10], 1000));

        let out = synthesize(&[matched(0.0, "c4.wav"), matched(2.5, "c4.wav")], &waveforms, 1000)
            .unwrap();
        assert_eq!(out.len(), 3500);
    }

    #[test]
    fn test_mix_into_drops_past_end_start() {
        let mut buffer = vec![0.0f32; 8];
        let untouched = buffer.clone();

        mix_into(&mut buffer, &[1.0, 1.0], 8);
        assert_eq!(buffer, untouched);

        mix_into(&mut buffer, &[1.0, 1.0], 100);
        assert_eq!(buffer, untouched);
    }

    #[test]
    fn test_mix_into_truncates_at_end() {
        let mut buffer = vec![0.0f32; 4];
        mix_into(&mut buffer, &[1.0, 2.0, 3.0], 2);
        assert_eq!(buffer, vec![0.0, 0.0, 1.0, 2.0]);
    }
}
