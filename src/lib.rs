//! Note-Based Song Resynthesis
//!
//! Turns a recorded performance into a sequence of discrete note events and
//! rebuilds an audio signal from pre-recorded single-note samples: onset
//! detection with dominant-frequency extraction, octave-aware context-
//! sensitive note matching, and overlap-add synthesis.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod matcher;
pub mod notes;
pub mod onset;
pub mod pitch;
pub mod resample;
pub mod spectral;
pub mod store;
pub mod synth;

pub use config::Config;
pub use error::{ResynthError, Result as ResynthResult};
pub use matcher::MatchedNote;
pub use notes::NoteTable;
pub use onset::OnsetEvent;

use analysis::RunSummary;
use std::path::Path;

/// Main processing pipeline for song resynthesis
pub struct SongResynth {
    config: Config,
}

impl SongResynth {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Analyze a song, resynthesize it from note samples, and write results
    ///
    /// Writes `recreated.wav` (and `summary.json` unless disabled) into
    /// `output_dir` and returns the run summary.
    pub fn process<P: AsRef<Path>>(
        &self,
        input_path: P,
        note_dir: P,
        table_path: P,
        output_dir: P,
    ) -> ResynthResult<RunSummary> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        println!("Loading {}...", input_path.display());
        let (samples, sample_rate) = audio::load_audio_file(input_path)?;

        println!("Extracting onsets...");
        let events = onset::extract_onsets(&samples, sample_rate, &self.config)?;
        println!("  ✓ {} onset events", events.len());

        let table = notes::load_or_build_note_table(
            table_path.as_ref(),
            note_dir.as_ref(),
            &self.config.table,
        )?;
        println!("  ✓ note table with {} entries", table.len());

        println!("Matching notes...");
        let matched = matcher::match_notes(&events, &table, &self.config.matching)?;

        let note_ids = store::distinct_notes(&matched);
        println!("  ✓ {} distinct notes", note_ids.len());
        let waveforms = store::load_note_waveforms(&note_ids, note_dir.as_ref())?;

        println!("Synthesizing...");
        let output_rate = self.config.synthesis.output_sample_rate;
        let buffer = synth::synthesize(&matched, &waveforms, output_rate)?;
        println!(
            "  ✓ {:.2} s of audio at {} Hz",
            buffer.len() as f32 / output_rate as f32,
            output_rate
        );

        let normalized = audio::normalize_peak(&buffer);
        audio::write_wav_file(output_dir.join("recreated.wav"), &normalized, output_rate)?;

        let summary = RunSummary {
            input: input_path.display().to_string(),
            onset_count: events.len(),
            distinct_notes: note_ids.len(),
            output_sample_rate: output_rate,
            output_duration_sec: buffer.len() as f32 / output_rate as f32,
            top_notes: analysis::top_notes(&matched, self.config.export.top_notes),
        };

        if self.config.export.write_summary {
            analysis::export_summary(output_dir.join("summary.json"), &summary)?;
        }

        Ok(summary)
    }
}

/// Validate configuration and the input file
pub fn validate_input<P: AsRef<Path>>(input_path: P, config: &Config) -> ResynthResult<()> {
    audio::validate_audio_file(input_path)?;
    config::validate_config(config)?;
    Ok(())
}
