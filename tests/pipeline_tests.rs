//! End-to-end test: song in, recreated song and summary out

use resynth::audio::{load_audio_file, write_wav_file};
use resynth::{Config, SongResynth};
use std::f32::consts::PI;
use std::path::PathBuf;

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir()
        .join("resynth_pipeline_tests")
        .join(std::process::id().to_string());
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sine(freq: f32, sr: u32, n: usize, amplitude: f32) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * freq * i as f32 / sr as f32).sin() * amplitude)
        .collect()
}

/// A three-note "performance": 440 Hz bursts with sharp attacks
fn write_song(path: &PathBuf, sr: u32) {
    let mut audio = vec![0.0f32; sr as usize * 3];
    for &onset in &[0.5f32, 1.0, 1.5] {
        let start = (onset * sr as f32) as usize;
        for i in 0..(sr as f32 * 0.3) as usize {
            let t = i as f32 / sr as f32;
            audio[start + i] += (2.0 * PI * 440.0 * t).sin() * (-t * 8.0).exp() * 0.5;
        }
    }
    write_wav_file(path, &audio, sr).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recreates_a_song_from_note_samples() {
        let dir = scratch_dir();
        let sr = 22050;

        // Note samples at a rate that differs from the output rate, so the
        // run exercises resampling too
        let notes_dir = dir.join("notes");
        std::fs::create_dir_all(&notes_dir).unwrap();
        let n = (sr as f32 * 0.4) as usize;
        write_wav_file(notes_dir.join("a4.wav"), &sine(440.0, sr, n, 0.8), sr).unwrap();
        write_wav_file(notes_dir.join("c4.wav"), &sine(261.63, sr, n, 0.8), sr).unwrap();

        let song_path = dir.join("song.wav");
        write_song(&song_path, sr);

        let table_path = dir.join("note_frequencies.json");
        let output_dir = dir.join("output");

        let processor = SongResynth::new(Config::default());
        let summary = processor
            .process(&song_path, &notes_dir, &table_path, &output_dir)
            .unwrap();

        assert!(summary.onset_count >= 3, "expected at least the 3 played notes");
        assert_eq!(summary.top_notes[0].note, "a4.wav");
        assert_eq!(summary.output_sample_rate, 44100);
        assert!(table_path.exists(), "note table should be cached");
        assert!(output_dir.join("summary.json").exists());

        let (recreated, out_sr) = load_audio_file(output_dir.join("recreated.wav")).unwrap();
        assert_eq!(out_sr, 44100);
        assert!(!recreated.is_empty());
        // Driver output is peak-normalized
        let peak = recreated.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!((peak - 1.0).abs() < 1e-3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
