//! Validation tests for onset detection and dominant-frequency extraction

use resynth::config::Config;
use resynth::error::ResynthError;
use resynth::onset::extract_onsets;
use std::f32::consts::PI;

/// Generate decaying sine bursts with sharp attacks at the given times
fn generate_note_bursts(n_samples: usize, sr: u32, onsets: &[(f32, f32)]) -> Vec<f32> {
    let mut audio = vec![0.0; n_samples];

    for &(onset_time, freq) in onsets {
        let start_sample = (onset_time * sr as f32) as usize;
        if start_sample >= n_samples {
            continue;
        }

        // 300 ms tone with exponential decay
        for i in 0..((sr as f32 * 0.3) as usize).min(n_samples - start_sample) {
            let t = i as f32 / sr as f32;
            let envelope = (-t * 8.0).exp();
            audio[start_sample + i] += (2.0 * PI * freq * t).sin() * envelope * 0.5;
        }
    }

    audio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_onsets() {
        let sr = 22050;
        let known = vec![(0.5, 440.0), (1.0, 440.0), (1.5, 440.0), (2.0, 440.0)];
        let audio = generate_note_bursts(sr as usize * 3, sr, &known);

        let events = extract_onsets(&audio, sr, &Config::default()).unwrap();

        for &(time, _) in &known {
            let hit = events.iter().any(|e| (e.time_sec - time).abs() < 0.075);
            assert!(hit, "no detection near {:.2} s (events: {:?})", time, events);
        }
        assert!(
            events.len() <= known.len() * 2,
            "too many detections: {}",
            events.len()
        );
    }

    #[test]
    fn test_dominant_frequency_tracks_the_tone() {
        let sr = 22050;
        let audio = generate_note_bursts(sr as usize * 2, sr, &[(0.5, 440.0)]);
        let config = Config::default();

        let events = extract_onsets(&audio, sr, &config).unwrap();
        assert!(!events.is_empty());

        let bin_width = sr as f32 / config.stft.n_fft as f32;
        for event in &events {
            assert!(
                (event.frequency_hz - 440.0).abs() <= 2.0 * bin_width,
                "dominant frequency {:.1} Hz too far from 440 Hz",
                event.frequency_hz
            );
        }
    }

    #[test]
    fn test_detection_survives_background_noise() {
        let sr = 22050;
        let known = vec![(0.5, 330.0), (1.2, 330.0)];
        let mut audio = generate_note_bursts(sr as usize * 2, sr, &known);
        for sample in &mut audio {
            *sample += (rand::random::<f32>() - 0.5) * 0.01;
        }

        let events = extract_onsets(&audio, sr, &Config::default()).unwrap();

        for &(time, _) in &known {
            let hit = events.iter().any(|e| (e.time_sec - time).abs() < 0.075);
            assert!(hit, "no detection near {:.2} s", time);
        }
    }

    #[test]
    fn test_silence_yields_no_events() {
        let audio = vec![0.0f32; 22050 * 2];
        let events = extract_onsets(&audio, 22050, &Config::default()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_event_times_are_non_decreasing() {
        let sr = 22050;
        let known = vec![(0.4, 440.0), (0.9, 220.0), (1.4, 660.0)];
        let audio = generate_note_bursts(sr as usize * 2, sr, &known);

        let events = extract_onsets(&audio, sr, &Config::default()).unwrap();
        for pair in events.windows(2) {
            assert!(pair[0].time_sec <= pair[1].time_sec);
        }
    }

    #[test]
    fn test_input_shorter_than_window_is_a_transform_error() {
        let audio = vec![0.1f32; 100];
        let result = extract_onsets(&audio, 22050, &Config::default());
        assert!(matches!(result, Err(ResynthError::StftProcessingError(_))));
    }
}
