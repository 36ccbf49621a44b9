//! Onset detection and dominant-frequency extraction

use crate::config::Config;
use crate::error::Result as ResynthResult;
use crate::spectral::{magnitude_spectrogram, stft, StftData};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A detected note onset with the dominant frequency at that moment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnsetEvent {
    /// Time in seconds
    pub time_sec: f32,
    /// Frequency bin with maximum magnitude at the onset frame, in Hz
    pub frequency_hz: f32,
}

/// Compute the onset-strength envelope as positive spectral flux
fn onset_strength(mag: &Array2<f32>) -> Vec<f32> {
    let mut envelope = vec![0.0; mag.shape()[1]];

    for t in 1..mag.shape()[1] {
        let mut frame_flux = 0.0;
        for f in 0..mag.shape()[0] {
            let diff = mag[[f, t]] - mag[[f, t - 1]];
            if diff > 0.0 {
                frame_flux += diff;
            }
        }
        envelope[t] = frame_flux;
    }

    envelope
}

/// Compute adaptive threshold using rolling mean and std
fn adaptive_threshold(signal: &[f32], window_sec: f32, sr: u32, hop: usize, k: f32) -> Vec<f32> {
    let window_frames = (window_sec * sr as f32 / hop as f32) as usize;
    let mut thresholds = vec![0.0; signal.len()];

    for i in 0..signal.len() {
        let start = i.saturating_sub(window_frames);
        let end = signal.len().min(i + window_frames + 1);

        let window = &signal[start..end];
        let mean = window.iter().sum::<f32>() / window.len() as f32;
        let variance =
            window.iter().map(|&x| (x - mean).powi(2)).sum::<f32>() / window.len() as f32;

        thresholds[i] = mean + k * variance.sqrt();
    }

    thresholds
}

/// Find local maxima above threshold, enforcing a refractory period
fn find_peaks_with_refractory(
    signal: &[f32],
    thresholds: &[f32],
    min_distance_frames: usize,
) -> Vec<usize> {
    let mut peaks = Vec::new();
    let mut last_peak = 0;

    for i in 1..signal.len().saturating_sub(1) {
        if !peaks.is_empty() && i < last_peak + min_distance_frames {
            continue;
        }

        if signal[i] > signal[i - 1] && signal[i] > signal[i + 1] && signal[i] > thresholds[i] {
            peaks.push(i);
            last_peak = i;
        }
    }

    peaks
}

/// Frequency bin with maximum magnitude in one analysis frame
fn dominant_frequency(mag: &Array2<f32>, freqs: &[f32], frame_idx: usize) -> f32 {
    let mut best_bin = 0;
    let mut best_mag = f32::NEG_INFINITY;

    for f in 0..mag.shape()[0] {
        let m = mag[[f, frame_idx]];
        if m > best_mag {
            best_mag = m;
            best_bin = f;
        }
    }

    freqs[best_bin]
}

/// Extract onset events with their dominant frequencies from raw audio
///
/// Returns an empty sequence when no onsets are detected; downstream stages
/// decide how to treat that.
pub fn extract_onsets(
    samples: &[f32],
    sample_rate: u32,
    config: &Config,
) -> ResynthResult<Vec<OnsetEvent>> {
    let stft_data: StftData = stft(
        samples,
        config.stft.n_fft,
        config.stft.hop_length,
        &config.stft.window,
        sample_rate,
    )?;
    let mag = magnitude_spectrogram(&stft_data);

    let envelope = onset_strength(&mag);
    let thresholds = adaptive_threshold(
        &envelope,
        config.onset.adaptive_window_sec,
        sample_rate,
        config.stft.hop_length,
        config.onset.k_threshold,
    );

    let refractory_frames = (config.onset.refractory_ms / 1000.0 * sample_rate as f32
        / config.stft.hop_length as f32) as usize;
    let peak_frames = find_peaks_with_refractory(&envelope, &thresholds, refractory_frames);
    let onset_times: Vec<f32> = peak_frames.iter().map(|&f| stft_data.times[f]).collect();

    let events = onset_times
        .iter()
        .map(|&time_sec| {
            let frame_idx = stft_data.time_to_frame(time_sec);
            OnsetEvent {
                time_sec,
                frequency_hz: dominant_frequency(&mag, &stft_data.freqs, frame_idx),
            }
        })
        .collect();

    Ok(events)
}
