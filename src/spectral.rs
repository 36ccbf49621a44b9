//! Spectral processing utilities (STFT, magnitude spectrogram)

use crate::error::{ResynthError, Result as ResynthResult};
use ndarray::Array2;
use rustfft::{num_complex::Complex32, FftPlanner};

/// STFT data structure
#[derive(Debug, Clone)]
pub struct StftData {
    /// Complex spectrogram, indexed (frequency bin, time frame)
    pub s: Array2<Complex32>,
    /// Center frequency of each bin in Hz
    pub freqs: Vec<f32>,
    /// Start time of each frame in seconds
    pub times: Vec<f32>,
    /// Hop between frames in samples
    pub hop_length: usize,
    /// Sample rate of the analyzed signal
    pub sample_rate: u32,
}

impl StftData {
    /// Number of analysis frames
    pub fn n_frames(&self) -> usize {
        self.s.shape()[1]
    }

    /// Map a timestamp to the index of the nearest analysis frame
    pub fn time_to_frame(&self, time_sec: f32) -> usize {
        let frame = (time_sec * self.sample_rate as f32 / self.hop_length as f32).round() as usize;
        frame.min(self.n_frames().saturating_sub(1))
    }
}

/// Compute the STFT of an audio signal
pub fn stft(
    y: &[f32],
    n_fft: usize,
    hop_length: usize,
    window: &str,
    sample_rate: u32,
) -> ResynthResult<StftData> {
    if y.len() < n_fft {
        return Err(ResynthError::StftProcessingError(format!(
            "Input too short for analysis: {} samples < n_fft {}",
            y.len(),
            n_fft
        )));
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_fft);

    let n_frames = (y.len() - n_fft) / hop_length + 1;
    let n_bins = n_fft / 2 + 1;
    let mut s = Array2::<Complex32>::zeros((n_bins, n_frames));

    let window_fn = generate_window(window, n_fft);

    for frame_idx in 0..n_frames {
        let start = frame_idx * hop_length;

        let mut frame: Vec<Complex32> = y[start..start + n_fft]
            .iter()
            .zip(&window_fn)
            .map(|(&sample, &win)| Complex32::new(sample * win, 0.0))
            .collect();

        fft.process(&mut frame);

        for (i, &val) in frame[..n_bins].iter().enumerate() {
            s[[i, frame_idx]] = val;
        }
    }

    let freqs: Vec<f32> = (0..n_bins)
        .map(|i| i as f32 * sample_rate as f32 / n_fft as f32)
        .collect();

    let times: Vec<f32> = (0..n_frames)
        .map(|i| i as f32 * hop_length as f32 / sample_rate as f32)
        .collect();

    Ok(StftData {
        s,
        freqs,
        times,
        hop_length,
        sample_rate,
    })
}

/// Generate window function
fn generate_window(window_type: &str, size: usize) -> Vec<f32> {
    match window_type {
        "hann" => (0..size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
            })
            .collect(),
        // Rectangular window as fallback
        _ => vec![1.0; size],
    }
}

/// Compute magnitude spectrogram
pub fn magnitude_spectrogram(stft_data: &StftData) -> Array2<f32> {
    stft_data.s.map(|c| c.norm())
}
