//! Audio I/O and level utilities

use crate::error::{ResynthError, Result as ResynthResult};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Load an audio file and return mono samples with the native sample rate
pub fn load_audio_file<P: AsRef<Path>>(path: P) -> ResynthResult<(Vec<f32>, u32)> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "wav" => load_wav_file(path),
        _ => Err(ResynthError::InvalidAudioFormat(format!(
            "Unsupported audio format: {}",
            extension
        ))),
    }
}

/// Load a WAV file (integer or float samples, mono or stereo)
fn load_wav_file<P: AsRef<Path>>(path: P) -> ResynthResult<(Vec<f32>, u32)> {
    let mut reader =
        WavReader::open(path).map_err(|e| ResynthError::AudioFileError(e.to_string()))?;
    let spec = reader.spec();

    if spec.channels == 0 || spec.channels > 2 {
        return Err(ResynthError::InvalidAudioFormat(format!(
            "Unsupported channel count: {}",
            spec.channels
        )));
    }

    if spec.bits_per_sample > 32 {
        return Err(ResynthError::InvalidAudioFormat(format!(
            "Unsupported bit depth: {}",
            spec.bits_per_sample
        )));
    }

    let sr = spec.sample_rate;
    let mut samples: Vec<f32> = Vec::with_capacity(reader.len() as usize);

    match spec.sample_format {
        SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            for sample in reader.samples::<i32>() {
                let sample = sample.map_err(|e| ResynthError::AudioFileError(e.to_string()))?;
                samples.push(sample as f32 / max_value);
            }
        }
        SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                samples.push(sample.map_err(|e| ResynthError::AudioFileError(e.to_string()))?);
            }
        }
    }

    // Average stereo channels down to mono
    let samples = if spec.channels == 2 {
        samples
            .chunks_exact(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect()
    } else {
        samples
    };

    Ok((samples, sr))
}

/// Validate that a file exists and contains usable audio
pub fn validate_audio_file<P: AsRef<Path>>(path: P) -> ResynthResult<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ResynthError::InputValidationError(format!(
            "Audio file does not exist: {}",
            path.display()
        )));
    }

    let (samples, sr) = load_audio_file(path)?;

    if samples.is_empty() {
        return Err(ResynthError::InputValidationError(
            "Audio file contains no samples".to_string(),
        ));
    }

    if !(8000..=192000).contains(&sr) {
        return Err(ResynthError::UnsupportedSampleRate(sr));
    }

    let rms = (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt();
    if rms < 1e-6 {
        return Err(ResynthError::InputValidationError(
            "Audio file appears to be silent (RMS < 1e-6)".to_string(),
        ));
    }

    Ok(())
}

/// Scale samples so the peak magnitude is 1.0
///
/// A silent buffer is returned unchanged. Applied by the driver before the
/// output is written; synthesis itself never rescales.
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    if peak == 0.0 {
        return samples.to_vec();
    }
    samples.iter().map(|&x| x / peak).collect()
}

/// Write samples as a 32-bit float mono WAV file
pub fn write_wav_file<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> ResynthResult<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| ResynthError::AudioFileError(e.to_string()))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| ResynthError::AudioFileError(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| ResynthError::AudioFileError(e.to_string()))?;

    Ok(())
}
