//! Sample-rate conversion for note waveforms

use crate::error::{ResynthError, Result as ResynthResult};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Resample a mono buffer from one rate to another
///
/// Identity when the rates already match. The whole buffer is processed as a
/// single chunk; note samples are short enough that streaming is unnecessary.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> ResynthResult<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(ResynthError::ResampleError(format!(
            "Invalid sample rates: {} -> {}",
            from_rate, to_rate
        )));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)
        .map_err(|e| ResynthError::ResampleError(e.to_string()))?;

    let output = resampler
        .process(&[samples.to_vec()], None)
        .map_err(|e| ResynthError::ResampleError(e.to_string()))?;

    Ok(output.into_iter().next().unwrap_or_default())
}
