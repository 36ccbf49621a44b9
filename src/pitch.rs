//! Fundamental-frequency estimation for reference note samples
//!
//! YIN-style estimator: cumulative mean normalized difference per frame,
//! absolute-threshold dip search with parabolic refinement, and a median over
//! voiced frames. Runs offline while building the note table, so the
//! difference function is computed directly in the time domain.

/// First dip below this normalized-difference value counts as voiced
const YIN_THRESHOLD: f32 = 0.15;

/// Frames quieter than this mean-square power are skipped as unvoiced
const POWER_GATE: f32 = 1e-6;

/// Estimate the fundamental frequency of a recorded note
///
/// Returns the median of per-frame estimates, or `None` when no frame yields
/// a voiced pitch in the search range.
pub fn estimate_fundamental(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    frame_hop: usize,
    min_frequency_hz: f32,
    max_frequency_hz: f32,
) -> Option<f32> {
    if samples.len() < frame_size || frame_size < 4 {
        return None;
    }

    let window = frame_size / 2;
    let min_lag = ((sample_rate as f32 / max_frequency_hz) as usize).max(2);
    let max_lag = ((sample_rate as f32 / min_frequency_hz) as usize).min(window - 1);
    if min_lag >= max_lag {
        return None;
    }

    let mut estimates: Vec<f32> = Vec::new();
    let mut start = 0;
    while start + frame_size <= samples.len() {
        let frame = &samples[start..start + frame_size];
        if let Some(f0) = frame_fundamental(frame, sample_rate, window, min_lag, max_lag) {
            estimates.push(f0);
        }
        start += frame_hop;
    }

    median(&mut estimates)
}

/// Single-frame YIN estimate
fn frame_fundamental(
    frame: &[f32],
    sample_rate: u32,
    window: usize,
    min_lag: usize,
    max_lag: usize,
) -> Option<f32> {
    let power = frame[..window].iter().map(|&x| x * x).sum::<f32>() / window as f32;
    if power < POWER_GATE {
        return None;
    }

    // Squared difference function d(tau)
    let mut diff = vec![0.0f32; max_lag + 1];
    for tau in 1..=max_lag {
        let mut sum = 0.0;
        for i in 0..window {
            let delta = frame[i] - frame[i + tau];
            sum += delta * delta;
        }
        diff[tau] = sum;
    }

    // Cumulative mean normalized difference d'(tau)
    let mut cmnd = vec![1.0f32; max_lag + 1];
    let mut running_sum = 0.0;
    for tau in 1..=max_lag {
        running_sum += diff[tau];
        cmnd[tau] = if running_sum > 0.0 {
            diff[tau] * tau as f32 / running_sum
        } else {
            1.0
        };
    }

    // First dip below the absolute threshold, walked down to its local minimum
    let mut tau = min_lag;
    while tau <= max_lag {
        if cmnd[tau] < YIN_THRESHOLD {
            while tau + 1 <= max_lag && cmnd[tau + 1] < cmnd[tau] {
                tau += 1;
            }
            let refined = parabolic_interpolation(&cmnd, tau, max_lag);
            return Some(sample_rate as f32 / refined);
        }
        tau += 1;
    }

    None
}

/// Refine a lag estimate using the parabola through its neighbors
fn parabolic_interpolation(cmnd: &[f32], tau: usize, max_lag: usize) -> f32 {
    if tau == 0 || tau >= max_lag {
        return tau as f32;
    }

    let left = cmnd[tau - 1];
    let center = cmnd[tau];
    let right = cmnd[tau + 1];
    let denom = left - 2.0 * center + right;
    if denom.abs() < 1e-12 {
        return tau as f32;
    }

    let offset = 0.5 * (left - right) / denom;
    tau as f32 + offset.clamp(-1.0, 1.0)
}

fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
