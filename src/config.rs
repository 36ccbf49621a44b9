//! Configuration system for the song resynthesis pipeline

use crate::error::{ResynthError, Result as ResynthResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub stft: StftConfig,
    pub onset: OnsetConfig,
    pub matching: MatchingConfig,
    pub table: TableConfig,
    pub synthesis: SynthesisConfig,
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            stft: StftConfig::default(),
            onset: OnsetConfig::default(),
            matching: MatchingConfig::default(),
            table: TableConfig::default(),
            synthesis: SynthesisConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// STFT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StftConfig {
    pub n_fft: usize,
    pub hop_length: usize,
    pub window: String,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            window: "hann".to_string(),
        }
    }
}

/// Onset detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    /// Rolling window for the adaptive threshold, in seconds
    pub adaptive_window_sec: f32,
    /// Threshold is mean + k * std over the rolling window
    pub k_threshold: f32,
    /// Minimum spacing between detected onsets, in milliseconds
    pub refractory_ms: f32,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            adaptive_window_sec: 1.0,
            k_threshold: 1.5,
            refractory_ms: 30.0,
        }
    }
}

/// Note matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Octave the matcher generally favors (4 = the middle-C octave)
    pub target_octave: i32,
    /// Penalty per octave of distance from the target octave
    pub base_octave_penalty: f32,
    /// Penalty per octave of distance from the previously matched note
    pub context_weight: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            target_octave: 4,
            base_octave_penalty: 1.0,
            context_weight: 0.5,
        }
    }
}

/// Note table building configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Analysis frame size for fundamental estimation
    pub frame_size: usize,
    /// Hop between analysis frames
    pub frame_hop: usize,
    /// Lowest searchable fundamental (A0)
    pub min_frequency_hz: f32,
    /// Highest searchable fundamental (C8)
    pub max_frequency_hz: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            frame_size: 4096,
            frame_hop: 1024,
            min_frequency_hz: 27.5,
            max_frequency_hz: 4186.0,
        }
    }
}

/// Synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Sample rate of the synthesized output
    pub output_sample_rate: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            output_sample_rate: 44100,
        }
    }
}

/// Result export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// How many of the most frequent notes the summary lists
    pub top_notes: usize,
    /// Whether to write summary.json next to the output audio
    pub write_summary: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            top_notes: 5,
            write_summary: true,
        }
    }
}

/// Load configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> ResynthResult<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ResynthError::ConfigValidationFailed(format!(
            "Cannot read config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let config: Config = serde_json::from_str(&contents)
        .map_err(|e| ResynthError::ConfigValidationFailed(format!("Invalid config JSON: {}", e)))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration parameters
pub fn validate_config(config: &Config) -> ResynthResult<()> {
    if config.stft.n_fft == 0 || !config.stft.n_fft.is_power_of_two() {
        return Err(ResynthError::ConfigValidationFailed(format!(
            "stft.n_fft must be a power of two, got {}",
            config.stft.n_fft
        )));
    }
    if config.stft.hop_length == 0 || config.stft.hop_length > config.stft.n_fft {
        return Err(ResynthError::ConfigValidationFailed(format!(
            "stft.hop_length must be in 1..=n_fft, got {}",
            config.stft.hop_length
        )));
    }
    if config.onset.adaptive_window_sec <= 0.0 {
        return Err(ResynthError::ConfigValidationFailed(
            "onset.adaptive_window_sec must be positive".to_string(),
        ));
    }
    if config.onset.refractory_ms < 0.0 {
        return Err(ResynthError::ConfigValidationFailed(
            "onset.refractory_ms must be non-negative".to_string(),
        ));
    }
    if config.matching.base_octave_penalty < 0.0 || config.matching.context_weight < 0.0 {
        return Err(ResynthError::ConfigValidationFailed(
            "matching penalties must be non-negative".to_string(),
        ));
    }
    if config.table.frame_size == 0 || config.table.frame_hop == 0 {
        return Err(ResynthError::ConfigValidationFailed(
            "table.frame_size and table.frame_hop must be positive".to_string(),
        ));
    }
    if config.table.min_frequency_hz <= 0.0
        || config.table.max_frequency_hz <= config.table.min_frequency_hz
    {
        return Err(ResynthError::ConfigValidationFailed(
            "table frequency search range must satisfy 0 < min < max".to_string(),
        ));
    }
    if !(8000..=192000).contains(&config.synthesis.output_sample_rate) {
        return Err(ResynthError::UnsupportedSampleRate(
            config.synthesis.output_sample_rate,
        ));
    }
    if config.export.top_notes == 0 {
        return Err(ResynthError::ConfigValidationFailed(
            "export.top_notes must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.matching.target_octave, 4);
        assert!((config.matching.base_octave_penalty - 1.0).abs() < 1e-6);
        assert!((config.matching.context_weight - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_n_fft_rejected() {
        let mut config = Config::default();
        config.stft.n_fft = 1000;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_sample_rate_rejected() {
        let mut config = Config::default();
        config.synthesis.output_sample_rate = 1000;
        assert!(matches!(
            validate_config(&config),
            Err(ResynthError::UnsupportedSampleRate(1000))
        ));
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.stft.n_fft, config.stft.n_fft);
        assert_eq!(parsed.export.top_notes, config.export.top_notes);
    }
}
