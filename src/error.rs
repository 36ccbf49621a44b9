//! Error types for the song resynthesis system

use std::fmt;

/// Custom error type for resynthesis processing
#[derive(Debug, Clone)]
pub enum ResynthError {
    /// E001: Invalid audio format (e.g., non-PCM WAV)
    InvalidAudioFormat(String),
    /// E002: Unsupported sample rate
    UnsupportedSampleRate(u32),
    /// E003: Configuration validation failed
    ConfigValidationFailed(String),
    /// E004: Note table empty or malformed
    InvalidNoteTable(String),
    /// E005: Audio file I/O error
    AudioFileError(String),
    /// E006: STFT processing error
    StftProcessingError(String),
    /// E007: Matched note has no waveform in the sample store
    MissingNoteWaveform(String),
    /// E008: No onset events, so the output length is undefined
    EmptyOnsetSequence,
    /// E009: Sample-rate conversion error
    ResampleError(String),
    /// E010: Summary export error
    SummaryExportError(String),
    /// E011: Input validation error
    InputValidationError(String),
}

impl fmt::Display for ResynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResynthError::InvalidAudioFormat(msg) => {
                write!(f, "E001: Invalid audio format - {}", msg)
            }
            ResynthError::UnsupportedSampleRate(sr) => {
                write!(f, "E002: Unsupported sample rate {} Hz", sr)
            }
            ResynthError::ConfigValidationFailed(msg) => {
                write!(f, "E003: Configuration validation failed - {}", msg)
            }
            ResynthError::InvalidNoteTable(msg) => {
                write!(f, "E004: Invalid note table - {}", msg)
            }
            ResynthError::AudioFileError(msg) => {
                write!(f, "E005: Audio file I/O error - {}", msg)
            }
            ResynthError::StftProcessingError(msg) => {
                write!(f, "E006: STFT processing error - {}", msg)
            }
            ResynthError::MissingNoteWaveform(note) => {
                write!(f, "E007: No waveform loaded for matched note '{}'", note)
            }
            ResynthError::EmptyOnsetSequence => {
                write!(f, "E008: No onset events to synthesize")
            }
            ResynthError::ResampleError(msg) => {
                write!(f, "E009: Sample-rate conversion error - {}", msg)
            }
            ResynthError::SummaryExportError(msg) => {
                write!(f, "E010: Summary export error - {}", msg)
            }
            ResynthError::InputValidationError(msg) => {
                write!(f, "E011: Input validation error - {}", msg)
            }
        }
    }
}

impl std::error::Error for ResynthError {}

// From implementations for common error types
impl From<std::io::Error> for ResynthError {
    fn from(err: std::io::Error) -> Self {
        ResynthError::AudioFileError(format!("File I/O error: {}", err))
    }
}

impl From<serde_json::Error> for ResynthError {
    fn from(err: serde_json::Error) -> Self {
        ResynthError::SummaryExportError(format!("JSON serialization error: {}", err))
    }
}

/// Result type alias for resynthesis operations
pub type Result<T> = std::result::Result<T, ResynthError>;
