use crate::config::ConfigError;
use crate::extract::ExtractError;
use crate::phonemizer::PhonemizerError;
use crate::session::SessionError;
use crate::tensor::TensorError;
use thiserror::Error;

/// Why one sentence was dropped from a request.
///
/// Recovered locally: the scheduler logs the reason and continues with the
/// next sentence. A skip never affects sample runs already produced.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("sentence has no phoneme ids")]
    EmptySentence,
    #[error("input tensor construction failed: {0}")]
    TensorBuild(String),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("output extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

impl From<TensorError> for SkipReason {
    fn from(err: TensorError) -> Self {
        match err {
            TensorError::EmptyPhonemeSequence => Self::EmptySentence,
            other => Self::TensorBuild(other.to_string()),
        }
    }
}

/// Failures fatal to a whole synthesis request.
///
/// `NoAudioProduced` is the distinguished "no audio" outcome: the caller
/// either receives a playable waveform or one of these, never a zero-length
/// waveform that looks like success.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("phoneme result contains no sentences")]
    EmptyPhonemeResult,
    #[error("model declares {declared} input tensors, at least 3 are required")]
    InsufficientModelInputs { declared: usize },
    #[error("no audio produced: all {attempted} sentences were skipped")]
    NoAudioProduced { attempted: usize },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("phonemization failed: {0}")]
    Phonemizer(#[from] PhonemizerError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;
