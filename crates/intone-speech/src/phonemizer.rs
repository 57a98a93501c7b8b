use crate::types::PhonemeResult;

#[derive(Debug, thiserror::Error)]
pub enum PhonemizerError {
    #[error("unknown voice: {0}")]
    UnknownVoice(String),
    #[error("phonemizer backend error: {0}")]
    Backend(String),
}

pub type PhonemizerResult<T> = Result<T, PhonemizerError>;

/// Converts raw text into per-sentence phoneme id sequences.
///
/// Implementations own their native resources: initialization (e.g. loading
/// a data directory) belongs to the constructor, release to `Drop`. An empty
/// [`PhonemeResult`] is a valid nothing-to-synthesize outcome, not an error.
/// Sentences must be returned in the order they should be synthesized.
pub trait Phonemizer: Send {
    fn process(&mut self, text: &str, voice: &str) -> PhonemizerResult<PhonemeResult>;
}
