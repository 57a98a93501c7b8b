//! # Intone Speech
//!
//! Sentence-by-sentence neural speech synthesis for cooperative hosts.
//!
//! This crate turns phonemized text into a single waveform by driving a
//! sequence-to-sequence acoustic model one sentence at a time, without ever
//! blocking the host's execution loop: inference advances in discrete steps
//! and yields control back to the scheduler between them.
//!
//! ## Architecture
//!
//! The pipeline is a chain of small components, each replaceable at a trait
//! seam:
//!
//! - [`TensorBuilder`]: adapts a phoneme id sequence and the scalar controls
//!   into the input buffers the model's first three declared slots expect
//! - [`InferenceSession`]: owns the loaded model; bind inputs, begin a run,
//!   advance it, retrieve the output ([`OrtSession`] is the ONNX Runtime
//!   implementation behind the `onnx` feature)
//! - [`CooperativeRun`]: one inference run as a resumable unit of work,
//!   released on every exit path
//! - [`OutputExtractor`]: validates the output tensor and materializes the
//!   per-sentence samples
//! - [`SynthesisPipeline`]: the driver applying the skip-on-error policy
//! - [`WaveformAssembler`]: concatenates per-sentence runs in order
//!
//! A failed sentence is logged and skipped; it never aborts the request or
//! disturbs audio already produced. A request that yields nothing reports
//! the distinguished [`SynthesisError::NoAudioProduced`] outcome instead of
//! an empty waveform.
//!
//! ## Example
//!
//! ```rust
//! use intone_speech::{InferenceSession, PhonemeResult, SynthesisPipeline};
//!
//! async fn synthesize(session: impl InferenceSession, phonemes: &PhonemeResult) {
//!     let mut pipeline = SynthesisPipeline::new(session, Default::default(), 22_050);
//!     match pipeline.synthesize(phonemes).await {
//!         Ok(waveform) => println!("synthesized {} samples", waveform.len()),
//!         Err(err) => eprintln!("no audio: {err}"),
//!     }
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod device;
pub mod error;
pub mod executor;
pub mod extract;
pub mod phonemizer;
pub mod scheduler;
pub mod session;
pub mod synthesizer;
pub mod tensor;
pub mod types;

// Backend implementations
pub mod backends;

#[cfg(feature = "playback")]
pub mod playback;

pub use assembler::WaveformAssembler;
pub use config::{ConfigError, DEFAULT_SAMPLE_RATE, SynthesisConfig};
pub use device::Device;
pub use error::{SkipReason, SynthesisError, SynthesisResult};
pub use executor::CooperativeRun;
pub use extract::{ExtractError, OutputExtractor};
pub use phonemizer::{Phonemizer, PhonemizerError, PhonemizerResult};
pub use scheduler::SynthesisPipeline;
pub use session::{InferenceSession, SessionError, SessionResult, StepProgress};
pub use synthesizer::{SpeechProvider, SpeechSynthesizer};
pub use tensor::{
    ElemKind, InputSlot, InputTensorSet, MIN_MODEL_INPUTS, TensorBuilder, TensorData, TensorError,
};
pub use types::{PhonemeResult, SampleRun, Sentence, SynthesisControls, Waveform};

#[cfg(feature = "onnx")]
pub use backends::OrtSession;
