use crate::config::SynthesisConfig;
use crate::error::SynthesisResult;
use crate::phonemizer::Phonemizer;
use crate::scheduler::SynthesisPipeline;
use crate::session::InferenceSession;
use crate::types::Waveform;
use async_trait::async_trait;

/// Trait for components that turn raw text into a waveform.
#[async_trait]
pub trait SpeechProvider: Send {
    /// Synthesize one utterance of text into a single waveform.
    async fn speak(&mut self, text: &str) -> SynthesisResult<Waveform>;

    /// Output sample rate in Hz.
    fn sample_rate(&self) -> u32;
}

/// Text-to-waveform composition: phonemizer in front of the synthesis
/// pipeline.
///
/// Owns both collaborators for the component's lifetime; the phonemizer's
/// native resources and the inference session are each released exactly once
/// when the synthesizer is dropped.
pub struct SpeechSynthesizer<P: Phonemizer, S: InferenceSession> {
    phonemizer: P,
    pipeline: SynthesisPipeline<S>,
    voice: String,
}

impl<P: Phonemizer, S: InferenceSession> SpeechSynthesizer<P, S> {
    pub fn new(phonemizer: P, session: S, config: &SynthesisConfig) -> SynthesisResult<Self> {
        config.validate()?;
        Ok(Self {
            phonemizer,
            pipeline: SynthesisPipeline::from_config(session, config),
            voice: config.voice.clone(),
        })
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn pipeline(&self) -> &SynthesisPipeline<S> {
        &self.pipeline
    }
}

#[async_trait]
impl<P: Phonemizer, S: InferenceSession> SpeechProvider for SpeechSynthesizer<P, S> {
    async fn speak(&mut self, text: &str) -> SynthesisResult<Waveform> {
        let phonemes = self.phonemizer.process(text, &self.voice)?;
        self.pipeline.synthesize(&phonemes).await
    }

    fn sample_rate(&self) -> u32 {
        self.pipeline.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;
    use crate::phonemizer::PhonemizerResult;
    use crate::session::{SessionError, SessionResult, StepProgress};
    use crate::tensor::{ElemKind, InputSlot, TensorData};
    use crate::types::PhonemeResult;
    use ndarray::Array1;
    use std::collections::HashMap;

    /// Splits text on `.` and maps each character to its code point.
    struct MockPhonemizer;

    impl Phonemizer for MockPhonemizer {
        fn process(&mut self, text: &str, _voice: &str) -> PhonemizerResult<PhonemeResult> {
            let ids = text
                .split('.')
                .map(|chunk| chunk.trim())
                .filter(|chunk| !chunk.is_empty())
                .map(|chunk| chunk.chars().map(|c| c as i64).collect());
            Ok(PhonemeResult::from_ids(ids))
        }
    }

    /// Produces one 0.5 sample per bound phoneme id.
    struct ConstantSession {
        spec: Vec<InputSlot>,
        bound: HashMap<String, TensorData>,
        running: bool,
        output: Option<TensorData>,
    }

    impl ConstantSession {
        fn new() -> Self {
            Self {
                spec: vec![
                    InputSlot::new("input", ElemKind::Int64),
                    InputSlot::new("input_lengths", ElemKind::Int64),
                    InputSlot::new("scales", ElemKind::Float32),
                ],
                bound: HashMap::new(),
                running: false,
                output: None,
            }
        }
    }

    impl InferenceSession for ConstantSession {
        fn input_spec(&self) -> &[InputSlot] {
            &self.spec
        }

        fn bind(&mut self, name: &str, tensor: TensorData) -> SessionResult<()> {
            self.bound.insert(name.to_string(), tensor);
            Ok(())
        }

        fn begin_run(&mut self) -> SessionResult<()> {
            for slot in &self.spec {
                if !self.bound.contains_key(&slot.name) {
                    return Err(SessionError::MissingInput(slot.name.clone()));
                }
            }
            self.running = true;
            Ok(())
        }

        fn advance_run(&mut self) -> SessionResult<StepProgress> {
            if !self.running {
                return Err(SessionError::NoRunActive);
            }
            self.running = false;
            let count = match self.bound.get("input") {
                Some(tensor) => tensor.len(),
                None => 0,
            };
            self.output = Some(TensorData::Float32(
                Array1::from_vec(vec![0.5; count]).into_dyn(),
            ));
            Ok(StepProgress::Done)
        }

        fn peek_output(&self) -> Option<&TensorData> {
            self.output.as_ref()
        }

        fn take_output(&mut self) -> Option<TensorData> {
            self.output.take()
        }

        fn reset(&mut self) {
            self.bound.clear();
            self.output = None;
            self.running = false;
        }
    }

    #[tokio::test]
    async fn speaks_text_into_waveform() {
        let config = SynthesisConfig::default();
        let mut synthesizer =
            SpeechSynthesizer::new(MockPhonemizer, ConstantSession::new(), &config).unwrap();

        let waveform = synthesizer.speak("ab. cde").await.unwrap();
        // two sentences: 2 + 3 phonemes
        assert_eq!(waveform.len(), 5);
        assert_eq!(waveform.sample_rate, config.sample_rate);
    }

    #[tokio::test]
    async fn empty_text_is_the_distinguished_no_audio_outcome() {
        let config = SynthesisConfig::default();
        let mut synthesizer =
            SpeechSynthesizer::new(MockPhonemizer, ConstantSession::new(), &config).unwrap();

        let err = synthesizer.speak("").await.unwrap_err();
        assert!(matches!(err, SynthesisError::EmptyPhonemeResult));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = SynthesisConfig::default().with_glottal(0.0);
        let result = SpeechSynthesizer::new(MockPhonemizer, ConstantSession::new(), &config);
        assert!(matches!(result, Err(SynthesisError::Config(_))));
    }
}
