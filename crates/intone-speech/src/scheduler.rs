use crate::assembler::WaveformAssembler;
use crate::config::SynthesisConfig;
use crate::error::{SkipReason, SynthesisError, SynthesisResult};
use crate::executor::CooperativeRun;
use crate::extract::OutputExtractor;
use crate::session::InferenceSession;
use crate::tensor::{MIN_MODEL_INPUTS, TensorBuilder};
use crate::types::{PhonemeResult, SampleRun, Sentence, SynthesisControls, Waveform};

/// The top-level driver: iterates a request's sentences strictly in index
/// order and pipes each through tensor building, cooperative inference and
/// output extraction.
///
/// Any single-sentence failure is logged and skipped; only structural
/// failures (no sentences, a malformed model input spec) abort the whole
/// request. The session and its loaded model are owned here for the
/// component's lifetime and released exactly once on drop.
pub struct SynthesisPipeline<S: InferenceSession> {
    session: S,
    controls: SynthesisControls,
    sample_rate: u32,
}

impl<S: InferenceSession> SynthesisPipeline<S> {
    pub fn new(session: S, controls: SynthesisControls, sample_rate: u32) -> Self {
        Self {
            session,
            controls,
            sample_rate,
        }
    }

    pub fn from_config(session: S, config: &SynthesisConfig) -> Self {
        Self::new(session, config.controls(), config.sample_rate)
    }

    pub fn controls(&self) -> &SynthesisControls {
        &self.controls
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Synthesize one request into a single waveform.
    ///
    /// Returns [`SynthesisError::NoAudioProduced`] when every sentence was
    /// skipped; a returned waveform is always non-empty.
    pub async fn synthesize(&mut self, phonemes: &PhonemeResult) -> SynthesisResult<Waveform> {
        if phonemes.is_empty() {
            return Err(SynthesisError::EmptyPhonemeResult);
        }
        let declared = self.session.input_spec().len();
        if declared < MIN_MODEL_INPUTS {
            return Err(SynthesisError::InsufficientModelInputs { declared });
        }

        let mut assembler = WaveformAssembler::new(self.sample_rate);
        for sentence in phonemes.sentences() {
            match self.synthesize_sentence(sentence).await {
                Ok(run) => {
                    log::debug!("sentence {} produced {} samples", sentence.index, run.len());
                    assembler.push(run);
                }
                Err(reason) => {
                    log::warn!("skipping sentence {}: {reason}", sentence.index);
                }
            }
        }

        assembler.finish().ok_or(SynthesisError::NoAudioProduced {
            attempted: phonemes.len(),
        })
    }

    async fn synthesize_sentence(&mut self, sentence: &Sentence) -> Result<SampleRun, SkipReason> {
        let result = self.drive_sentence(sentence).await;
        // Input buffers are scoped to this sentence's pass; release them on
        // every exit path.
        self.session.reset();
        result
    }

    async fn drive_sentence(&mut self, sentence: &Sentence) -> Result<SampleRun, SkipReason> {
        if sentence.is_empty() {
            return Err(SkipReason::EmptySentence);
        }

        let tensors =
            TensorBuilder::new(self.session.input_spec()).build(&sentence.phoneme_ids, &self.controls)?;
        for (name, tensor) in tensors.into_bindings() {
            self.session.bind(&name, tensor)?;
        }

        let run = CooperativeRun::begin(&mut self.session)?;
        let output = run.complete().await?;
        let samples = OutputExtractor::extract(output)?;
        Ok(SampleRun::new(sentence.index, samples))
    }
}
