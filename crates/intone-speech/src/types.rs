use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One phonemized unit of input text, synthesized independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Position of the sentence within its request.
    pub index: usize,
    /// Phoneme ids as the acoustic model consumes them.
    pub phoneme_ids: Vec<i64>,
}

impl Sentence {
    pub fn new(index: usize, phoneme_ids: Vec<i64>) -> Self {
        Self { index, phoneme_ids }
    }

    pub fn len(&self) -> usize {
        self.phoneme_ids.len()
    }

    /// A sentence with no phoneme ids is rejected at scheduling time, never repaired.
    pub fn is_empty(&self) -> bool {
        self.phoneme_ids.is_empty()
    }
}

/// Ordered sentence list produced by the phonemizer for one synthesis request.
///
/// Immutable after creation; sentences are synthesized strictly in the order
/// they appear here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeResult {
    sentences: Vec<Sentence>,
}

impl PhonemeResult {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// Build a result from raw id sequences, assigning indices in order.
    pub fn from_ids(ids: impl IntoIterator<Item = Vec<i64>>) -> Self {
        let sentences = ids
            .into_iter()
            .enumerate()
            .map(|(index, phoneme_ids)| Sentence::new(index, phoneme_ids))
            .collect();
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Scalar synthesis controls, constant across all sentences of one request.
///
/// The serialization order `[speed, pitch, glottal]` is fixed; the model's
/// third input slot receives the three values in exactly this order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynthesisControls {
    pub speed: f32,
    pub pitch: f32,
    pub glottal: f32,
}

impl SynthesisControls {
    pub fn new(speed: f32, pitch: f32, glottal: f32) -> Self {
        Self {
            speed,
            pitch,
            glottal,
        }
    }

    /// The fixed-order scale triple bound to the model's scales input.
    pub fn as_scales(&self) -> [f32; 3] {
        [self.speed, self.pitch, self.glottal]
    }
}

impl Default for SynthesisControls {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 1.0,
            glottal: 0.8,
        }
    }
}

/// Raw floating-point samples produced by synthesizing one sentence.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRun {
    pub sentence_index: usize,
    pub samples: Vec<f32>,
}

impl SampleRun {
    pub fn new(sentence_index: usize, samples: Vec<f32>) -> Self {
        Self {
            sentence_index,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The final concatenated audio signal for an entire synthesis request.
///
/// Only ever constructed non-empty; a request that produced nothing yields a
/// distinguished error, not a zero-length waveform.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    /// Audio samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Number of audio channels (1 for this pipeline)
    pub channels: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / self.sample_rate as u64
    }
}

impl Serialize for Waveform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Waveform", 3)?;

        // Serialize samples as base64
        let bytes: Vec<u8> = self.samples.iter().flat_map(|f| f.to_le_bytes()).collect();
        let base64_samples =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &bytes);

        state.serialize_field("samples", &base64_samples)?;
        state.serialize_field("channels", &self.channels)?;
        state.serialize_field("sample_rate", &self.sample_rate)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Waveform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct WaveformHelper {
            samples: String,
            channels: usize,
            sample_rate: u32,
        }

        let helper = WaveformHelper::deserialize(deserializer)?;

        let bytes =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &helper.samples)
                .map_err(serde::de::Error::custom)?;

        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = [chunk[0], chunk[1], chunk[2], chunk[3]];
                f32::from_le_bytes(arr)
            })
            .collect();

        Ok(Waveform {
            samples,
            channels: helper.channels,
            sample_rate: helper.sample_rate,
        })
    }
}
