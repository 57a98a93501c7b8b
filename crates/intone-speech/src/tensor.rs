use crate::types::SynthesisControls;
use ndarray::{Array1, Array2, ArrayD};
use std::fmt;

/// Minimum number of input slots the loaded model must declare.
pub const MIN_MODEL_INPUTS: usize = 3;

/// Element type of a model input or output tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemKind {
    Int64,
    Float32,
    Other,
}

impl fmt::Display for ElemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => write!(f, "int64"),
            Self::Float32 => write!(f, "float32"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One named input slot declared by the loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSlot {
    pub name: String,
    pub elem: ElemKind,
}

impl InputSlot {
    pub fn new(name: impl Into<String>, elem: ElemKind) -> Self {
        Self {
            name: name.into(),
            elem,
        }
    }
}

/// An owned numeric buffer bound to, or produced by, an inference session.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Int64(ArrayD<i64>),
    Float32(ArrayD<f32>),
}

impl TensorData {
    pub fn elem(&self) -> ElemKind {
        match self {
            Self::Int64(_) => ElemKind::Int64,
            Self::Float32(_) => ElemKind::Float32,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int64(array) => array.shape(),
            Self::Float32(array) => array.shape(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int64(array) => array.len(),
            Self::Float32(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    #[error("model declares {declared} input tensors, at least {MIN_MODEL_INPUTS} are required")]
    InsufficientInputs { declared: usize },
    #[error("phoneme sequence is empty")]
    EmptyPhonemeSequence,
    #[error("invalid input tensor shape: {0}")]
    Shape(String),
}

/// The per-sentence input buffers, paired with the slot names they bind to.
///
/// Scoped to one sentence's inference pass; the session releases every buffer
/// when that pass exits.
#[derive(Debug)]
pub struct InputTensorSet {
    bindings: Vec<(String, TensorData)>,
}

impl InputTensorSet {
    pub fn bindings(&self) -> &[(String, TensorData)] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<(String, TensorData)> {
        self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Adapts one sentence's phoneme ids and the request controls into the input
/// buffers the model expects.
///
/// The binding is purely positional: the first three slots the model declares
/// receive ids, length, and scales in that order, trusting the model's own
/// declaration order. No numeric transformation of the ids happens here.
pub struct TensorBuilder<'a> {
    spec: &'a [InputSlot],
}

impl<'a> TensorBuilder<'a> {
    pub fn new(spec: &'a [InputSlot]) -> Self {
        Self { spec }
    }

    pub fn build(
        &self,
        phoneme_ids: &[i64],
        controls: &SynthesisControls,
    ) -> Result<InputTensorSet, TensorError> {
        if self.spec.len() < MIN_MODEL_INPUTS {
            return Err(TensorError::InsufficientInputs {
                declared: self.spec.len(),
            });
        }
        if phoneme_ids.is_empty() {
            return Err(TensorError::EmptyPhonemeSequence);
        }

        let count = phoneme_ids.len();
        let ids = Array2::<i64>::from_shape_vec((1, count), phoneme_ids.to_vec())
            .map_err(|err| TensorError::Shape(err.to_string()))?;
        let lengths = Array1::<i64>::from_elem(1, count as i64);
        let scales = Array1::<f32>::from_vec(controls.as_scales().to_vec());

        let bindings = vec![
            (self.spec[0].name.clone(), TensorData::Int64(ids.into_dyn())),
            (
                self.spec[1].name.clone(),
                TensorData::Int64(lengths.into_dyn()),
            ),
            (
                self.spec[2].name.clone(),
                TensorData::Float32(scales.into_dyn()),
            ),
        ];

        Ok(InputTensorSet { bindings })
    }
}
