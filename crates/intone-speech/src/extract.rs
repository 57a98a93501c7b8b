use crate::tensor::{ElemKind, TensorData};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("inference produced no output tensor")]
    EmptyOutput,
    #[error("expected a float32 output tensor, got {0}")]
    TypeMismatch(ElemKind),
}

/// Validates an inference output and materializes it as a flat sample buffer.
///
/// Performs shape/type validation and linear extraction only; no resampling
/// or filtering happens here.
pub struct OutputExtractor;

impl OutputExtractor {
    pub fn extract(output: Option<TensorData>) -> Result<Vec<f32>, ExtractError> {
        let tensor = output.ok_or(ExtractError::EmptyOutput)?;
        match tensor {
            TensorData::Float32(array) => Ok(array.iter().copied().collect()),
            other => Err(ExtractError::TypeMismatch(other.elem())),
        }
    }
}
