//! Inference session backends.
//!
//! Each backend is feature-gated and can be enabled individually.

#[cfg(feature = "onnx")]
pub mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::OrtSession;
