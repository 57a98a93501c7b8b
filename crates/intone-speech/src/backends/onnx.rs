//! ONNX Runtime session backend.

use crate::device::Device;
use crate::session::{InferenceSession, SessionError, SessionResult, StepProgress};
use crate::tensor::{ElemKind, InputSlot, TensorData};
use ndarray::Array1;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputValue, SessionInputs};
use ort::tensor::TensorElementType;
use ort::value::{Value, ValueType};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Executing,
    Complete,
}

/// [`InferenceSession`] backed by an ONNX Runtime session.
///
/// The runtime executes a graph atomically, so a run here is a single
/// bounded step; the input/output spec is discovered from the loaded
/// model's own declarations.
pub struct OrtSession {
    session: Session,
    input_spec: Vec<InputSlot>,
    output_name: String,
    bound: HashMap<String, TensorData>,
    state: RunState,
    output: Option<TensorData>,
}

impl std::fmt::Debug for OrtSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtSession")
            .field("input_spec", &self.input_spec)
            .field("output_name", &self.output_name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl OrtSession {
    /// Load a serialized model from disk and prepare it for inference on
    /// the given device.
    pub fn from_file(path: impl AsRef<Path>, device: &Device) -> SessionResult<Self> {
        let session = build_session(path.as_ref(), device)?;

        let input_spec: Vec<InputSlot> = session
            .inputs
            .iter()
            .map(|input| InputSlot::new(input.name.clone(), elem_kind(&input.input_type)))
            .collect();
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| SessionError::ModelLoad("model declares no outputs".to_string()))?;

        Ok(Self {
            session,
            input_spec,
            output_name,
            bound: HashMap::new(),
            state: RunState::Idle,
            output: None,
        })
    }

    fn execute(&mut self) -> SessionResult<()> {
        let mut inputs: Vec<(Cow<'static, str>, SessionInputValue<'static>)> =
            Vec::with_capacity(self.input_spec.len());
        for slot in &self.input_spec {
            let tensor = self
                .bound
                .get(&slot.name)
                .ok_or_else(|| SessionError::MissingInput(slot.name.clone()))?;
            inputs.push((Cow::Owned(slot.name.clone()), to_ort_value(tensor)?));
        }

        let outputs = self
            .session
            .run(SessionInputs::from(inputs))
            .map_err(|err| SessionError::Inference(err.to_string()))?;
        let value = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            SessionError::Inference(format!("missing output '{}'", self.output_name))
        })?;
        self.output = Some(extract_output(value)?);
        Ok(())
    }
}

impl InferenceSession for OrtSession {
    fn input_spec(&self) -> &[InputSlot] {
        &self.input_spec
    }

    fn bind(&mut self, name: &str, tensor: TensorData) -> SessionResult<()> {
        if self.state != RunState::Idle {
            return Err(SessionError::RunInFlight);
        }
        if !self.input_spec.iter().any(|slot| slot.name == name) {
            return Err(SessionError::UnknownInput(name.to_string()));
        }
        // Last bind wins within one sentence.
        self.bound.insert(name.to_string(), tensor);
        Ok(())
    }

    fn begin_run(&mut self) -> SessionResult<()> {
        if self.state != RunState::Idle {
            return Err(SessionError::RunInFlight);
        }
        for slot in &self.input_spec {
            if !self.bound.contains_key(&slot.name) {
                return Err(SessionError::MissingInput(slot.name.clone()));
            }
        }
        self.output = None;
        self.state = RunState::Executing;
        Ok(())
    }

    fn advance_run(&mut self) -> SessionResult<StepProgress> {
        match self.state {
            RunState::Idle => Err(SessionError::NoRunActive),
            RunState::Executing => match self.execute() {
                Ok(()) => {
                    self.state = RunState::Complete;
                    Ok(StepProgress::Done)
                }
                Err(err) => {
                    self.state = RunState::Idle;
                    Err(err)
                }
            },
            RunState::Complete => Ok(StepProgress::Done),
        }
    }

    fn peek_output(&self) -> Option<&TensorData> {
        match self.state {
            RunState::Complete => self.output.as_ref(),
            _ => None,
        }
    }

    fn take_output(&mut self) -> Option<TensorData> {
        match self.state {
            RunState::Complete => self.output.take(),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.bound.clear();
        self.output = None;
        self.state = RunState::Idle;
    }
}

fn build_session(path: &Path, device: &Device) -> SessionResult<Session> {
    let mut builder = Session::builder()
        .map_err(load_err)?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(load_err)?;

    match device {
        Device::Cpu(threads) => {
            if *threads > 0 {
                builder = builder.with_intra_threads(*threads).map_err(load_err)?;
            }
        }
        Device::Cuda(id) => {
            #[cfg(feature = "cuda")]
            {
                use ort::execution_providers::CUDAExecutionProvider;
                builder = builder
                    .with_execution_providers([CUDAExecutionProvider::default()
                        .with_device_id(*id as i32)
                        .build()])
                    .map_err(load_err)?;
            }
            #[cfg(not(feature = "cuda"))]
            {
                return Err(SessionError::ModelLoad(format!(
                    "cuda:{id} requested but the `cuda` feature is disabled"
                )));
            }
        }
    }

    builder.commit_from_file(path).map_err(load_err)
}

fn load_err(err: ort::Error) -> SessionError {
    SessionError::ModelLoad(err.to_string())
}

fn elem_kind(value_type: &ValueType) -> ElemKind {
    match value_type {
        ValueType::Tensor { ty, .. } => match ty {
            TensorElementType::Int64 => ElemKind::Int64,
            TensorElementType::Float32 => ElemKind::Float32,
            _ => ElemKind::Other,
        },
        _ => ElemKind::Other,
    }
}

fn to_ort_value(tensor: &TensorData) -> SessionResult<SessionInputValue<'static>> {
    let value: Value = match tensor {
        TensorData::Int64(array) => Value::from_array(array.clone())
            .map_err(|err| SessionError::Inference(err.to_string()))?
            .into(),
        TensorData::Float32(array) => Value::from_array(array.clone())
            .map_err(|err| SessionError::Inference(err.to_string()))?
            .into(),
    };
    Ok(value.into())
}

/// Capture the primary output, preserving its element type so the extractor
/// can validate it. The pipeline consumes outputs as flat buffers.
fn extract_output(value: &Value) -> SessionResult<TensorData> {
    if let Ok(output) = value.try_extract_tensor::<f32>() {
        return Ok(TensorData::Float32(
            Array1::from_vec(output.1.to_vec()).into_dyn(),
        ));
    }
    if let Ok(output) = value.try_extract_tensor::<i64>() {
        return Ok(TensorData::Int64(
            Array1::from_vec(output.1.to_vec()).into_dyn(),
        ));
    }
    Err(SessionError::Inference(
        "unsupported output tensor element type".to_string(),
    ))
}
