use crate::tensor::{InputSlot, TensorData};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    #[error("input '{0}' is not declared by the model")]
    UnknownInput(String),
    #[error("required input '{0}' was never bound")]
    MissingInput(String),
    #[error("a run is already in flight")]
    RunInFlight,
    #[error("no run is in flight")]
    NoRunActive,
    #[error("model inference failed: {0}")]
    Inference(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Progress of one cooperative inference step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    /// More steps remain; the driver should yield before advancing again.
    Pending,
    /// The run has completed and its output can be taken.
    Done,
}

impl StepProgress {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A loaded, runnable instance of the acoustic model.
///
/// Execution is decomposed into discrete advanceable steps so that a large
/// model never monopolizes the caller's execution context; backends that
/// cannot slice their work expose a single bounded step. A session supports
/// at most one in-flight run at a time.
pub trait InferenceSession: Send {
    /// Ordered input slots the loaded model declares; read-only during a
    /// request.
    fn input_spec(&self) -> &[InputSlot];

    /// Associate a buffer with one declared input name. Binding the same
    /// name twice within one sentence replaces the earlier buffer.
    fn bind(&mut self, name: &str, tensor: TensorData) -> SessionResult<()>;

    /// Start a run over the currently bound inputs. Fails with
    /// [`SessionError::MissingInput`] if any declared input is unbound.
    fn begin_run(&mut self) -> SessionResult<()>;

    /// Advance the in-flight run by one bounded unit of work.
    fn advance_run(&mut self) -> SessionResult<StepProgress>;

    /// The primary output buffer, available only once the run has fully
    /// advanced.
    fn peek_output(&self) -> Option<&TensorData>;

    /// Take ownership of the primary output buffer, if complete.
    fn take_output(&mut self) -> Option<TensorData>;

    /// Abandon any in-flight run and release all bound buffers.
    fn reset(&mut self);
}
