use crate::session::{InferenceSession, SessionResult, StepProgress};
use crate::tensor::TensorData;

/// One inference run as a resumable unit of work.
///
/// Holds the exclusive borrow of its session for the duration of the run, so
/// a second concurrent run on the same session cannot be expressed. Dropping
/// the wrapper, on any path, abandons remaining steps and releases the
/// session's bound buffers.
pub struct CooperativeRun<'s, S: InferenceSession + ?Sized> {
    session: &'s mut S,
    done: bool,
}

impl<'s, S: InferenceSession + ?Sized> std::fmt::Debug for CooperativeRun<'s, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooperativeRun")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'s, S: InferenceSession + ?Sized> CooperativeRun<'s, S> {
    /// Begin a run over the session's currently bound inputs.
    pub fn begin(session: &'s mut S) -> SessionResult<Self> {
        session.begin_run()?;
        Ok(Self {
            session,
            done: false,
        })
    }

    /// Advance one step, reporting whether more steps remain.
    pub fn advance(&mut self) -> SessionResult<StepProgress> {
        let progress = self.session.advance_run()?;
        self.done = progress.is_done();
        Ok(progress)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Drive the run to completion, yielding control back to the host
    /// scheduler exactly once between steps, then take the primary output.
    pub async fn complete(mut self) -> SessionResult<Option<TensorData>> {
        while !self.done {
            if self.advance()?.is_done() {
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(self.session.take_output())
    }
}

impl<S: InferenceSession + ?Sized> Drop for CooperativeRun<'_, S> {
    fn drop(&mut self) {
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionError;
    use crate::tensor::{ElemKind, InputSlot};
    use ndarray::Array1;
    use std::collections::HashMap;

    /// Session that completes after a configurable number of steps.
    struct StepSession {
        spec: Vec<InputSlot>,
        bound: HashMap<String, TensorData>,
        steps_remaining: usize,
        running: bool,
        output: Option<TensorData>,
        resets: usize,
    }

    impl StepSession {
        fn new(steps: usize) -> Self {
            Self {
                spec: vec![InputSlot::new("input", ElemKind::Int64)],
                bound: HashMap::new(),
                steps_remaining: steps,
                running: false,
                output: None,
                resets: 0,
            }
        }
    }

    impl InferenceSession for StepSession {
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
            if self.steps_remaining > 1 {
                self.steps_remaining -= 1;
                return Ok(StepProgress::Pending);
            }
            self.steps_remaining = 0;
            self.output = Some(TensorData::Float32(Array1::from_vec(vec![0.25]).into_dyn()));
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
            self.resets += 1;
        }
    }

    fn bind_input(session: &mut StepSession) {
        session
            .bind(
                "input",
                TensorData::Int64(Array1::from_vec(vec![1]).into_dyn()),
            )
            .unwrap();
    }

    #[tokio::test]
    async fn completes_multi_step_run() {
        let mut session = StepSession::new(3);
        bind_input(&mut session);

        let run = CooperativeRun::begin(&mut session).unwrap();
        let output = run.complete().await.unwrap();
        assert!(matches!(output, Some(TensorData::Float32(_))));
        assert_eq!(session.resets, 1);
        assert!(session.bound.is_empty());
    }

    #[tokio::test]
    async fn single_step_run_reports_done_immediately() {
        let mut session = StepSession::new(1);
        bind_input(&mut session);

        let mut run = CooperativeRun::begin(&mut session).unwrap();
        assert!(run.advance().unwrap().is_done());
        assert!(run.is_done());
    }

    #[test]
    fn begin_fails_without_bound_inputs() {
        let mut session = StepSession::new(1);
        let err = CooperativeRun::begin(&mut session).unwrap_err();
        match err {
            SessionError::MissingInput(name) => assert_eq!(name, "input"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn drop_mid_run_releases_session() {
        let mut session = StepSession::new(5);
        bind_input(&mut session);

        {
            let mut run = CooperativeRun::begin(&mut session).unwrap();
            assert_eq!(run.advance().unwrap(), StepProgress::Pending);
            // teardown before the run finishes
        }

        assert_eq!(session.resets, 1);
        assert!(session.bound.is_empty());
        assert!(!session.running);
    }
}
