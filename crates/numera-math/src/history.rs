//! Per-call iteration history.

/// Upper bound on the capacity reserved up front.
const MAX_PREALLOCATED_STEPS: usize = 4096;

/// Append-only record of the steps of one solver call.
///
/// The buffer is sized from the iteration bound so a run up to the bound
/// never reallocates (capped at a few thousand entries; longer runs grow).
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecorder<S> {
    steps: Vec<S>,
}

impl<S> IterationRecorder<S> {
    /// Creates a recorder for a run of at most `max_iterations` steps.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            steps: Vec::with_capacity(max_iterations.min(MAX_PREALLOCATED_STEPS)),
        }
    }

    /// Appends a step.
    pub fn push(&mut self, step: S) {
        self.steps.push(step);
    }

    /// Returns the most recent step.
    pub fn last(&self) -> Option<&S> {
        self.steps.last()
    }

    /// Returns the number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the recorded steps in order.
    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Consumes the recorder, returning the steps in order.
    pub fn into_steps(self) -> Vec<S> {
        self.steps
    }
}
