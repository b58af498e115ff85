//! Staged progress protocol for envelope operations.
//!
//! One [`Progress`] value per in-flight operation, owned by the caller and
//! never reused. The operation records a [`ProgressState`] as each stage
//! completes; the caller inspects the recorded states afterwards, or attaches
//! a tokio unbounded channel to consume them live from another task. There is
//! no callback control flow.
//!
//! On failure the failing step is recorded with `error = true`; `outcomes()`
//! marks every earlier step `Complete` and every later step `Cancelled` so a
//! UI can render the full staircase without special-casing.

use crate::error::CryptoError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// A single progress update within one seal or open operation.
///
/// `step` is 1-based and monotonically non-decreasing across one operation,
/// except that a failing update carries the step that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub step: u32,
    pub status: String,
    pub error: bool,
    /// Optional diagnostic payloads for display (hex digests and, when
    /// diagnostics are enabled, recovered key material).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

/// Per-step outcome derived from the recorded states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Not reached yet (operation still in flight).
    Pending,
    Complete,
    Failed,
    /// Skipped because an earlier step failed.
    Cancelled,
}

/// Progress recorder for one envelope operation.
#[derive(Debug, Default)]
pub struct Progress {
    total_steps: u32,
    completed: u32,
    failed_step: Option<u32>,
    states: Vec<ProgressState>,
    sink: Option<mpsc::UnboundedSender<ProgressState>>,
    diagnostics: bool,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards every recorded state into `sink` as it happens, in addition
    /// to buffering it. A dropped receiver is ignored: the operation outcome
    /// never depends on whether anyone is watching.
    pub fn with_channel(sink: mpsc::UnboundedSender<ProgressState>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::default()
        }
    }

    /// Opts in to diagnostic payloads in progress data (recovered file key
    /// hex during decryption). Off by default: diagnostic exposure of key
    /// material is a debug facility, not standard behavior.
    pub fn with_diagnostics(mut self) -> Self {
        self.diagnostics = true;
        self
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Declares the operation's step count. Called by the operation itself,
    /// once, before its first stage.
    pub(crate) fn begin(&mut self, total_steps: u32) {
        debug_assert!(
            self.states.is_empty(),
            "a Progress value must not be reused across operations"
        );
        self.total_steps = total_steps;
    }

    /// Records completion of the next step.
    pub(crate) fn advance(&mut self, status: impl Into<String>) {
        self.advance_with_data(status, None);
    }

    /// Records completion of the next step with diagnostic data attached.
    pub(crate) fn advance_with_data(
        &mut self,
        status: impl Into<String>,
        data: Option<BTreeMap<String, String>>,
    ) {
        self.completed += 1;
        self.record(ProgressState {
            step: self.completed,
            status: status.into(),
            error: false,
            data,
        });
    }

    /// Records failure of the step currently being attempted and hands the
    /// error back for propagation.
    pub(crate) fn fail(&mut self, err: CryptoError) -> CryptoError {
        let step = self.completed + 1;
        self.failed_step = Some(step);
        self.record(ProgressState {
            step,
            status: err.to_string(),
            error: true,
            data: None,
        });
        err
    }

    fn record(&mut self, state: ProgressState) {
        if let Some(sink) = &self.sink {
            let _ = sink.send(state.clone());
        }
        self.states.push(state);
    }

    /// All states recorded so far, in emission order.
    pub fn states(&self) -> &[ProgressState] {
        &self.states
    }

    pub fn last(&self) -> Option<&ProgressState> {
        self.states.last()
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_failed(&self) -> bool {
        self.failed_step.is_some()
    }

    /// The step that failed, if the operation failed.
    pub fn failed_step(&self) -> Option<u32> {
        self.failed_step
    }

    /// Whether every step completed without error.
    pub fn is_complete(&self) -> bool {
        self.failed_step.is_none() && self.total_steps > 0 && self.completed == self.total_steps
    }

    /// Outcome of every step of the operation, failing step flagged, later
    /// steps cancelled.
    pub fn outcomes(&self) -> Vec<StepOutcome> {
        (1..=self.total_steps)
            .map(|step| match self.failed_step {
                Some(failed) if step < failed => StepOutcome::Complete,
                Some(failed) if step == failed => StepOutcome::Failed,
                Some(_) => StepOutcome::Cancelled,
                None if step <= self.completed => StepOutcome::Complete,
                None => StepOutcome::Pending,
            })
            .collect()
    }
}
