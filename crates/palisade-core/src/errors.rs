//! Error taxonomy for the perception pipeline and the simulation.
//!
//! Perception failures never propagate into the simulation; they only
//! ever mean "no new input this tick". Simulation faults are contained
//! at tick granularity and escalate to a halt when they repeat.

use thiserror::Error;

/// Failures on the perception side of the pipeline. All non-fatal:
/// the affected frame is skipped and the next frame proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerceptionError {
    /// The capture device is gone; reacquisition continues with backoff.
    #[error("capture source unavailable: {0}")]
    SourceUnavailable(String),
    /// Inference exceeded its latency budget; the frame was dropped.
    #[error("inference exceeded budget of {budget_ms}ms (took {took_ms}ms)")]
    InferenceTimeout { budget_ms: u64, took_ms: u64 },
    /// The underlying model failed on this frame.
    #[error("detector failure: {0}")]
    DetectorFailure(String),
}

/// An internal invariant violation detected during a tick. The tick is
/// rolled back and the previous state retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant `{invariant}` violated at tick {tick}: {detail}")]
pub struct SimulationFault {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Tick at which the violation was detected.
    pub tick: u64,
    pub detail: String,
}
