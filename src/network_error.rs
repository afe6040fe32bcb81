//! NetworkError: Unified error type for stream-sieve public APIs
//!
//! Every fatal condition of the engine and of its file surfaces is a variant
//! of [`NetworkError`]. Non-fatal data-quality findings are not errors; they
//! are collected as [`Diagnostic`](crate::diagnostics::Diagnostic) values.

use crate::topology::ids::{ArcId, NodeId};
use thiserror::Error;

/// Unified error type for stream-sieve operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    /// An arc has zero, negative or non-finite geometric length.
    #[error("Malformed input: arc {arc} has non-positive length {length}")]
    NonPositiveLength { arc: ArcId, length: f64 },
    /// An arc starts and ends on the same node.
    #[error("Malformed input: arc {arc} is degenerate (from_node == to_node == {node})")]
    DegenerateArc { arc: ArcId, node: NodeId },
    /// Arc ids must be non-negative; `-1` marks a missing link in output files.
    #[error("Malformed input: arc id {arc} is negative")]
    InvalidId { arc: ArcId },
    /// Two input rows share the same arc id.
    #[error("Malformed input: duplicate arc id {0}")]
    DuplicateArcId(ArcId),
    /// A non-negative input field holds a negative or non-finite value.
    #[error("Malformed input: arc {arc} has invalid {field} = {value}")]
    InvalidField {
        arc: ArcId,
        field: &'static str,
        value: f64,
    },
    /// Downstream links contain a cycle; `cycle` lists its arcs in flow order.
    #[error("Cyclic network: order propagation did not settle after {rounds} rounds; cycle through arcs {cycle:?}")]
    CyclicNetwork { cycle: Vec<ArcId>, rounds: usize },
    /// A configured round limit is smaller than the depth of an acyclic network.
    #[error("Order propagation exceeded the round limit of {rounds} without a cycle; arcs still rising: {active:?}")]
    RoundLimitExceeded { rounds: usize, active: Vec<ArcId> },
    /// More than one downstream candidate while ambiguity is configured as fatal.
    #[error("Ambiguous downstream for arc {arc}: candidates {candidates:?}")]
    AmbiguousDownstream { arc: ArcId, candidates: Vec<ArcId> },
    /// Engine configuration rejected by [`EngineConfig::validate`](crate::config::EngineConfig::validate).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// An arc cannot be written because a required derived field is unassigned.
    #[error("Arc {arc} cannot be exported: {reason}")]
    Unexportable { arc: ArcId, reason: String },
    /// A derived-network invariant does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    /// Text arc table could not be parsed.
    #[error("Arc table parse error at line {line}: {reason}")]
    ArcTableParse { line: usize, reason: String },
    /// Underlying reader/writer failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl NetworkError {
    /// True for the input-validation class that aborts before any computation.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            NetworkError::NonPositiveLength { .. }
                | NetworkError::DegenerateArc { .. }
                | NetworkError::InvalidId { .. }
                | NetworkError::DuplicateArcId(_)
                | NetworkError::InvalidField { .. }
        )
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e.to_string())
    }
}
