//! Error types for the cognition-loop runtime
//!
//! Failures of injected collaborators are caught at their call sites and
//! degraded (fallback plan, fail-open original value, skipped adaptation),
//! so most of these types show up in logs and in error-shaped values rather
//! than crossing the public call surface. The exceptions are documented on
//! the operations that return them.

use thiserror::Error;

/// Failure reported by an injected collaborator such as a planning
/// strategy, feedback interpreter, tuner, explainer, anonymizer or
/// modality processor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    /// The collaborator ran but could not complete
    #[error("Collaborator failed: {0}")]
    Failed(String),

    /// The collaborator answered with output the caller cannot use
    #[error("Unusable collaborator output: {0}")]
    UnusableOutput(String),
}

impl StrategyError {
    /// Shorthand for the common failure case
    pub fn failed(message: impl Into<String>) -> Self {
        StrategyError::Failed(message.into())
    }
}

/// Errors raised when routing a task to a worker agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No registered agent matched the task type, by name or by capability
    #[error("No suitable agent for task type '{task_type}'")]
    NoSuitableAgent { task_type: String },
}

/// Errors raised by memory stores and durable backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Writing a value failed
    #[error("Memory store failed for key '{key}': {reason}")]
    StoreFailed { key: String, reason: String },

    /// Reading a value failed
    #[error("Memory load failed for key '{key}': {reason}")]
    LoadFailed { key: String, reason: String },
}

/// Errors raised by the stream processor's queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The worker has exited and the queue no longer accepts items
    #[error("Stream queue is closed")]
    QueueClosed,
}
