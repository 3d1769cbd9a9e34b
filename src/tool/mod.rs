//! # Tool Module
//!
//! Tools are the external capabilities a plan can invoke through
//! [`Action::ToolUse`](crate::plan::Action) steps. A tool is a named,
//! thread-safe callable taking structured parameters and answering with a
//! [`ToolOutcome`]; failures are carried as data so invocation never
//! panics and callers can store or inspect the result uniformly.
//!
//! ## Core Components
//!
//! - **[Tool]**: Trait defining a callable capability
//! - **[ToolOutcome]**: Success output or failure message, as a value
//! - **[ToolRegistry]**: Name-keyed collection routing invocations
//!
//! ## Invocation contract
//!
//! [`ToolRegistry::invoke`] never fails the caller: an unknown name folds
//! into a `Failure` outcome with a "tool not found" message, and a failing
//! tool's own message is passed through unchanged.

pub mod registry;

pub use registry::ToolRegistry;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Structured parameters handed to a tool invocation.
pub type ToolParams = serde_json::Map<String, Value>;

/// The result of invoking a tool: output on success, or the failure
/// message when the tool could not complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// Tool executed and produced output
    Success { output: Value },
    /// Tool was missing or could not complete
    Failure { error: String },
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn success(output: Value) -> Self {
        ToolOutcome::Success { output }
    }

    /// Create a failed outcome
    pub fn failure(error: impl Into<String>) -> Self {
        ToolOutcome::Failure {
            error: error.into(),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    /// Output of a successful invocation
    pub fn output(&self) -> Option<&Value> {
        match self {
            ToolOutcome::Success { output } => Some(output),
            ToolOutcome::Failure { .. } => None,
        }
    }

    /// Failure message of a failed invocation
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { error } => Some(error),
        }
    }

    /// Render the outcome as a plain JSON value, the shape stored into
    /// memory when tool results are persisted.
    pub fn to_value(&self) -> Value {
        match self {
            ToolOutcome::Success { output } => json!({ "status": "success", "output": output }),
            ToolOutcome::Failure { error } => json!({ "status": "failure", "error": error }),
        }
    }
}

/// An external capability an agent can invoke by name.
///
/// Implementations must be thread safe; registries hand out shared
/// references and the stream worker may call tools from its own task.
///
/// # Example
///
/// ```rust
/// use noema::tool::{Tool, ToolOutcome, ToolParams};
/// use serde_json::json;
///
/// struct Doubler;
///
/// impl Tool for Doubler {
///     fn name(&self) -> &str {
///         "doubler"
///     }
///
///     fn call(&self, params: &ToolParams) -> ToolOutcome {
///         match params.get("value").and_then(|v| v.as_f64()) {
///             Some(n) => ToolOutcome::success(json!(n * 2.0)),
///             None => ToolOutcome::failure("missing numeric 'value' parameter"),
///         }
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// Unique name the registry routes invocations by
    fn name(&self) -> &str;

    /// Human-readable description for listings and help text
    fn description(&self) -> &str {
        ""
    }

    /// Execute the tool with structured parameters.
    ///
    /// Implementations report their own failures through
    /// [`ToolOutcome::Failure`] instead of panicking.
    fn call(&self, params: &ToolParams) -> ToolOutcome;
}
