//! Shared vocabulary of the cognition loop: observations in, plans and
//! actions out.
//!
//! Every component of the runtime reads and writes these types. An
//! [`Observation`] enters through `perceive`, a [`Plan`] is produced by a
//! planning strategy, and each `decide_next_action` turn serves one
//! [`Action`] wrapped in a [`Decision`]. Plans are replaced whole on
//! regeneration, never patched in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool::ToolParams;

/// One unit of perceived input: a textual payload plus optional named
/// modality payloads such as `image` or `audio`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Primary textual content of the observation
    pub text: String,
    /// Additional payloads keyed by modality name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub modalities: HashMap<String, Value>,
}

impl Observation {
    /// Create a text-only observation
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            modalities: HashMap::new(),
        }
    }

    /// Attach a named modality payload
    pub fn with_modality(mut self, modality: impl Into<String>, payload: Value) -> Self {
        self.modalities.insert(modality.into(), payload);
        self
    }

    /// Whether the observation carries any modality payloads
    pub fn is_multimodal(&self) -> bool {
        !self.modalities.is_empty()
    }
}

impl From<&str> for Observation {
    fn from(text: &str) -> Self {
        Observation::text(text)
    }
}

impl From<String> for Observation {
    fn from(text: String) -> Self {
        Observation::text(text)
    }
}

/// What came back from one peer or worker turn during coordination.
///
/// Failures travel as data so a plan can embed them next to successful
/// results without losing ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeerOutcome {
    /// The peer produced a decision for the task
    Completed { decision: Box<Decision> },
    /// The task could not be routed, or the peer was unavailable
    Failed { error: String },
}

impl PeerOutcome {
    /// Wrap a peer's decision
    pub fn completed(decision: Decision) -> Self {
        PeerOutcome::Completed {
            decision: Box::new(decision),
        }
    }

    /// Record why a peer could not answer
    pub fn failed(error: impl Into<String>) -> Self {
        PeerOutcome::Failed {
            error: error.into(),
        }
    }

    /// Check whether the peer answered
    pub fn is_completed(&self) -> bool {
        matches!(self, PeerOutcome::Completed { .. })
    }

    /// Get the peer's decision if it answered
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            PeerOutcome::Completed { decision } => Some(decision),
            PeerOutcome::Failed { .. } => None,
        }
    }
}

/// One step of a plan.
///
/// The `type` tag keeps the wire form stable while new kinds of actions are
/// added; consumers that do not understand a variant can still route it by
/// tag. [`Action::Custom`] is the escape hatch for action kinds the runtime
/// does not model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Examine a piece of input before acting on it
    Analyze { content: String },
    /// Invoke a named tool with structured parameters
    ToolUse {
        tool_name: String,
        #[serde(default)]
        parameters: ToolParams,
    },
    /// Reply to the caller with text
    Respond { content: String },
    /// Carry previously processed modality output into the plan
    UseMultimodalData {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    /// Result of one peer's turn during hub coordination
    CollaborationResult { outcome: PeerOutcome },
    /// Result of one dispatched sub-task
    DelegatedResult { outcome: PeerOutcome },
    /// Escape hatch for action kinds not modeled above
    Custom {
        kind: String,
        #[serde(default)]
        payload: Value,
    },
}

impl Action {
    /// Create an analyze action
    pub fn analyze(content: impl Into<String>) -> Self {
        Action::Analyze {
            content: content.into(),
        }
    }

    /// Create a tool invocation action
    pub fn tool_use(tool_name: impl Into<String>, parameters: ToolParams) -> Self {
        Action::ToolUse {
            tool_name: tool_name.into(),
            parameters,
        }
    }

    /// Create a respond action
    pub fn respond(content: impl Into<String>) -> Self {
        Action::Respond {
            content: content.into(),
        }
    }

    /// Create a custom action
    pub fn custom(kind: impl Into<String>, payload: Value) -> Self {
        Action::Custom {
            kind: kind.into(),
            payload,
        }
    }

    /// The default action served when no plan can be produced: ask the
    /// caller to clarify what they need.
    pub fn clarification() -> Self {
        Action::respond("How can I assist you further?")
    }

    /// Stable name of the action kind, for logs and routing
    pub fn kind(&self) -> &str {
        match self {
            Action::Analyze { .. } => "analyze",
            Action::ToolUse { .. } => "tool_use",
            Action::Respond { .. } => "respond",
            Action::UseMultimodalData { .. } => "use_multimodal_data",
            Action::CollaborationResult { .. } => "collaboration_result",
            Action::DelegatedResult { .. } => "delegated_result",
            Action::Custom { kind, .. } => kind,
        }
    }

    /// Outward-facing text of the action, if it has any
    pub fn response_content(&self) -> Option<&str> {
        match self {
            Action::Respond { content } => Some(content),
            _ => None,
        }
    }
}

/// The result of one decision turn: the action to take next, plus any
/// explanation attached by an explainability overlay.
///
/// Overlays that annotate decisions keep this shape, so stacking them never
/// changes the decide contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Decision {
    /// Attach an explanation to an action
    pub fn explained(action: Action, explanation: impl Into<String>) -> Self {
        Self {
            action,
            explanation: Some(explanation.into()),
        }
    }
}

impl From<Action> for Decision {
    fn from(action: Action) -> Self {
        Self {
            action,
            explanation: None,
        }
    }
}

/// Execution state of a plan, derived from its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// No steps to serve; a planning turn is needed
    NoPlan,
    /// The cursor points at an unserved step
    InProgress,
    /// Every step has been served; the next decision regenerates
    Exhausted,
}

/// An ordered sequence of actions plus a cursor over them.
///
/// The cursor always sits in `[0, len]`: `0` before anything was served,
/// `len` once the plan is exhausted. Serving never skips and never repeats
/// a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<Action>,
    cursor: usize,
}

impl Plan {
    /// Create a plan over the given steps, cursor at the start
    pub fn new(steps: Vec<Action>) -> Self {
        Self { steps, cursor: 0 }
    }

    /// Create a single-step plan
    pub fn single(action: Action) -> Self {
        Self::new(vec![action])
    }

    /// Create a plan with no steps
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of steps in the plan
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps at all
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Steps not yet served
    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    /// All steps, served or not
    pub fn steps(&self) -> &[Action] {
        &self.steps
    }

    /// Derive the execution state from the cursor
    pub fn state(&self) -> PlanState {
        if self.steps.is_empty() {
            PlanState::NoPlan
        } else if self.cursor < self.steps.len() {
            PlanState::InProgress
        } else {
            PlanState::Exhausted
        }
    }

    /// Serve the step at the cursor and advance.
    ///
    /// Returns `None` once the plan is exhausted (or was empty); the cursor
    /// never moves past `len`.
    pub fn next_action(&mut self) -> Option<Action> {
        let action = self.steps.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(action)
    }
}
