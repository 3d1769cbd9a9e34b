use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{Tool, ToolOutcome, ToolParams};

/// Name-keyed collection of tools with guarded invocation.
///
/// Tools are shared behind `Arc` so a registry can be cloned cheaply into
/// executors and test harnesses. Registration keys off [`Tool::name`].
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Add a tool, keyed by its own name, consuming and returning the
    /// registry for chained construction
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Add a tool, keyed by its own name. A second tool with the same name
    /// replaces the first.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Whether a tool with the given name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Names of all registered tools, in no particular order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Route an invocation to the named tool.
    ///
    /// Returns `None` when the name is unknown. This is the routing
    /// primitive; most callers want [`ToolRegistry::invoke`].
    pub fn dispatch(&self, name: &str, params: &ToolParams) -> Option<ToolOutcome> {
        self.tools.get(name).map(|tool| tool.call(params))
    }

    /// Invoke the named tool, folding routing failures into the outcome.
    ///
    /// An unknown name yields `Failure { error: "tool not found: <name>" }`
    /// and a failing tool's own message passes through unchanged, so this
    /// never panics and the caller always gets a value it can store or
    /// inspect.
    pub fn invoke(&self, name: &str, params: &ToolParams) -> ToolOutcome {
        match self.dispatch(name, params) {
            Some(outcome) => {
                if let ToolOutcome::Failure { error } = &outcome {
                    debug!(tool = %name, error = %error, "Tool reported failure");
                }
                outcome
            }
            None => {
                warn!(tool = %name, "Tool not found in registry");
                ToolOutcome::failure(format!("tool not found: {name}"))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
