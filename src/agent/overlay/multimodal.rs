use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::error::StrategyError;
use crate::plan::{Action, Decision, Observation};

/// Converts one modality's raw payload into something a plan can use,
/// e.g. an image captioner or an audio transcriber.
pub trait ModalityProcessor: Send {
    /// Process one raw payload
    fn process(&self, data: &Value) -> Result<Value, StrategyError>;
}

/// Overlay that runs registered processors over perceived modalities.
///
/// For every modality on an observation with a matching processor, the
/// processed output is stored in the wrapped agent's memory under
/// `processed_<modality>`; the observation itself then reaches the inner
/// agent untouched, so the textual perceive path is identical with or
/// without this overlay. Modalities without a processor pass through
/// silently, and a processor failure skips just that modality.
pub struct MultimodalOverlay<A: Agent> {
    inner: A,
    processors: HashMap<String, Box<dyn ModalityProcessor>>,
}

impl<A: Agent> MultimodalOverlay<A> {
    /// Wrap an agent with no processors registered
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            processors: HashMap::new(),
        }
    }

    /// Register a processor for a modality name
    pub fn with_processor(
        mut self,
        modality: impl Into<String>,
        processor: Box<dyn ModalityProcessor>,
    ) -> Self {
        self.processors.insert(modality.into(), processor);
        self
    }

    /// The wrapped agent
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Mutable access to the wrapped agent
    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    /// Unwrap the overlay
    pub fn into_inner(self) -> A {
        self.inner
    }

    /// Build a response action that carries modality payloads next to its
    /// text, for callers assembling multimodal replies.
    pub fn compose_response(
        &self,
        text: impl Into<String>,
        modalities: HashMap<String, Value>,
    ) -> Action {
        Action::custom(
            "multimodal_response",
            json!({
                "text": text.into(),
                "modalities": modalities,
            }),
        )
    }
}

impl<A: Agent> Agent for MultimodalOverlay<A> {
    fn perceive(&mut self, observation: Observation) {
        for (modality, payload) in &observation.modalities {
            let Some(processor) = self.processors.get(modality) else {
                continue;
            };
            match processor.process(payload) {
                Ok(output) => {
                    debug!(modality = %modality, "Processed modality payload");
                    self.inner.remember(&format!("processed_{modality}"), output);
                }
                Err(err) => {
                    warn!(modality = %modality, error = %err, "Modality processing failed, skipping");
                }
            }
        }

        // The text path always runs, processed modalities or not.
        self.inner.perceive(observation);
    }

    fn decide_next_action(&mut self) -> Decision {
        self.inner.decide_next_action()
    }

    fn remember(&mut self, key: &str, value: Value) {
        self.inner.remember(key, value);
    }

    fn recall(&self, key: &str) -> Option<Value> {
        self.inner.recall(key)
    }

    fn supports_task_type(&self, task_type: &str) -> bool {
        self.inner.supports_task_type(task_type)
    }
}
