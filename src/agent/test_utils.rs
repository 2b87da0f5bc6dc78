//! Shared test utilities for the `agent` module.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::agent::runner::AgentRunner;

/// Mock agent with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order; once exhausted, calls fail with
/// `"no more mock responses"`. Every prompt is recorded so tests can check
/// what was sent after the runner has been moved.
pub(crate) struct MockAgentRunner {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    recorded_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAgentRunner {
    /// Creates a mock that returns the given responses in order.
    pub(crate) fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            recorded_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock answering once with the given text.
    pub(crate) fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Returns a handle for inspecting recorded prompts.
    pub(crate) fn prompt_handle(&self) -> PromptRecordHandle {
        PromptRecordHandle {
            recorded_prompts: self.recorded_prompts.clone(),
        }
    }
}

/// Shared handle to a mock runner's recorded prompts.
pub(crate) struct PromptRecordHandle {
    recorded_prompts: Arc<Mutex<Vec<String>>>,
}

impl PromptRecordHandle {
    /// Returns all recorded prompts.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.recorded_prompts.lock().unwrap().clone()
    }
}

impl AgentRunner for MockAgentRunner {
    fn run<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let responses = self.responses.clone();
        let recorded = self.recorded_prompts.clone();
        let prompt = prompt.to_string();
        Box::pin(async move {
            recorded.lock().unwrap().push(prompt);
            responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no more mock responses")))
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
