//! Shared test helpers for solver tests.

use std::sync::Mutex;
use veristep_core::backend::{GenerationRequest, GenerationResponse, Provider, Usage};
use veristep_core::error::ProviderError;

/// A mock backend that returns a sequence of scripted outcomes.
///
/// Each call to `generate` returns the next outcome in the queue.
/// Panics if more calls are made than outcomes provided.
pub struct SequentialMockProvider {
    outcomes: Mutex<Vec<Result<GenerationResponse, ProviderError>>>,
    call_count: Mutex<usize>,
}

impl SequentialMockProvider {
    pub fn new(outcomes: Vec<Result<GenerationResponse, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            call_count: Mutex::new(0),
        }
    }

    /// Script from plain completion texts only (no errors).
    pub fn from_texts(texts: Vec<String>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(text_response(&t))).collect())
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn generate(
        &self,
        _request: GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let outcomes = self.outcomes.lock().unwrap();

        if *count >= outcomes.len() {
            panic!(
                "SequentialMockProvider: no more outcomes (call #{}, have {})",
                *count,
                outcomes.len()
            );
        }

        let outcome = outcomes[*count].clone();
        *count += 1;
        outcome
    }
}

/// Create a plain text completion.
pub fn text_response(text: &str) -> GenerationResponse {
    GenerationResponse {
        text: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// A plausible planner completion.
pub fn plan_text() -> String {
    "1. Read the question\n2. Add the numbers\n3. Self-check the sum".into()
}

/// An executor completion carrying a well-formed solution object.
pub fn solution_text(answer: &str) -> String {
    serde_json::json!({
        "answer": answer,
        "reasoning": format!("worked it out to {answer}"),
        "intermediate_work": "step-by-step arithmetic",
    })
    .to_string()
}

/// A verifier completion: one check per `passed` flag, wrapped in a fence
/// the way real backends tend to answer.
pub fn checks_text(passed: &[bool]) -> String {
    let names = [
        "Correctness Check",
        "Arithmetic Check",
        "Logic Check",
        "Constraint Check",
        "Units Check",
    ];
    let checks: Vec<serde_json::Value> = passed
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            serde_json::json!({
                "check_name": names[i % names.len()],
                "passed": p,
                "details": if p { "looks right" } else { "does not hold up" },
            })
        })
        .collect();
    format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(&checks).unwrap()
    )
}
