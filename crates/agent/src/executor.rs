//! Executor stage — follows the plan and produces a structured solution.
//!
//! The backend is told to emit exactly one JSON object with `answer`,
//! `reasoning`, and `intermediate_work` fields; the reply goes through the
//! tolerant extractor before being mapped into a [`Solution`].

use veristep_core::error::ExtractionError;
use veristep_core::extract::extract_json;
use veristep_core::report::Solution;

/// System instructions for the execution call.
pub const EXECUTOR_SYSTEM: &str = "\
You are a precise problem solver. Execute plans carefully, showing all \
intermediate work. Always output valid JSON in the exact format requested. \
Be thorough in calculations and clear in explanations.";

/// Build the executor prompt from the question and the plan.
pub fn executor_prompt(question: &str, plan: &str) -> String {
    format!(
        r#"You are solving the following question by following a specific plan.

Question: {question}

Plan to follow:
{plan}

Execute each step of the plan carefully. Show your intermediate work and calculations.

IMPORTANT: Respond ONLY with valid JSON. Do not include any explanatory text before or after the JSON.

Provide your response in this exact JSON format:
{{
    "answer": "<final short answer>",
    "reasoning": "<brief explanation of how you got the answer>",
    "intermediate_work": "<detailed step-by-step work showing calculations>"
}}

Make sure to:
- Follow the plan exactly
- Show all intermediate calculations
- Double-check arithmetic
- Provide a clear, concise final answer
- OUTPUT ONLY THE JSON, NOTHING ELSE

JSON Response:"#
    )
}

/// Recover a [`Solution`] from a raw executor completion.
///
/// A completion whose JSON lacks the required fields is just as malformed
/// as one with no JSON at all — no field is ever filled with a guess.
pub fn parse_solution(text: &str) -> Result<Solution, ExtractionError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|_| ExtractionError::from_text(text))
}
