//! Verifier stage — independently checks a proposed solution.
//!
//! The backend is asked to run five named check categories and emit a JSON
//! array of `{check_name, passed, details}` objects. Fewer than five checks
//! are accepted as-is — none are fabricated. An empty or unparseable result
//! counts as an overall failure.

use veristep_core::error::ExtractionError;
use veristep_core::extract::extract_json;
use veristep_core::report::{Check, Solution};

/// System instructions for the verification call.
pub const VERIFIER_SYSTEM: &str = "\
You are a rigorous verifier. Re-solve problems independently to check \
answers. Verify arithmetic, logic, and constraints. Output only valid JSON \
in the requested format. Be thorough and catch any errors or \
inconsistencies.";

/// Build the verifier prompt from the question and the proposed solution.
pub fn verifier_prompt(question: &str, solution: &Solution) -> String {
    format!(
        r#"You are verifying a solution to a problem. Check if the solution is correct and consistent.

Question: {question}

Proposed Solution:
Answer: {answer}
Reasoning: {reasoning}
Work: {work}

Perform the following checks:
1. **Correctness Check**: Re-solve the problem independently. Does your answer match?
2. **Arithmetic Check**: Verify all calculations in the intermediate work.
3. **Logic Check**: Is the reasoning sound and does it follow logically?
4. **Constraint Check**: Are all constraints from the question satisfied?
5. **Units Check**: Are units consistent and correct?

IMPORTANT: Respond ONLY with a valid JSON array. Do not include any explanatory text before or after the JSON.

Provide your verification as this exact JSON array format:
[
    {{
        "check_name": "Correctness Check",
        "passed": true,
        "details": "explanation here"
    }},
    {{
        "check_name": "Arithmetic Check",
        "passed": true,
        "details": "explanation here"
    }}
]

Be strict but fair. If something is wrong, explain what and why.
OUTPUT ONLY THE JSON ARRAY, NOTHING ELSE

JSON Array:"#,
        answer = solution.answer,
        reasoning = solution.rationale,
        work = solution.work,
    )
}

/// Recover the check list from a raw verifier completion.
pub fn parse_checks(text: &str) -> Result<Vec<Check>, ExtractionError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|_| ExtractionError::from_text(text))
}

/// Logical AND across all returned checks.
///
/// An empty check list never passes: silence is not verification.
pub fn passed_overall(checks: &[Check]) -> bool {
    !checks.is_empty() && checks.iter().all(|c| c.passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_solution() -> Solution {
        Solution {
            answer: "4".into(),
            rationale: "2+2".into(),
            work: "2 + 2 = 4".into(),
        }
    }

    #[test]
    fn prompt_embeds_solution_and_all_five_categories() {
        let prompt = verifier_prompt("What is 2+2?", &sample_solution());
        assert!(prompt.contains("Answer: 4"));
        assert!(prompt.contains("Correctness Check"));
        assert!(prompt.contains("Arithmetic Check"));
        assert!(prompt.contains("Logic Check"));
        assert!(prompt.contains("Constraint Check"));
        assert!(prompt.contains("Units Check"));
    }

    #[test]
    fn parses_check_array() {
        let raw = r#"[
            {"check_name": "Correctness Check", "passed": true, "details": "matches"},
            {"check_name": "Arithmetic Check", "passed": false, "details": "off by one"}
        ]"#;
        let checks = parse_checks(raw).unwrap();
        assert_eq!(checks.len(), 2);
        assert!(!checks[1].passed);
    }

    #[test]
    fn parses_fenced_check_array() {
        let raw = "```json\n[{\"check_name\": \"Logic Check\", \"passed\": true, \"details\": \"ok\"}]\n```";
        let checks = parse_checks(raw).unwrap();
        assert_eq!(checks.len(), 1);
    }

    #[test]
    fn wrong_shape_is_a_hard_failure() {
        // Valid JSON, but not an array of checks
        assert!(parse_checks(r#"{"passed": true}"#).is_err());
    }

    #[test]
    fn all_passing_checks_pass_overall() {
        let checks = vec![
            Check::new("Correctness Check", true, "ok"),
            Check::new("Units Check", true, "ok"),
        ];
        assert!(passed_overall(&checks));
    }

    #[test]
    fn one_failing_check_fails_overall() {
        let checks = vec![
            Check::new("Correctness Check", true, "ok"),
            Check::new("Logic Check", false, "gap in step 2"),
        ];
        assert!(!passed_overall(&checks));
    }

    #[test]
    fn empty_check_list_fails_overall() {
        assert!(!passed_overall(&[]));
    }
}
