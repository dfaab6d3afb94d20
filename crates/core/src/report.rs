//! Report and verification domain types.
//!
//! These are the value objects that flow through the pipeline: the executor
//! produces a [`Solution`], the verifier produces [`Check`]s, and the solver
//! assembles everything into the final [`AgentReport`].
//!
//! The serialized shape of [`AgentReport`] is a compatibility contract —
//! external consumers (console, dashboards, harnesses) parse exactly:
//!
//! ```json
//! {
//!   "answer": "...",
//!   "status": "success",
//!   "reasoning_visible_to_user": "...",
//!   "metadata": {
//!     "plan": "...",
//!     "checks": [{ "check_name": "...", "passed": true, "details": "..." }],
//!     "retries": 0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A single named pass/fail verification result.
///
/// Never mutated after creation; a verifier call produces an ordered
/// sequence of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Which verification this is (e.g. "Arithmetic Check")
    pub check_name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Explanation of what was verified and why it passed or failed
    pub details: String,
}

impl Check {
    pub fn new(check_name: impl Into<String>, passed: bool, details: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            passed,
            details: details.into(),
        }
    }
}

/// A proposed solution produced by the executor stage.
///
/// Deserialized from the backend's JSON object, whose wire field names
/// (`reasoning`, `intermediate_work`) are part of the executor's prompt
/// contract. A retry produces a new Solution, never an edit in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// The final short answer
    pub answer: String,

    /// Brief explanation of how the answer was reached
    #[serde(rename = "reasoning")]
    pub rationale: String,

    /// Detailed step-by-step working
    #[serde(rename = "intermediate_work")]
    pub work: String,
}

/// Terminal outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    /// Every check in the final accepted cycle passed
    Success,
    /// Retry budget exhausted with at least one check still failing
    Failed,
}

/// The final response from a solve call.
///
/// Assembled incrementally as stages complete; never mutated after the
/// solver returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReport {
    /// The best available answer (unverified when status is `failed`)
    pub answer: String,

    /// `success` or `failed`
    pub status: SolveStatus,

    /// Rationale shown to the user; flagged as unverified on failure
    pub reasoning_visible_to_user: String,

    /// Plan, checks and retry accounting
    pub metadata: ReportMetadata,
}

/// Diagnostic metadata attached to every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// The planner's verbatim output
    pub plan: String,

    /// The checks from the final cycle (accepted, or last failing)
    pub checks: Vec<Check>,

    /// Execute→Verify cycles beyond the first
    pub retries: u32,
}

impl AgentReport {
    /// Whether every check in the report passed.
    pub fn all_checks_passed(&self) -> bool {
        self.metadata.checks.iter().all(|c| c.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(status: SolveStatus) -> AgentReport {
        AgentReport {
            answer: "4".into(),
            status,
            reasoning_visible_to_user: "2 + 2 = 4".into(),
            metadata: ReportMetadata {
                plan: "1. Add the numbers\n2. Self-check".into(),
                checks: vec![Check::new("Arithmetic Check", true, "2 + 2 is 4")],
                retries: 0,
            },
        }
    }

    #[test]
    fn report_serializes_to_contract_shape() {
        let report = sample_report(SolveStatus::Success);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["answer"], "4");
        assert_eq!(json["status"], "success");
        assert_eq!(json["reasoning_visible_to_user"], "2 + 2 = 4");
        assert_eq!(json["metadata"]["retries"], 0);
        assert_eq!(json["metadata"]["checks"][0]["check_name"], "Arithmetic Check");
        assert_eq!(json["metadata"]["checks"][0]["passed"], true);
        assert!(json["metadata"]["plan"].as_str().unwrap().contains("Self-check"));
    }

    #[test]
    fn failed_status_serializes_lowercase() {
        let report = sample_report(SolveStatus::Failed);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "failed");
    }

    #[test]
    fn solution_deserializes_from_executor_wire_names() {
        let raw = r#"{
            "answer": "42",
            "reasoning": "multiplied 6 by 7",
            "intermediate_work": "6 * 7 = 42"
        }"#;
        let solution: Solution = serde_json::from_str(raw).unwrap();
        assert_eq!(solution.answer, "42");
        assert_eq!(solution.rationale, "multiplied 6 by 7");
        assert_eq!(solution.work, "6 * 7 = 42");
    }

    #[test]
    fn check_roundtrip() {
        let check = Check::new("Logic Check", false, "step 3 does not follow");
        let json = serde_json::to_string(&check).unwrap();
        let parsed: Check = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, check);
    }

    #[test]
    fn all_checks_passed_reflects_contents() {
        let mut report = sample_report(SolveStatus::Success);
        assert!(report.all_checks_passed());
        report
            .metadata
            .checks
            .push(Check::new("Units Check", false, "mixed meters and feet"));
        assert!(!report.all_checks_passed());
    }
}
