//! The solve loop — an explicit finite-state machine over the
//! Plan → Execute → Verify pipeline.
//!
//! Transitions:
//!
//! ```text
//! PLANNING → EXECUTING → VERIFYING → ACCEPTED
//!                ↑            │
//!                └─ RETRYING ←┤  (budget remains)
//!                             └→ EXHAUSTED  (budget spent)
//! ```
//!
//! The planner runs exactly once; a backend error there is fatal to the
//! whole call. Every later failure (backend error, malformed output,
//! failing checks) is one failed cycle, consuming one unit of retry
//! budget. With `max_retries = k` the loop runs at most `k + 1` cycles and
//! makes between 3 and `3 + 2k` backend calls.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use veristep_core::backend::{GenerationRequest, Provider};
use veristep_core::error::{Error, Result};
use veristep_core::report::{AgentReport, Check, ReportMetadata, Solution, SolveStatus};

use crate::executor::{self, EXECUTOR_SYSTEM};
use crate::planner::{PLANNER_SYSTEM, planner_prompt};
use crate::stage::StageError;
use crate::verifier::{self, VERIFIER_SYSTEM};

/// Default Execute→Verify retry budget beyond the first cycle.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// States of one solve call.
///
/// `Verifying` owns the cycle's solution so a failed verification can still
/// surface the proposed answer in the final report.
#[derive(Debug)]
pub enum SolveState {
    /// Build the plan (runs once, failures are fatal)
    Planning,
    /// Produce a structured solution for the current cycle
    Executing,
    /// Check the cycle's solution
    Verifying(Solution),
    /// A cycle failed and budget remains
    Retrying,
    /// Terminal: all checks of the final cycle passed
    Accepted,
    /// Terminal: budget spent with verification still failing
    Exhausted,
}

/// The orchestrator: runs the pipeline against a generation backend.
///
/// Each `solve` call owns its plan, solutions, checks and retry counter for
/// its whole lifetime; concurrent calls on the same `Solver` share nothing
/// but the backend handle.
pub struct Solver {
    /// The generation backend
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Sampling temperature for every stage
    temperature: f32,

    /// Default max tokens per completion
    max_tokens: Option<u32>,

    /// Extra Execute→Verify cycles allowed beyond the first
    max_retries: u32,
}

impl Solver {
    /// Create a new solver.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 1.0,
            max_tokens: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per completion.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Solve a question through the full pipeline.
    ///
    /// Returns `Err` only for an empty question or a planning-stage backend
    /// failure; every other outcome is an `Ok` report whose `status` says
    /// whether the final cycle verified.
    pub async fn solve(&self, question: &str) -> Result<AgentReport> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let run_id = Uuid::new_v4();
        info!(%run_id, max_retries = self.max_retries, "Solve starting");

        let mut retries = 0u32;
        let mut plan = String::new();
        let mut best: Option<Solution> = None;
        let mut last_checks: Vec<Check> = Vec::new();
        let mut state = SolveState::Planning;

        let status = loop {
            state = match state {
                SolveState::Planning => {
                    plan = self.plan(question).await?;
                    debug!(%run_id, plan_chars = plan.len(), "Plan ready");
                    SolveState::Executing
                }

                SolveState::Executing => match self.execute(question, &plan).await {
                    Ok(solution) => SolveState::Verifying(solution),
                    Err(e) => {
                        warn!(%run_id, error = %e, "Execute stage failed");
                        last_checks.clear();
                        self.next_after_failed_cycle(&mut retries)
                    }
                },

                SolveState::Verifying(solution) => {
                    let next = match self.verify(question, &solution).await {
                        Ok(checks) => {
                            let accepted = verifier::passed_overall(&checks);
                            last_checks = checks;
                            if accepted {
                                SolveState::Accepted
                            } else {
                                debug!(%run_id, "Verification rejected the solution");
                                self.next_after_failed_cycle(&mut retries)
                            }
                        }
                        Err(e) => {
                            warn!(%run_id, error = %e, "Verify stage failed");
                            last_checks.clear();
                            self.next_after_failed_cycle(&mut retries)
                        }
                    };
                    best = Some(solution);
                    next
                }

                SolveState::Retrying => {
                    debug!(%run_id, retries, "Starting retry cycle");
                    SolveState::Executing
                }

                SolveState::Accepted => break SolveStatus::Success,
                SolveState::Exhausted => break SolveStatus::Failed,
            };
        };

        info!(%run_id, ?status, retries, "Solve finished");

        let report = match (status, best) {
            (SolveStatus::Success, Some(solution)) => AgentReport {
                answer: solution.answer,
                status: SolveStatus::Success,
                reasoning_visible_to_user: solution.rationale,
                metadata: ReportMetadata {
                    plan,
                    checks: last_checks,
                    retries,
                },
            },
            (_, Some(solution)) => {
                let reasoning = unverified_reasoning(&solution, &last_checks, retries);
                AgentReport {
                    answer: solution.answer,
                    status: SolveStatus::Failed,
                    reasoning_visible_to_user: reasoning,
                    metadata: ReportMetadata {
                        plan,
                        checks: last_checks,
                        retries,
                    },
                }
            }
            (_, None) => AgentReport {
                answer: String::new(),
                status: SolveStatus::Failed,
                reasoning_visible_to_user: format!(
                    "No solution could be extracted: every execute cycle failed ({retries} retries used)."
                ),
                metadata: ReportMetadata {
                    plan,
                    checks: last_checks,
                    retries,
                },
            },
        };

        Ok(report)
    }

    /// One failed Execute→Verify cycle: spend a retry unit or give up.
    fn next_after_failed_cycle(&self, retries: &mut u32) -> SolveState {
        if *retries < self.max_retries {
            *retries += 1;
            SolveState::Retrying
        } else {
            SolveState::Exhausted
        }
    }

    async fn plan(&self, question: &str) -> Result<String> {
        let request = self.request(planner_prompt(question), PLANNER_SYSTEM);
        let response = self.provider.generate(request).await?;
        Ok(response.text)
    }

    async fn execute(
        &self,
        question: &str,
        plan: &str,
    ) -> std::result::Result<Solution, StageError> {
        let request = self.request(executor::executor_prompt(question, plan), EXECUTOR_SYSTEM);
        let response = self.provider.generate(request).await?;
        Ok(executor::parse_solution(&response.text)?)
    }

    async fn verify(
        &self,
        question: &str,
        solution: &Solution,
    ) -> std::result::Result<Vec<Check>, StageError> {
        let request = self.request(verifier::verifier_prompt(question, solution), VERIFIER_SYSTEM);
        let response = self.provider.generate(request).await?;
        Ok(verifier::parse_checks(&response.text)?)
    }

    fn request(&self, prompt: String, system: &str) -> GenerationRequest {
        let mut request = GenerationRequest::new(&self.model, prompt)
            .with_system(system)
            .with_temperature(self.temperature);
        if let Some(max) = self.max_tokens {
            request = request.with_max_tokens(max);
        }
        request
    }
}

/// Compose the user-visible reasoning for an exhausted solve.
fn unverified_reasoning(solution: &Solution, checks: &[Check], retries: u32) -> String {
    let failing: Vec<String> = checks
        .iter()
        .filter(|c| !c.passed)
        .take(3)
        .map(|c| format!("{}: {}", c.check_name, c.details))
        .collect();

    let issues = if failing.is_empty() {
        "the verifier produced no usable checks".to_string()
    } else {
        failing.join("; ")
    };

    format!(
        "Unverified: {}. Verification did not pass after {retries} retries. Outstanding issues: {issues}",
        solution.rationale
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────
