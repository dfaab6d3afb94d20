//! The Veristep solver — a Plan → Execute → Verify loop with bounded retry.
//!
//! One `solve` call runs:
//!
//! 1. **Plan** (once): ask the backend for a numbered breakdown of the
//!    question, ending in a self-check step. Stored verbatim, never parsed.
//! 2. **Execute**: ask the backend to follow the plan and emit one JSON
//!    object with the answer, reasoning, and intermediate work.
//! 3. **Verify**: ask the backend to check the proposed solution across
//!    five categories and emit a JSON array of pass/fail checks.
//!
//! If any check fails (or a stage's output can't be extracted), the
//! Execute→Verify cycle repeats, up to `max_retries` extra cycles. The
//! final report always carries the best available answer, the last cycle's
//! checks, and the retry count — never a bare error (planning-stage backend
//! failures and configuration errors excepted, which surface to the caller).

pub mod executor;
pub mod planner;
pub mod solver;
pub mod stage;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use solver::{Solver, SolveState, DEFAULT_MAX_RETRIES};
pub use stage::StageError;
