//! Planner stage — turns a question into a step-by-step plan.
//!
//! The plan is advisory context for the executor: it is stored verbatim and
//! never structurally validated.

/// System instructions for the planning call.
pub const PLANNER_SYSTEM: &str = "\
You are a problem-solving planner. You create clear, logical plans for \
solving word problems involving math, time, logic, and constraints.

For each question:
1. Parse and understand what is being asked
2. Identify the given information
3. Determine the operations needed
4. Plan how to arrive at the answer
5. Consider edge cases or validation needs

Keep plans concise (5-8 steps typically) but thorough.";

/// Build the planner prompt for a question.
///
/// Asks for a numbered, sequential breakdown of sub-steps culminating in a
/// self-check step.
pub fn planner_prompt(question: &str) -> String {
    format!(
        "Given the following question, create a detailed step-by-step plan to solve it.

Your plan should:
- Break down the problem into clear, logical steps
- Identify what information needs to be extracted
- Specify any calculations or logic needed
- Include a self-check step at the end

Output your plan as a numbered list of steps. Be concise but complete.

Question: {question}

Plan:"
    )
}
