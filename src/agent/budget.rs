use crate::agent::error::AgentError;

#[derive(Debug, PartialEq)]
pub enum BudgetDecision {
    Allow,
    Block(&'static str),
}

/// Step budget: the only guard against a model that oscillates between screens.
pub fn check_step_budget(step: u32, max_steps: u32) -> BudgetDecision {
    if step >= max_steps {
        return BudgetDecision::Block("step_budget_exhausted");
    }
    BudgetDecision::Allow
}

/// Retry budget for a single model call. Only transient errors may spend it.
pub fn check_retry_budget(error: &AgentError, retries_remaining: u32) -> BudgetDecision {
    if !error.is_transient() {
        return BudgetDecision::Block("not_retryable");
    }
    if retries_remaining == 0 {
        return BudgetDecision::Block("retry_budget_exhausted");
    }
    BudgetDecision::Allow
}
