use std::thread;

use crate::{
    agent::{
        agent_model::{ActionKind, Decision, LoopConfig, LoopState, RunOutcome, Termination},
        ai_model::DecisionClient,
        budget::{BudgetDecision, check_retry_budget, check_step_budget},
        error::AgentError,
        executor::execute_decision,
    },
    driver::ui_driver::UiDriver,
    state::state_model::{Observation, capture_observation},
    trace::{logger::StepRecorder, trace::StepRecord},
};

/// The perceive → decide → act loop.
///
/// Owns the loop state and the step budget; the model client and the step
/// sink are injected so tests can script both.
pub struct Agent<'a> {
    pub state: LoopState,
    goal: String,
    config: LoopConfig,
    client: &'a dyn DecisionClient,
    recorder: &'a dyn StepRecorder,
}

impl<'a> Agent<'a> {
    pub fn new(
        goal: &str,
        config: LoopConfig,
        client: &'a dyn DecisionClient,
        recorder: &'a dyn StepRecorder,
    ) -> Self {
        Agent {
            state: LoopState::Running(1),
            goal: goal.to_string(),
            config,
            client,
            recorder,
        }
    }

    /// Run one iteration from `Running(n)`. A no-op once terminal.
    pub fn step(&mut self, driver: &mut dyn UiDriver) -> Result<&LoopState, AgentError> {
        let LoopState::Running(step) = self.state else {
            return Ok(&self.state);
        };

        tracing::info!(step, "--- step ---");

        let observation = capture_observation(driver)?;
        let decision = self.decide(&observation)?;
        tracing::info!(step, action = ?decision.action_kind, reasoning = %decision.reasoning, "decision");

        self.recorder.record(
            StepRecord::new(step, &decision, &observation.hierarchy),
            &observation.screenshot,
        );

        let execution = execute_decision(&decision, driver)?;
        tracing::debug!(step, ?execution, "executed");

        if !self.config.settle_delay.is_zero() {
            thread::sleep(self.config.settle_delay);
        }

        self.state = next_state(step, &decision, self.config.max_steps);
        Ok(&self.state)
    }

    /// Ask the client, retrying transport failures within the retry budget.
    fn decide(&self, observation: &Observation) -> Result<Decision, AgentError> {
        let mut retries_remaining = self.config.transport_retries;
        loop {
            match self.client.decide(observation, &self.goal) {
                Ok(decision) => return Ok(decision),
                Err(e) => match check_retry_budget(&e, retries_remaining) {
                    BudgetDecision::Allow => {
                        retries_remaining -= 1;
                        tracing::warn!(retries_remaining, "model call failed, retrying: {}", e);
                    }
                    BudgetDecision::Block(_) => return Err(e),
                },
            }
        }
    }

    /// Drive the loop to a terminal state.
    pub fn run(&mut self, driver: &mut dyn UiDriver) -> Result<RunOutcome, AgentError> {
        tracing::info!(goal = %self.goal, max_steps = self.config.max_steps, "agent started");

        let mut steps = 0;
        while let LoopState::Running(step) = self.state {
            steps = step;
            self.step(driver)?;
        }

        let outcome = RunOutcome {
            termination: self.state.termination().unwrap_or(Termination::Timeout),
            steps,
            reason: match &self.state {
                LoopState::FailedByAgent(reason) => Some(reason.clone()),
                LoopState::TimedOut => Some(format!("agent timed out after {} steps", steps)),
                _ => None,
            },
        };

        tracing::info!(termination = ?outcome.termination, steps, "agent finished");
        Ok(outcome)
    }
}

/// Transition out of `Running(step)` once the decision has been acted on.
pub fn next_state(step: u32, decision: &Decision, max_steps: u32) -> LoopState {
    match decision.action_kind {
        ActionKind::Done => LoopState::Succeeded,
        ActionKind::Fail => LoopState::FailedByAgent(decision.reasoning.clone()),
        _ => match check_step_budget(step, max_steps) {
            BudgetDecision::Allow => LoopState::Running(step + 1),
            BudgetDecision::Block(_) => LoopState::TimedOut,
        },
    }
}
