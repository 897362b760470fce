use serde::Serialize;

use crate::{
    agent::{
        agent_model::{ActionKind, Decision},
        error::AgentError,
    },
    driver::ui_driver::{ElementCategory, UiDriver},
};

/// Categories probed, in priority order, when resolving a tap target.
pub const TAP_PROBE_ORDER: [ElementCategory; 4] = [
    ElementCategory::Button,
    ElementCategory::StaticText,
    ElementCategory::Image,
    ElementCategory::Other,
];

/// What the executor did with a decision. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Execution {
    Tapped { category: ElementCategory, id: String },
    Typed { chars: usize },
    ElementNotFound { id: String },
    /// Nothing to act on (missing id/text, or an unknown action)
    Skipped,
    /// Done or Fail: no UI action
    Terminal,
}

/// First category in `order` where the driver reports `id` exists.
pub fn resolve_element(
    driver: &mut dyn UiDriver,
    id: &str,
    order: &[ElementCategory],
) -> Result<Option<ElementCategory>, AgentError> {
    for &category in order {
        if driver.element_exists(category, id)? {
            return Ok(Some(category));
        }
    }
    Ok(None)
}

/// Perform at most one UI interaction for `decision`.
pub fn execute_decision(decision: &Decision, driver: &mut dyn UiDriver) -> Result<Execution, AgentError> {
    match decision.action_kind {
        ActionKind::Tap => {
            let Some(id) = decision.element_id.as_deref() else {
                tracing::info!("tap without elementID, nothing to do");
                return Ok(Execution::Skipped);
            };

            match resolve_element(driver, id, &TAP_PROBE_ORDER)? {
                Some(category) => {
                    tracing::info!(id, category = category.as_str(), "tapping");
                    driver.tap(category, id)?;
                    Ok(Execution::Tapped {
                        category,
                        id: id.to_string(),
                    })
                }
                None => {
                    tracing::warn!(id, "could not find element");
                    Ok(Execution::ElementNotFound { id: id.to_string() })
                }
            }
        }

        ActionKind::Type => {
            let Some(text) = decision.text.as_deref() else {
                tracing::info!("type without text, nothing to do");
                return Ok(Execution::Skipped);
            };

            tracing::info!(chars = text.chars().count(), "typing into focused element");
            driver.type_text(text)?;
            Ok(Execution::Typed {
                chars: text.chars().count(),
            })
        }

        ActionKind::Done | ActionKind::Fail => Ok(Execution::Terminal),

        ActionKind::Unknown => {
            tracing::info!("unrecognized action type, skipping");
            Ok(Execution::Skipped)
        }
    }
}
