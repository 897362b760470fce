use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    agent::agent_model::Decision,
    state::normalize::{PREVIEW_LIMIT, hierarchy_fingerprint, hierarchy_preview},
};

/// One entry of the decision trail.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub timestamp_ms: u128,
    pub step: u32,
    pub decision: Decision,
    pub hierarchy_preview: String,
    /// SHA-1 of the full normalized hierarchy; equal values mean the same screen
    pub hierarchy_fingerprint: String,
    pub screenshot_path: Option<String>,
}

impl StepRecord {
    pub fn new(step: u32, decision: &Decision, hierarchy: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            decision: decision.clone(),
            hierarchy_preview: hierarchy_preview(hierarchy, PREVIEW_LIMIT),
            hierarchy_fingerprint: hierarchy_fingerprint(hierarchy),
            screenshot_path: None,
        }
    }

    pub fn with_screenshot_path(mut self, path: impl ToString) -> Self {
        self.screenshot_path = Some(path.to_string());
        self
    }

    /// Human-readable analysis block for reviewers.
    pub fn render_text(&self) -> String {
        let d = &self.decision;
        format!(
            "Decision: {:?} -> {}\nReasoning: {}\n--------------------------------------------------\nTruncation Status: {}\nLocation: {}\n--------------------------------------------------\nHierarchy Sample:\n{}",
            d.action_kind,
            d.element_id.as_deref().or(d.text.as_deref()).unwrap_or("nil"),
            d.reasoning,
            if d.has_truncated_text {
                "Truncated Text Detected"
            } else {
                "No Truncation"
            },
            d.visual_description.as_deref().unwrap_or("N/A"),
            self.hierarchy_preview
        )
    }
}
