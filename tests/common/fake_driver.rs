use vlm_explorer::{AgentError, ElementCategory, UiDriver};

use super::{RAW_HIERARCHY, png};

#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Screenshot,
    Hierarchy,
    Exists(ElementCategory, String),
    Tap(ElementCategory, String),
    Type(String),
}

/// In-memory UI driver that records every call it receives.
pub struct FakeDriver {
    pub screenshot: Vec<u8>,
    pub hierarchy: String,
    pub elements: Vec<(ElementCategory, String)>,
    pub calls: Vec<DriverCall>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            screenshot: png(40, 80),
            hierarchy: RAW_HIERARCHY.to_string(),
            elements: vec![],
            calls: vec![],
        }
    }

    pub fn with_element(mut self, category: ElementCategory, id: &str) -> Self {
        self.elements.push((category, id.to_string()));
        self
    }

    pub fn taps(&self) -> Vec<(ElementCategory, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Tap(cat, id) => Some((*cat, id.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn typed(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Type(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    /// Calls with a UI side effect (taps and typing).
    pub fn interactions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::Tap(..) | DriverCall::Type(_)))
            .count()
    }

    pub fn screenshots_taken(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::Screenshot))
            .count()
    }
}

impl UiDriver for FakeDriver {
    fn capture_screenshot(&mut self) -> Result<Vec<u8>, AgentError> {
        self.calls.push(DriverCall::Screenshot);
        Ok(self.screenshot.clone())
    }

    fn dump_hierarchy(&mut self) -> Result<String, AgentError> {
        self.calls.push(DriverCall::Hierarchy);
        Ok(self.hierarchy.clone())
    }

    fn element_exists(&mut self, category: ElementCategory, id: &str) -> Result<bool, AgentError> {
        self.calls.push(DriverCall::Exists(category, id.to_string()));
        Ok(self
            .elements
            .iter()
            .any(|(c, e)| *c == category && e == id))
    }

    fn tap(&mut self, category: ElementCategory, id: &str) -> Result<(), AgentError> {
        self.calls.push(DriverCall::Tap(category, id.to_string()));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), AgentError> {
        self.calls.push(DriverCall::Type(text.to_string()));
        Ok(())
    }
}
