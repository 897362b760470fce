use serde::{Deserialize, Serialize};

use crate::agent::error::AgentError;

/// Element category the driver can be asked to look an identifier up in.
/// Text fields are never tap targets; typing goes to the focused element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Button,
    StaticText,
    Image,
    Other,
}

impl ElementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Button => "button",
            ElementCategory::StaticText => "static_text",
            ElementCategory::Image => "image",
            ElementCategory::Other => "other",
        }
    }
}

/// Handle to the application under test.
///
/// Every call is a round trip to the real UI, so errors here are
/// infrastructure failures, not agent decisions.
pub trait UiDriver {
    fn capture_screenshot(&mut self) -> Result<Vec<u8>, AgentError>;

    fn dump_hierarchy(&mut self) -> Result<String, AgentError>;

    fn element_exists(&mut self, category: ElementCategory, id: &str) -> Result<bool, AgentError>;

    fn tap(&mut self, category: ElementCategory, id: &str) -> Result<(), AgentError>;

    /// Keystrokes go to whichever element currently has focus.
    fn type_text(&mut self, text: &str) -> Result<(), AgentError>;
}
