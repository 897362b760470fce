use std::path::Path;

use crate::agent::error::AgentError;
use crate::driver::ui_driver::{ElementCategory, UiDriver};

/// Static driver over a saved screenshot and hierarchy dump.
///
/// Used for one-shot offline decisions: it answers observation calls from the
/// files and ignores interactions.
pub struct FileDriver {
    screenshot: Vec<u8>,
    hierarchy: String,
}

impl FileDriver {
    pub fn new(screenshot: Vec<u8>, hierarchy: String) -> Self {
        Self {
            screenshot,
            hierarchy,
        }
    }

    pub fn open(screenshot: &Path, hierarchy: &Path) -> Result<Self, AgentError> {
        let bytes = std::fs::read(screenshot).map_err(|e| AgentError::Io {
            context: format!("reading screenshot {}", screenshot.display()),
            source: e,
        })?;
        let text = std::fs::read_to_string(hierarchy).map_err(|e| AgentError::Io {
            context: format!("reading hierarchy {}", hierarchy.display()),
            source: e,
        })?;
        Ok(Self::new(bytes, text))
    }
}

impl UiDriver for FileDriver {
    fn capture_screenshot(&mut self) -> Result<Vec<u8>, AgentError> {
        Ok(self.screenshot.clone())
    }

    fn dump_hierarchy(&mut self) -> Result<String, AgentError> {
        Ok(self.hierarchy.clone())
    }

    fn element_exists(&mut self, _category: ElementCategory, id: &str) -> Result<bool, AgentError> {
        let quoted = format!("'{}'", id);
        Ok(self.hierarchy.lines().any(|line| line.contains(&quoted)))
    }

    fn tap(&mut self, category: ElementCategory, id: &str) -> Result<(), AgentError> {
        tracing::info!(category = category.as_str(), id, "offline driver: tap ignored");
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), AgentError> {
        tracing::info!(chars = text.chars().count(), "offline driver: typing ignored");
        Ok(())
    }
}
