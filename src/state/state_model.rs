use std::io::Cursor;

use crate::{
    agent::error::AgentError,
    driver::ui_driver::UiDriver,
    state::normalize::normalize_hierarchy,
};

/// Raw screenshot bytes as returned by the driver, plus decoded dimensions.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Screenshot {
    /// Read dimensions from the image header without decoding pixels.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, AgentError> {
        let (width, height) = image::io::Reader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| AgentError::Image(format!("format detection failed: {}", e)))?
            .into_dimensions()
            .map_err(|e| AgentError::Image(format!("could not read dimensions: {}", e)))?;

        Ok(Screenshot {
            bytes,
            width,
            height,
        })
    }

    pub fn extension(&self) -> &'static str {
        match image::guess_format(&self.bytes) {
            Ok(image::ImageFormat::Jpeg) => "jpg",
            _ => "png",
        }
    }
}

/// What the agent sees in one iteration. Not kept past the iteration.
#[derive(Debug, Clone)]
pub struct Observation {
    pub screenshot: Screenshot,
    pub hierarchy: String,
}

/// Screenshot first, then hierarchy, so both describe the same settled screen.
pub fn capture_observation(driver: &mut dyn UiDriver) -> Result<Observation, AgentError> {
    let screenshot = Screenshot::from_bytes(driver.capture_screenshot()?)?;
    let raw = driver.dump_hierarchy()?;

    Ok(Observation {
        screenshot,
        hierarchy: normalize_hierarchy(&raw),
    })
}
