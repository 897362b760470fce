use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use crate::agent::error::AgentError;
use crate::driver::ui_driver::{ElementCategory, UiDriver};

/// Request sent to the driver process over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DriverRequest {
    Screenshot,
    Hierarchy,
    Exists {
        category: ElementCategory,
        id: String,
    },
    Tap {
        category: ElementCategory,
        id: String,
    },
    Type {
        text: String,
    },
    Quit,
}

impl DriverRequest {
    pub fn name(&self) -> &'static str {
        match self {
            DriverRequest::Screenshot => "screenshot",
            DriverRequest::Hierarchy => "hierarchy",
            DriverRequest::Exists { .. } => "exists",
            DriverRequest::Tap { .. } => "tap",
            DriverRequest::Type { .. } => "type",
            DriverRequest::Quit => "quit",
        }
    }
}

/// Response read from the driver process over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct DriverResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    /// Base64 screenshot bytes (PNG or JPEG)
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub exists: Option<bool>,
}

/// A UI driver backed by a long-lived helper process.
///
/// The helper owns the device/simulator connection; commands are NDJSON on
/// stdin and each gets exactly one NDJSON response line on stdout.
pub struct ProcessDriver {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    command: String,
    closed: bool,
}

impl ProcessDriver {
    /// Spawn the helper and wait for its `{"ok":true,"ready":true}` line.
    pub fn launch(command: &str, args: &[String]) -> Result<Self, AgentError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AgentError::DriverSpawn {
                command: command.to_string(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgentError::DriverIo(format!("failed to capture stdin of {}", command)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::DriverIo(format!("failed to capture stdout of {}", command)))?;

        let mut driver = ProcessDriver {
            child,
            stdin,
            reader: BufReader::new(stdout),
            command: command.to_string(),
            closed: false,
        };

        let ready = driver
            .read_response()
            .map(|r| r.ok && r.ready == Some(true));
        if !matches!(ready, Ok(true)) {
            driver.closed = true;
            let _ = driver.child.kill();
            let _ = driver.child.wait();
            return Err(ready.err().unwrap_or_else(|| AgentError::DriverProtocol {
                command: "launch".into(),
                error: format!("did not receive ready signal from {}", driver.command),
            }));
        }

        tracing::info!(command, "UI driver ready");
        Ok(driver)
    }

    fn read_response(&mut self) -> Result<DriverResponse, AgentError> {
        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            AgentError::DriverIo(format!("failed to read from {} stdout: {}", self.command, e))
        })?;

        if line.trim().is_empty() {
            return Err(AgentError::DriverIo(format!(
                "empty response from {} (process may have died)",
                self.command
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| AgentError::Json {
            context: format!("{} response", self.command),
            source: e,
        })
    }

    fn send(&mut self, request: &DriverRequest) -> Result<DriverResponse, AgentError> {
        let json = serde_json::to_string(request).map_err(|e| AgentError::Json {
            context: "DriverRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| {
                AgentError::DriverIo(format!("failed to write to {} stdin: {}", self.command, e))
            })?;

        let response = self.read_response()?;
        if !response.ok {
            return Err(AgentError::DriverProtocol {
                command: request.name().into(),
                error: response.error.unwrap_or_else(|| "unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Ask the helper to exit. Best effort.
    pub fn quit(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.send(&DriverRequest::Quit);
        let _ = self.child.wait();
    }
}

impl UiDriver for ProcessDriver {
    fn capture_screenshot(&mut self) -> Result<Vec<u8>, AgentError> {
        let response = self.send(&DriverRequest::Screenshot)?;
        let data = response.data.ok_or_else(|| AgentError::DriverProtocol {
            command: "screenshot".into(),
            error: "no data in screenshot response".into(),
        })?;

        BASE64.decode(data.trim()).map_err(|e| AgentError::DriverProtocol {
            command: "screenshot".into(),
            error: format!("screenshot is not valid base64: {}", e),
        })
    }

    fn dump_hierarchy(&mut self) -> Result<String, AgentError> {
        let response = self.send(&DriverRequest::Hierarchy)?;
        response.text.ok_or_else(|| AgentError::DriverProtocol {
            command: "hierarchy".into(),
            error: "no text in hierarchy response".into(),
        })
    }

    fn element_exists(&mut self, category: ElementCategory, id: &str) -> Result<bool, AgentError> {
        let response = self.send(&DriverRequest::Exists {
            category,
            id: id.to_string(),
        })?;
        Ok(response.exists.unwrap_or(false))
    }

    fn tap(&mut self, category: ElementCategory, id: &str) -> Result<(), AgentError> {
        self.send(&DriverRequest::Tap {
            category,
            id: id.to_string(),
        })?;
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), AgentError> {
        self.send(&DriverRequest::Type {
            text: text.to_string(),
        })?;
        Ok(())
    }
}

impl Drop for ProcessDriver {
    fn drop(&mut self) {
        self.quit();
    }
}
