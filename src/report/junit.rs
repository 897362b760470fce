use crate::{agent::agent_model::Termination, report::report_model::RunReport};

// ============================================================================
// JUnit XML reporter — lets a CI harness decide pass/fail
// ============================================================================

/// Render one agent run as a single-testcase JUnit suite.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="vlm-explorer" tests="1" failures="1" time="9.300">
///   <testcase name="Find any truncated text" classname="vlm-explorer">
///     <failure message="agent timed out after 15 steps" type="TimedOut">...</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &RunReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let findings = report
        .truncation_findings
        .iter()
        .map(|f| {
            format!(
                "Step {}: truncated text at {}",
                f.step,
                f.location.as_deref().unwrap_or("unknown location")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let system_out = if findings.is_empty() {
        String::new()
    } else {
        format!("    <system-out>{}</system-out>\n", escape_xml(&findings))
    };

    let case = if report.passed() {
        if system_out.is_empty() {
            format!(
                "  <testcase name=\"{}\" classname=\"vlm-explorer\" />\n",
                escape_xml(&report.goal)
            )
        } else {
            format!(
                "  <testcase name=\"{}\" classname=\"vlm-explorer\">\n{}  </testcase>\n",
                escape_xml(&report.goal),
                system_out
            )
        }
    } else {
        let failure_type = match report.outcome.termination {
            Termination::AgentFailure => "AgentDeclaredFailure",
            _ => "TimedOut",
        };
        let message = report
            .outcome
            .reason
            .as_deref()
            .unwrap_or("agent did not reach the goal");

        format!(
            "  <testcase name=\"{name}\" classname=\"vlm-explorer\">\n    <failure message=\"{message}\" type=\"{kind}\">{steps} step(s) run</failure>\n{out}  </testcase>\n",
            name = escape_xml(&report.goal),
            message = escape_xml(message),
            kind = failure_type,
            steps = report.outcome.steps,
            out = system_out,
        )
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"vlm-explorer\" tests=\"1\" failures=\"{failures}\"{time}>\n{case}</testsuite>\n",
        failures = if report.passed() { 0 } else { 1 },
        time = time_attr,
        case = case,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
