use crate::report::report_model::RunReport;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format a run report for terminal output.
///
/// Produces output like:
/// ```text
/// === Agent run: Find any truncated text ===
///
/// ✗ FAILED BY AGENT after 4 steps
///     [REASON] Settings screen is unreachable
///     [TRUNCATION] Step 2: title label in the top bar
///
/// === Result: fail in 9.3s ===
/// ```
pub fn format_console_report(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Agent run: {} ===\n\n", report.goal));

    let marker = if report.passed() { "\u{2713}" } else { "\u{2717}" };
    out.push_str(&format!(
        "{} {} after {} step{}\n",
        marker,
        report.status_label(),
        report.outcome.steps,
        if report.outcome.steps == 1 { "" } else { "s" }
    ));

    if let Some(ref reason) = report.outcome.reason {
        out.push_str(&format!("    [REASON] {}\n", reason));
    }

    for finding in &report.truncation_findings {
        out.push_str(&format!(
            "    [TRUNCATION] Step {}: {}\n",
            finding.step,
            finding.location.as_deref().unwrap_or("location not described")
        ));
    }

    out.push_str(&format!(
        "\n=== Result: {}",
        if report.passed() { "pass" } else { "fail" }
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}
