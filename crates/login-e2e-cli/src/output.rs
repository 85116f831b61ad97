//! Report and listing output

use crate::commands::FormatArg;
use crate::error::CliResult;
use console::Style;
use login_e2e::{Scenario, ScenarioStatus, SuiteReport};
use std::fmt::Write as _;

/// Renders reports in the selected format
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    format: FormatArg,
    use_color: bool,
}

impl ReportRenderer {
    /// Create a renderer
    #[must_use]
    pub const fn new(format: FormatArg, use_color: bool) -> Self {
        Self { format, use_color }
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.use_color)
    }

    /// Render a finished suite run
    pub fn render(&self, report: &SuiteReport) -> CliResult<String> {
        match self.format {
            FormatArg::Json => Ok(report.to_json()?),
            FormatArg::Text => Ok(self.render_text(report)),
        }
    }

    fn render_text(&self, report: &SuiteReport) -> String {
        let green = self.style(Style::new().green());
        let red = self.style(Style::new().red());
        let dim = self.style(Style::new().dim());
        let bold = self.style(Style::new().bold());

        let mut out = String::new();
        for outcome in &report.scenarios {
            let (mark, style) = match outcome.status {
                ScenarioStatus::Passed => ("✓", &green),
                ScenarioStatus::Failed => ("✗", &red),
                ScenarioStatus::Skipped => ("-", &dim),
            };
            let _ = writeln!(
                out,
                "  {} {} {}",
                style.apply_to(mark),
                outcome.name,
                dim.apply_to(format!("({}ms)", outcome.duration.as_millis()))
            );
            if let Some(error) = &outcome.error {
                let _ = writeln!(out, "      {}", red.apply_to(error));
            }
        }

        let summary = report.summary();
        let summary = if report.is_success() {
            green.apply_to(summary)
        } else {
            red.apply_to(summary)
        };
        let _ = writeln!(out, "\n{} {summary}", bold.apply_to("Result:"));
        out
    }

    /// Render the scenario catalogue, optionally narrowed by a name filter
    pub fn render_list(&self, filter: Option<&str>) -> CliResult<String> {
        let scenarios: Vec<Scenario> = Scenario::ALL
            .into_iter()
            .filter(|s| filter.map_or(true, |f| s.name().contains(f)))
            .collect();

        match self.format {
            FormatArg::Json => {
                let entries: Vec<_> = scenarios
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "name": s.name(),
                            "description": s.description(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries).map_err(login_e2e::LoginE2eError::from)?)
            }
            FormatArg::Text => {
                let bold = self.style(Style::new().bold());
                let mut out = String::new();
                for s in scenarios {
                    let _ = writeln!(out, "{:<28} {}", bold.apply_to(s.name()), s.description());
                }
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use login_e2e::ScenarioOutcome;
    use std::time::Duration;

    fn report() -> SuiteReport {
        let mut report = SuiteReport::new();
        report.push(ScenarioOutcome::passed(
            "successful_login",
            Duration::from_millis(1200),
        ));
        report.push(ScenarioOutcome::failed(
            "invalid_credentials",
            Duration::from_millis(300),
            "Assertion failed: error banner not found",
        ));
        report
    }

    #[test]
    fn test_text_report_without_color() {
        let text = ReportRenderer::new(FormatArg::Text, false)
            .render(&report())
            .unwrap();
        assert!(text.contains("✓ successful_login (1200ms)"));
        assert!(text.contains("✗ invalid_credentials"));
        assert!(text.contains("error banner not found"));
        assert!(text.contains("Result: 1 passed, 1 failed, 0 skipped"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_json_report() {
        let json = ReportRenderer::new(FormatArg::Json, true)
            .render(&report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scenarios"][1]["status"], "failed");
    }

    #[test]
    fn test_list_filtered() {
        let text = ReportRenderer::new(FormatArg::Text, false)
            .render_list(Some("mobile"))
            .unwrap();
        assert!(text.contains("successful_mobile_login"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_list_json() {
        let json = ReportRenderer::new(FormatArg::Json, false)
            .render_list(None)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 4);
        assert_eq!(value[3]["name"], "cookie_banner_blocks_login");
    }
}
