//! Plain-text analysis report.
//!
//! Assembles the summary header, the rated metrics table, monthly returns and
//! the rolling beta summary into one document.

pub mod rating;
pub mod tables;

use crate::domain::analysis::AnalysisResult;
use crate::domain::formatting::FormattedMetrics;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy)]
pub struct TextReportAdapter {
    /// Include the per-month returns table.
    pub monthly: bool,
}

impl TextReportAdapter {
    pub fn new() -> Self {
        Self { monthly: true }
    }

    pub fn summary_only() -> Self {
        Self { monthly: false }
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.len()));
    out.push('\n');
}

impl ReportPort for TextReportAdapter {
    fn render(&self, result: &AnalysisResult) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} vs {}\n",
            result.portfolio_name(),
            result.benchmark_name()
        ));
        out.push_str(&tables::render_summary(result));

        heading(&mut out, "Metrics");
        let formatted = FormattedMetrics::from(result.metrics());
        out.push_str(&tables::render_metrics_table(&formatted));

        heading(&mut out, "Rolling beta");
        out.push_str(&tables::format_rolling_summary(result.rolling()));

        if self.monthly {
            heading(&mut out, "Monthly returns");
            let months = tables::compute_monthly_returns(result.aligned());
            out.push_str(&tables::format_monthly_returns(&months));
        }
        out
    }
}
