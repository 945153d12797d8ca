//! Report generation port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::AnalyticsError;

/// Port for writing analysis reports.
pub trait ReportPort {
    fn render(&self, result: &AnalysisResult) -> String;

    /// Default implementation: writes `render` output to `output_path`.
    fn write(&self, result: &AnalysisResult, output_path: &str) -> Result<(), AnalyticsError> {
        std::fs::write(output_path, self.render(result))?;
        Ok(())
    }
}
