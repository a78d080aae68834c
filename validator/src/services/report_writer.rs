//! Report persistence to the filesystem

use async_trait::async_trait;
use std::path::PathBuf;

use shared::{service_info, ServiceId};

use crate::core::ValidationReport;
use crate::error::ValidatorResult;
use crate::traits::ReportSink;

/// Writes `vortex-validation-<unix>.json` and `vortex-validation-report-<unix>.txt`
#[derive(Debug, Clone)]
pub struct FileReportWriter {
    output_dir: PathBuf,
}

impl FileReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn json_path(&self, report: &ValidationReport) -> PathBuf {
        self.output_dir
            .join(format!("vortex-validation-{}.json", report.started_at().timestamp()))
    }

    pub fn summary_path(&self, report: &ValidationReport) -> PathBuf {
        self.output_dir
            .join(format!("vortex-validation-report-{}.txt", report.started_at().timestamp()))
    }
}

#[async_trait]
impl ReportSink for FileReportWriter {
    async fn persist(&self, report: &ValidationReport, summary: &str) -> ValidatorResult<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let json_path = self.json_path(report);
        tokio::fs::write(&json_path, report.to_json_pretty()?).await?;

        let summary_path = self.summary_path(report);
        tokio::fs::write(&summary_path, summary).await?;

        service_info!(
            ServiceId::current(),
            "💾 Saved {} and {}",
            json_path.display(),
            summary_path.display()
        );
        Ok(vec![json_path, summary_path])
    }
}
