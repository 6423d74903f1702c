use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a pipeline's extract, transform and load phases in order.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Returns where the report was written. A failing phase stops the run before anything is written.
    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting late fee report");

        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} checkout records", records.len());

        let report = self.pipeline.transform(records).await?;
        tracing::info!(
            "Computed fees for {} patrons (total {})",
            report.ledger.len(),
            report.ledger.total()
        );

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to {} in {:?}", output_path, started.elapsed());

        Ok(output_path)
    }
}
