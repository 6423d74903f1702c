use crate::core::fees::{read_checkouts, render_report, FeesCalculator};
use crate::core::{CheckoutRecord, ConfigProvider, FeeReport, Pipeline, Storage};
use crate::utils::error::Result;

pub struct FeesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> FeesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FeesPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<CheckoutRecord>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading checkouts from {}", self.storage.resolve(input_path));

        let data = self.storage.read_file(input_path).await?;
        read_checkouts(data.as_slice())
    }

    async fn transform(&self, records: Vec<CheckoutRecord>) -> Result<FeeReport> {
        let ledger = FeesCalculator::from_records(&records);
        let rows = ledger.rows(self.config.report_order());

        tracing::debug!(
            "{} checkouts, {} patrons, {} in fees",
            records.len(),
            ledger.len(),
            ledger.total()
        );
        Ok(FeeReport { ledger, rows })
    }

    async fn load(&self, report: FeeReport) -> Result<String> {
        let format = self.config.output_format();
        let output_path = self.config.output_path();

        let data = render_report(&report.rows, format)?;
        self.storage.write_file(output_path, &data).await?;

        Ok(self.storage.resolve(output_path))
    }
}
