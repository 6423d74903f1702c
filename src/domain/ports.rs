use crate::domain::model::{CheckoutRecord, FeeReport, OutputFormat, ReportOrder};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Either the whole file is written or the destination is left untouched.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where `path` ends up, for reporting back to the user.
    fn resolve(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn report_order(&self) -> ReportOrder;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<CheckoutRecord>>;
    async fn transform(&self, records: Vec<CheckoutRecord>) -> Result<FeeReport>;
    async fn load(&self, report: FeeReport) -> Result<String>;
}
