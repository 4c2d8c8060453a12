mod memory_report_store;
mod pg_report_store;
mod report_store;

pub use memory_report_store::InMemoryReportStore;
pub use pg_report_store::PgReportStore;
pub use report_store::{ReportStore, INSERT_CHANNEL_CAPACITY};
