mod report;
mod submission;

pub use report::{CreateReport, Report};
pub use submission::{NewReport, PhotoUpload, ReportDetails, ReportSubmission};
