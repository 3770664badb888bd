pub mod layout;
pub mod writer;

pub use layout::ReportLayout;
pub use writer::{report_file_name, write_report};
