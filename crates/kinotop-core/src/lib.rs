pub mod sort;
pub mod export;
pub mod pipeline;

pub use sort::sort_by_year_desc;
pub use export::{write_workbook, ExportError};
pub use pipeline::{export_records, ScrapeSummary, Scraper};
