//! File-backed adapters: portfolio catalog (CSV) and run reports (Markdown).

pub mod csv_catalog;
pub mod markdown_report;

pub use csv_catalog::CsvCatalog;
pub use markdown_report::MarkdownReportWriter;
