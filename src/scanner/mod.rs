pub mod file_filter;
pub mod invoice_scanner;

pub use file_filter::FileFilter;
pub use invoice_scanner::{InvoiceFile, InvoiceScanner};
