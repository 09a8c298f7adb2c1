//! xlsretro - Pure-Rust converter to legacy-compatible SpreadsheetML `.xls` files
//!
//! This crate converts tabular data (XLSX, CSV, TSV, or rows built in memory) into
//! XML Spreadsheet 2003 documents. Legacy systems such as banking portals and older
//! enterprise software accept these files as `.xls` uploads.
//!
//! The output is not the binary BIFF format. It is a SpreadsheetML document with a
//! single default style, one `Worksheet` per sheet, and per-cell typing
//! (`Number`, `Boolean`, `String`, or an empty cell).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsretro::{CellValue, ConverterBuilder, Sheet, Workbook};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sheet = Sheet::from_rows(
//!         "Payments",
//!         ["AccountNo", "Amount", "Reference"],
//!         vec![
//!             vec!["1234567890".into(), 1200.50.into(), "Invoice-001".into()],
//!             vec!["0987654321".into(), 300.0.into(), CellValue::Null],
//!         ],
//!     );
//!
//!     let converter = ConverterBuilder::new().build()?;
//!     converter.write_file("payments.xls", &Workbook::from(sheet))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Converting Files
//!
//! The input reader is chosen from the file extension (`.xlsx`, `.csv`, `.tsv`):
//!
//! ```rust,no_run
//! use xlsretro::{ConverterBuilder, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Index(0))
//!         .build()?;
//!
//!     converter.convert_path_to_file("report.xlsx", "report.xls")?;
//!
//!     // Or keep the result in memory
//!     let bytes = converter.convert_path_to_bytes("report.csv")?;
//!     println!("{} bytes", bytes.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Streaming
//!
//! `Converter::write` accepts any `std::io::Write` (an HTTP response body, a socket,
//! a file). Elements are written as they are produced; the serialized document is
//! never held in memory as a whole.

mod api;
mod builder;
mod error;
mod formatter;
mod output;
mod parser;
mod types;

// 公開API
pub use api::{SheetSelector, SourceFormat};
pub use builder::{Converter, ConverterBuilder};
pub use error::XlsRetroError;
pub use parser::{read_delimited, read_delimited_path, read_path, read_xlsx, read_xlsx_path};
pub use types::{CellValue, Row, Sheet, Workbook};
