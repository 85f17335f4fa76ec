//! CSV loading and saving for record tables, plus XLSX export.
//!
//! Database exports arrive as CSV with a header row. Loading keeps every
//! non-empty cell as text so values survive a load/save cycle unchanged;
//! empty cells become nulls, which is what completeness scoring counts.

mod error;
mod reader;
mod writer;
mod xlsx;

pub use error::TableError;
pub use reader::{read_csv, read_csv_from};
pub use writer::{write_csv, write_csv_to};
pub use xlsx::write_xlsx;
