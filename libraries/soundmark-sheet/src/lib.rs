//! Soundmark Spreadsheet Codec
//!
//! xlsx import and export for Soundmark libraries, all in memory.
//!
//! The reader understands the legacy listening sheet this product grew
//! out of (Spanish column headers, some spanning two lines in one
//! cell) and maps it to `ImportRow`s for reconciliation. The writers
//! produce either that same legacy layout or a full-fidelity export of
//! every entry field.
//!
//! # Example
//!
//! ```
//! use soundmark_sheet::{read_import, write_compatible};
//!
//! let bytes = write_compatible(&[])?;
//! let rows = read_import(&bytes)?;
//! assert!(rows.is_empty());
//! # Ok::<(), soundmark_sheet::SheetError>(())
//! ```

mod columns;
mod error;
mod reader;
mod writer;

pub use error::{Result, SheetError};
pub use reader::read_import;
pub use writer::{write_compatible, write_full};
