//! Legacy sheet column headers
//!
//! The headers of the original listening sheet, in their on-disk
//! spelling. Matching happens after whitespace normalization, so the
//! two-line variants ("AÑO\nBS") resolve to the same columns.

pub(crate) const ARTIST: &str = "BANDA";
pub(crate) const TITLE: &str = "BESTSELLER";
pub(crate) const YEAR: &str = "AÑO BS";
pub(crate) const GENRE: &str = "GÉNERO";
pub(crate) const SUBGENRE: &str = "SUBGÉNERO";
pub(crate) const COUNTRY: &str = "PAÍS";
pub(crate) const LISTENED: &str = "ESCUCHADO";
pub(crate) const PIONEER: &str = "PIONERA";
pub(crate) const INFLUENCED: &str = "INFLUENCIADOS POR";
