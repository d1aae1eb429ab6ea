//! Legacy sheet reader
//!
//! Maps the first worksheet of an uploaded workbook into `ImportRow`s.
//! Rows that carry data but lack an artist or title are kept as-is so
//! reconciliation can count and report them; rows whose mapped cells
//! are all blank are trailing filler and get dropped here.

use crate::columns;
use crate::error::{Result, SheetError};
use calamine::{Data, Reader, Xlsx};
use soundmark_core::types::{ImportRow, Status};
use std::collections::HashMap;
use std::io::Cursor;

/// Decode an uploaded xlsx workbook into import rows
pub fn read_import(bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::Malformed("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| SheetError::Malformed("worksheet has no header row".to_string()))?;
    let map = ColumnMap::from_header(header)?;

    Ok(rows.filter_map(|cells| map.map_row(cells)).collect())
}

/// Where each known column landed in this particular sheet
struct ColumnMap {
    artist: usize,
    title: usize,
    release_year: Option<usize>,
    genre: Option<usize>,
    subgenre: Option<usize>,
    country: Option<usize>,
    listened: Option<usize>,
    pioneer: Option<usize>,
    influenced: Option<usize>,
}

impl ColumnMap {
    fn from_header(cells: &[Data]) -> Result<Self> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (i, cell) in cells.iter().enumerate() {
            if let Data::String(text) = cell {
                index.entry(normalize_header(text)).or_insert(i);
            }
        }

        let required = |name: &str| {
            index.get(name).copied().ok_or_else(|| {
                SheetError::Malformed(format!("required column '{name}' not found"))
            })
        };

        Ok(Self {
            artist: required(columns::ARTIST)?,
            title: required(columns::TITLE)?,
            release_year: index.get(columns::YEAR).copied(),
            genre: index.get(columns::GENRE).copied(),
            subgenre: index.get(columns::SUBGENRE).copied(),
            country: index.get(columns::COUNTRY).copied(),
            listened: index.get(columns::LISTENED).copied(),
            pioneer: index.get(columns::PIONEER).copied(),
            influenced: index.get(columns::INFLUENCED).copied(),
        })
    }

    /// Map one data row; `None` means every mapped cell was blank
    fn map_row(&self, cells: &[Data]) -> Option<ImportRow> {
        if self
            .indexes()
            .all(|i| cells.get(i).map_or(true, is_blank))
        {
            return None;
        }

        let pioneer = cell_at(cells, self.pioneer).and_then(string_cell);
        let influenced = cell_at(cells, self.influenced).and_then(string_cell);

        Some(ImportRow {
            artist: cell_at(cells, Some(self.artist))
                .and_then(string_cell)
                .unwrap_or_default(),
            title: cell_at(cells, Some(self.title))
                .and_then(string_cell)
                .unwrap_or_default(),
            release_year: cell_at(cells, self.release_year).and_then(year_cell),
            genre: cell_at(cells, self.genre).and_then(string_cell),
            subgenre: cell_at(cells, self.subgenre).and_then(string_cell),
            country: cell_at(cells, self.country).and_then(string_cell),
            status: cell_at(cells, self.listened).map_or(Status::Queued, listened_cell),
            influence_notes: join_influence(pioneer, influenced),
        })
    }

    fn indexes(&self) -> impl Iterator<Item = usize> + '_ {
        [
            Some(self.artist),
            Some(self.title),
            self.release_year,
            self.genre,
            self.subgenre,
            self.country,
            self.listened,
            self.pioneer,
            self.influenced,
        ]
        .into_iter()
        .flatten()
    }
}

/// Collapse whitespace runs so two-line header cells match their
/// single-line spelling
fn normalize_header(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cell_at(cells: &[Data], index: Option<usize>) -> Option<&Data> {
    index.and_then(|i| cells.get(i))
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Cell as trimmed text; empty and non-text-like cells are `None`
fn string_cell(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Release year comes from numeric cells only; text is ignored
fn year_cell(cell: &Data) -> Option<i32> {
    match cell {
        Data::Int(i) => i32::try_from(*i).ok(),
        Data::Float(f) => Some(*f as i32),
        _ => None,
    }
}

/// The legacy "listened" flag: an affirmative means Finished,
/// everything else (including absence) means Queued
fn listened_cell(cell: &Data) -> Status {
    match cell {
        Data::Bool(true) => Status::Finished,
        Data::String(s) if matches!(s.trim(), "TRUE" | "true") => Status::Finished,
        _ => Status::Queued,
    }
}

/// The two legacy influence columns collapse into one notes field,
/// separated by a blank line when both are present
fn join_influence(pioneer: Option<String>, influenced: Option<String>) -> Option<String> {
    match (pioneer, influenced) {
        (Some(p), Some(i)) => Some(format!("{p}\n\n{i}")),
        (Some(text), None) | (None, Some(text)) => Some(text),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("AÑO\nBS"), "AÑO BS");
        assert_eq!(normalize_header("  INFLUENCIADOS   POR "), "INFLUENCIADOS POR");
        assert_eq!(normalize_header("BANDA"), "BANDA");
    }

    #[test]
    fn test_string_cell_variants() {
        assert_eq!(
            string_cell(&Data::String("  Neu! ".to_string())),
            Some("Neu!".to_string())
        );
        assert_eq!(string_cell(&Data::String("   ".to_string())), None);
        assert_eq!(string_cell(&Data::Float(1975.0)), Some("1975".to_string()));
        assert_eq!(string_cell(&Data::Int(3)), Some("3".to_string()));
        assert_eq!(string_cell(&Data::Empty), None);
        assert_eq!(string_cell(&Data::Bool(true)), None);
    }

    #[test]
    fn test_year_cell_numeric_only() {
        assert_eq!(year_cell(&Data::Float(1997.0)), Some(1997));
        assert_eq!(year_cell(&Data::Int(2004)), Some(2004));
        assert_eq!(year_cell(&Data::String("1997".to_string())), None);
        assert_eq!(year_cell(&Data::Empty), None);
    }

    #[test]
    fn test_listened_cell_variants() {
        assert_eq!(listened_cell(&Data::Bool(true)), Status::Finished);
        assert_eq!(
            listened_cell(&Data::String("TRUE".to_string())),
            Status::Finished
        );
        assert_eq!(
            listened_cell(&Data::String("true".to_string())),
            Status::Finished
        );
        assert_eq!(listened_cell(&Data::Bool(false)), Status::Queued);
        assert_eq!(
            listened_cell(&Data::String("sí".to_string())),
            Status::Queued
        );
        assert_eq!(listened_cell(&Data::Empty), Status::Queued);
    }

    #[test]
    fn test_join_influence() {
        assert_eq!(
            join_influence(Some("Can".to_string()), Some("Radiohead".to_string())),
            Some("Can\n\nRadiohead".to_string())
        );
        assert_eq!(
            join_influence(Some("Can".to_string()), None),
            Some("Can".to_string())
        );
        assert_eq!(
            join_influence(None, Some("Radiohead".to_string())),
            Some("Radiohead".to_string())
        );
        assert_eq!(join_influence(None, None), None);
    }
}
