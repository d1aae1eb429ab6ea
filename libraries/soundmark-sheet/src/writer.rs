//! Export writers
//!
//! Two layouts: "compatible" reproduces the legacy listening sheet so
//! an export can be re-imported (or opened next to the original), and
//! "full" dumps every entry field including the Last.fm enrichment.

use crate::columns;
use crate::error::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use soundmark_core::types::{LibraryEntry, Status};

const SHEET_NAME: &str = "Library";

const FULL_HEADERS: [&str; 15] = [
    "Title",
    "Artist",
    "Genre",
    "Subgenre",
    "Country",
    "Release Year",
    "Status",
    "Rating",
    "Influence Notes",
    "Cover URL",
    "Last.fm URL",
    "Wiki",
    "Tracks",
    "Similar Artists",
    "Created At",
];

/// Write entries in the legacy sheet layout
///
/// Listening status collapses to the legacy boolean: only `Finished`
/// survives a round trip. Influence notes land in the PIONERA column.
pub fn write_compatible(entries: &[LibraryEntry]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let headers = [
        columns::ARTIST,
        columns::TITLE,
        columns::YEAR,
        columns::GENRE,
        columns::SUBGENRE,
        columns::COUNTRY,
        columns::LISTENED,
        columns::PIONEER,
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write(0, col as u16, *header)?;
    }

    for (i, entry) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write(row, 0, entry.artist.as_str())?;
        worksheet.write(row, 1, entry.title.as_str())?;
        if let Some(year) = entry.release_year {
            worksheet.write(row, 2, year)?;
        }
        write_opt(worksheet, row, 3, entry.genre.as_deref())?;
        write_opt(worksheet, row, 4, entry.subgenre.as_deref())?;
        write_opt(worksheet, row, 5, entry.country.as_deref())?;
        worksheet.write(row, 6, entry.status == Status::Finished)?;
        write_opt(worksheet, row, 7, entry.influence_notes.as_deref())?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write entries with every field, bold header row
///
/// Tracks and similar artists are serialized as JSON text; empty lists
/// leave their cells blank.
pub fn write_full(entries: &[LibraryEntry]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, header) in FULL_HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, entry) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write(row, 0, entry.title.as_str())?;
        worksheet.write(row, 1, entry.artist.as_str())?;
        write_opt(worksheet, row, 2, entry.genre.as_deref())?;
        write_opt(worksheet, row, 3, entry.subgenre.as_deref())?;
        write_opt(worksheet, row, 4, entry.country.as_deref())?;
        if let Some(year) = entry.release_year {
            worksheet.write(row, 5, year)?;
        }
        worksheet.write(row, 6, entry.status.as_str())?;
        if let Some(rating) = entry.rating {
            worksheet.write(row, 7, rating)?;
        }
        write_opt(worksheet, row, 8, entry.influence_notes.as_deref())?;
        write_opt(worksheet, row, 9, entry.cover_image_url.as_deref())?;
        write_opt(worksheet, row, 10, entry.lastfm_url.as_deref())?;
        write_opt(worksheet, row, 11, entry.album_wiki.as_deref())?;
        if !entry.tracks.is_empty() {
            worksheet.write(row, 12, serde_json::to_string(&entry.tracks)?)?;
        }
        if !entry.similar_artists.is_empty() {
            worksheet.write(row, 13, serde_json::to_string(&entry.similar_artists)?)?;
        }
        worksheet.write(row, 14, entry.created_at.as_str())?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_opt(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<&str>) -> Result<()> {
    if let Some(text) = value {
        worksheet.write(row, col, text)?;
    }
    Ok(())
}
