use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::RosterError;

type Table = (Vec<String>, Vec<Vec<Option<String>>>);

/// Replace non-breaking spaces, trim, and treat empty text as absent.
pub(super) fn clean_cell(raw: &str) -> Option<String> {
    let cleaned = raw.replace('\u{a0}', " ");
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(super) fn read_workbook(path: &Path, sheet: &str) -> Result<Table, RosterError> {
    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(RosterError::SheetNotFound(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or(RosterError::MissingHeader)?
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok((headers, rows))
}

pub(super) fn read_csv(path: &Path) -> Result<Table, RosterError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(clean_cell).collect());
    }
    Ok((headers, rows))
}

// Every cell is text to the roster. Whole numbers lose their ".0" so numeric
// NIP or phone cells read back as digits.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => clean_cell(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{f:.0}")),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map_or_else(|| dt.as_f64().to_string(), |d| d.date().to_string()),
        ),
    }
}
