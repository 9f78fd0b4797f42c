use std::collections::HashSet;
use std::io::Cursor;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use super::utils::{excel_serial_to_iso, unique_header};
use crate::error::LoadError;
use crate::services::eda::{Column, ColumnData, Dataset};

const FORMAT: &str = "XLSX";
static EMPTY_CELL: Data = Data::Empty;

/// Reads the first worksheet. The first row holds the headers.
pub fn load_xlsx(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let start = std::time::Instant::now();
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(|e| {
        tracing::error!("Failed to open Excel file: {}", e);
        LoadError::parse(FORMAT, e)
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::parse(FORMAT, "no sheets found in workbook"))?;
    tracing::debug!("Reading worksheet {}", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::parse(FORMAT, format!("failed to read worksheet {}: {}", sheet_name, e)))?;

    let rows: Vec<&[Data]> = range.rows().collect();
    let Some((header_row, body)) = rows.split_first() else {
        tracing::warn!("Sheet {} is empty", sheet_name);
        return Ok(Dataset::default());
    };

    let mut existing_names = HashSet::new();
    let columns = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = unique_header(&cell.to_string(), idx, &mut existing_names);
            let cells: Vec<&Data> = body.iter().map(|row| row.get(idx).unwrap_or(&EMPTY_CELL)).collect();
            Column::new(name, infer_column(&cells))
        })
        .collect::<Vec<_>>();

    tracing::info!(
        "Worksheet {} read: {} rows x {} columns in {:?}",
        sheet_name,
        body.len(),
        columns.len(),
        start.elapsed()
    );
    Ok(Dataset::new(columns))
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn as_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}

fn as_datetime(cell: &Data) -> Option<String> {
    match cell {
        Data::DateTime(d) => excel_serial_to_iso(d.as_f64()),
        Data::DateTimeIso(s) => Some(s.clone()),
        _ => None,
    }
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// Picks the narrowest type every non-blank cell fits. A column with mixed
/// kinds of cells is read as text. Integers need a value in every row.
fn infer_column(cells: &[&Data]) -> ColumnData {
    let filled = || cells.iter().filter(|c| !is_blank(c));

    // whole numbers with blanks stay floats, as pandas reads them
    if !cells.is_empty() && cells.iter().all(|c| as_number(c).is_some_and(is_integral)) {
        return ColumnData::Int(cells.iter().map(|c| as_number(c).map(|v| v as i64)).collect());
    }
    if filled().all(|c| as_number(c).is_some()) {
        return ColumnData::Float(
            cells
                .iter()
                .map(|c| if is_blank(c) { None } else { as_number(c) })
                .collect(),
        );
    }
    if filled().all(|c| matches!(c, Data::Bool(_))) {
        return ColumnData::Bool(
            cells
                .iter()
                .map(|c| match c {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        );
    }
    if filled().all(|c| as_datetime(c).is_some()) {
        return ColumnData::Datetime(
            cells
                .iter()
                .map(|c| if is_blank(c) { None } else { as_datetime(c) })
                .collect(),
        );
    }
    ColumnData::Text(
        cells
            .iter()
            .map(|c| if is_blank(c) { None } else { Some(c.to_string()) })
            .collect(),
    )
}
