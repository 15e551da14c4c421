use super::parser::RawTable;
use super::IngestError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads the first worksheet. Cells are rendered to text so CSV and workbook
/// sources share one coercion path.
pub(crate) fn read_workbook(path: &Path) -> Result<RawTable, IngestError> {
    std::fs::metadata(path)?;
    let mut workbook = open_workbook_auto(path).map_err(IngestError::Workbook)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyTable)?
        .map_err(IngestError::Workbook)?;

    // calamine trims leading empty columns; pad them back so positional slots line up.
    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let mut rows = range.rows().map(|row| {
        let mut cells = vec![String::new(); leading_columns];
        cells.extend(row.iter().map(cell_text));
        cells
    });

    let headers = rows.next().ok_or(IngestError::EmptyTable)?;
    Ok(RawTable {
        headers,
        rows: rows.collect(),
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}
