use super::columns::{ColumnLayout, SchoolColumn};
use super::normalizer::{clean_text, coerce_number};
use crate::workflows::bursary::domain::SchoolRecord;
use std::io::Read;

/// Untyped grid read from a CSV file or the first worksheet of a workbook.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn read_csv<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Builds a record from one row, or `None` when a required field is blank or non-numeric.
pub(crate) fn school_record(row: &[String], layout: &ColumnLayout) -> Option<SchoolRecord> {
    let cell = |column: SchoolColumn| {
        layout
            .position(column)
            .and_then(|index| row.get(index))
            .map(String::as_str)
    };
    let text = |column| cell(column).and_then(clean_text);
    let number = |column| cell(column).and_then(coerce_number);

    Some(SchoolRecord {
        school_name: text(SchoolColumn::SchoolName)?,
        quintile: number(SchoolColumn::Quintile)?,
        province: text(SchoolColumn::Province)?,
        district: text(SchoolColumn::District),
        total_wrote: number(SchoolColumn::TotalWrote),
        total_achieved: number(SchoolColumn::TotalAchieved),
        pass_rate: number(SchoolColumn::PassRate)?,
    })
}
