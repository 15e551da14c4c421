mod columns;
mod normalizer;
mod parser;
mod workbook;

pub use columns::SchoolColumn;

use crate::workflows::bursary::domain::SchoolRecord;
use columns::ColumnLayout;
use parser::RawTable;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    Workbook(calamine::Error),
    UnsupportedFormat(PathBuf),
    EmptyTable,
    MissingColumn(SchoolColumn),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read school dataset: {}", err),
            IngestError::Csv(err) => write!(f, "invalid school dataset CSV: {}", err),
            IngestError::Workbook(err) => write!(f, "unreadable school dataset workbook: {}", err),
            IngestError::UnsupportedFormat(path) => write!(
                f,
                "unsupported dataset format for {} (expected .csv or a spreadsheet)",
                path.display()
            ),
            IngestError::EmptyTable => write!(f, "school dataset has no header row"),
            IngestError::MissingColumn(column) => write!(
                f,
                "school dataset is missing the {} column",
                column.header()
            ),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            IngestError::Workbook(err) => Some(err),
            IngestError::UnsupportedFormat(_)
            | IngestError::EmptyTable
            | IngestError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Rows that survived cleaning, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedDataset {
    pub records: Vec<SchoolRecord>,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

pub struct SchoolDatasetLoader;

impl SchoolDatasetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CleanedDataset, IngestError> {
        let path = path.as_ref();
        let format = SourceFormat::detect(path)
            .ok_or_else(|| IngestError::UnsupportedFormat(path.to_path_buf()))?;

        let table = match format {
            SourceFormat::Csv => parser::read_csv(std::fs::File::open(path)?)?,
            SourceFormat::Workbook => workbook::read_workbook(path)?,
        };

        let dataset = clean(table)?;
        info!(
            source = %path.display(),
            schools = dataset.records.len(),
            dropped = dataset.dropped_rows,
            "school dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CleanedDataset, IngestError> {
        clean(parser::read_csv(reader)?)
    }
}

fn clean(table: RawTable) -> Result<CleanedDataset, IngestError> {
    if table.headers.iter().all(|header| header.trim().is_empty()) && table.rows.is_empty() {
        return Err(IngestError::EmptyTable);
    }

    let layout = ColumnLayout::resolve(&table.headers);
    if let Some(column) = layout.first_missing_required() {
        return Err(IngestError::MissingColumn(column));
    }
    for column in layout.missing_optional() {
        warn!(column = column.header(), "optional column not found; values treated as missing");
    }

    let mut dataset = CleanedDataset::default();
    for row in &table.rows {
        match parser::school_record(row, &layout) {
            Some(record) => dataset.records.push(record),
            None => dataset.dropped_rows += 1,
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const NAMED_HEADERS: &str =
        "School_Name,Quintile,Total_Wrote,Total_Achieved,Pass_Rate,District,Province\n";

    #[test]
    fn resolves_named_headers_in_any_order() {
        let layout = columns::resolve_for_tests(&[
            "Province",
            "pass rate",
            "SCHOOL NAME",
            "Quintile",
            "District",
        ]);
        assert_eq!(layout.position(SchoolColumn::Province), Some(0));
        assert_eq!(layout.position(SchoolColumn::PassRate), Some(1));
        assert_eq!(layout.position(SchoolColumn::SchoolName), Some(2));
        assert_eq!(layout.position(SchoolColumn::TotalAchieved), None);
        assert_eq!(layout.first_missing_required(), None);
        assert_eq!(
            layout.missing_optional(),
            vec![SchoolColumn::TotalWrote, SchoolColumn::TotalAchieved]
        );
    }

    #[test]
    fn resolves_unnamed_labels_and_blank_slots() {
        let mut headers = vec![""; 18];
        headers[0] = "EMIS";
        headers[1] = "Unnamed: 1";
        headers[2] = "Centre No";
        let layout = columns::resolve_for_tests(&headers);
        assert_eq!(layout.position(SchoolColumn::SchoolName), Some(1));
        assert_eq!(layout.position(SchoolColumn::Quintile), Some(3));
        assert_eq!(layout.position(SchoolColumn::PassRate), Some(15));
        assert_eq!(layout.position(SchoolColumn::Province), Some(17));

        let shifted = columns::resolve_for_tests(&["", "EMIS", "Unnamed: 1"]);
        assert_eq!(shifted.position(SchoolColumn::SchoolName), Some(2));
        assert_eq!(shifted.position(SchoolColumn::Province), None);
    }

    #[test]
    fn blank_slots_win_over_broad_aliases() {
        let mut headers = vec![""; 18];
        headers[0] = "School";
        headers[2] = "Centre No";
        headers[4] = "2022 Wrote";
        headers[5] = "2022 Achieved";
        let layout = columns::resolve_for_tests(&headers);

        assert_eq!(layout.position(SchoolColumn::SchoolName), Some(1));
        assert_eq!(layout.position(SchoolColumn::TotalWrote), Some(13));
        assert_eq!(layout.position(SchoolColumn::TotalAchieved), Some(14));
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let csv = format!(
            "{NAMED_HEADERS}\
Alpha High,1,100,90,90.0,Vhembe,Limpopo\n\
,2,50,25,50.0,Capricorn,Limpopo\n\
Beta Secondary,n/a,40,30,75.0,Ehlanzeni,Mpumalanga\n\
Gamma College,3,40,30,,Ehlanzeni,Mpumalanga\n\
Delta School,4,40,30,75.0,Tshwane South,\n\
Epsilon Academy,5,,,45.5,,Gauteng\n"
        );
        let dataset = SchoolDatasetLoader::from_reader(Cursor::new(csv)).expect("parse");

        assert_eq!(dataset.dropped_rows, 4);
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[0].school_name, "Alpha High");
        assert_eq!(dataset.records[0].total_achieved, Some(90.0));
        let epsilon = &dataset.records[1];
        assert_eq!(epsilon.district, None);
        assert_eq!(epsilon.total_wrote, None);
        assert_eq!(epsilon.pass_rate, 45.5);
    }

    #[test]
    fn ragged_rows_treat_absent_cells_as_missing() {
        let csv = format!("{NAMED_HEADERS}Short Row,2,10\n");
        let dataset = SchoolDatasetLoader::from_reader(Cursor::new(csv)).expect("parse");
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.dropped_rows, 1);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "School_Name,Quintile,Province\nAlpha,1,Limpopo\n";
        match SchoolDatasetLoader::from_reader(Cursor::new(csv)) {
            Err(IngestError::MissingColumn(column)) => assert_eq!(column, SchoolColumn::PassRate),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            SchoolDatasetLoader::from_reader(Cursor::new("")),
            Err(IngestError::EmptyTable)
        ));
    }

    #[test]
    fn from_path_rejects_unknown_extensions() {
        match SchoolDatasetLoader::from_path("./report.pdf") {
            Err(IngestError::UnsupportedFormat(path)) => {
                assert_eq!(path, PathBuf::from("./report.pdf"))
            }
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        for missing in ["./does-not-exist.csv", "./does-not-exist.xlsx"] {
            match SchoolDatasetLoader::from_path(missing) {
                Err(IngestError::Io(_)) => {}
                other => panic!("expected io error for {missing}, got {other:?}"),
            }
        }
    }
}
