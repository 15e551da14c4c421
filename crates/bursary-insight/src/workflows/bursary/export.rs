//! CSV export of the investment-ready table.

use super::scoring::EnrichedRecord;
use serde::Serialize;
use std::io::Write;

pub const EXPORT_HEADERS: [&str; 14] = [
    "School_Name",
    "Quintile",
    "Total_Wrote",
    "Total_Achieved",
    "Pass_Rate",
    "District",
    "Province",
    "Investment_Group",
    "Risk_Level",
    "Investment_Score",
    "Expected_Pass",
    "Performance_Gap",
    "Impact_Potential",
    "Funding_Recommendation",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode export row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
}

/// Field order matches `EXPORT_HEADERS`.
#[derive(Serialize)]
struct ExportRow<'a> {
    school_name: &'a str,
    quintile: f64,
    total_wrote: Option<f64>,
    total_achieved: Option<f64>,
    pass_rate: f64,
    district: Option<&'a str>,
    province: &'a str,
    investment_group: &'static str,
    risk_level: &'static str,
    investment_score: f64,
    expected_pass: f64,
    performance_gap: f64,
    impact_potential: Option<f64>,
    funding_recommendation: &'static str,
}

impl<'a> From<&'a EnrichedRecord> for ExportRow<'a> {
    fn from(record: &'a EnrichedRecord) -> Self {
        let school = &record.school;
        Self {
            school_name: &school.school_name,
            quintile: school.quintile,
            total_wrote: school.total_wrote,
            total_achieved: school.total_achieved,
            pass_rate: school.pass_rate,
            district: school.district.as_deref(),
            province: &school.province,
            investment_group: record.investment_group.label(),
            risk_level: record.risk_level.label(),
            investment_score: record.investment_score,
            expected_pass: record.expected_pass,
            performance_gap: record.performance_gap,
            impact_potential: record.impact_potential,
            funding_recommendation: record.funding_recommendation.label(),
        }
    }
}

/// Writes a header row followed by one row per record. Missing values become empty cells.
pub fn write_csv<'a, I, W>(records: I, writer: W) -> Result<W, ExportError>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
    W: Write,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }
    csv_writer.flush()?;

    csv_writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

pub fn to_csv_bytes<'a, I>(records: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    write_csv(records, Vec::new())
}
