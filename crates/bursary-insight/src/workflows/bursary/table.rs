use super::report::views::DatasetOverview;
use super::scoring::{enrich_all, ContractViolation, EnrichedRecord};
use crate::workflows::ingest::CleanedDataset;
use std::collections::BTreeSet;

/// Investment-ready table. Built once per load and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct EnrichedTable {
    records: Vec<EnrichedRecord>,
    dropped_rows: usize,
    rejected: Vec<ContractViolation>,
}

impl EnrichedTable {
    pub fn from_dataset(dataset: CleanedDataset) -> Self {
        let CleanedDataset {
            records,
            dropped_rows,
        } = dataset;
        let enrichment = enrich_all(records);

        Self {
            records: enrichment.records,
            dropped_rows,
            rejected: enrichment.rejected,
        }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped during cleaning for missing required fields.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn rejected(&self) -> &[ContractViolation] {
        &self.rejected
    }

    /// Distinct provinces, sorted; the default filter selection.
    pub fn provinces(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.school.province.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn overview(&self) -> DatasetOverview {
        DatasetOverview {
            schools_loaded: self.len(),
            dropped_rows: self.dropped_rows,
            rejected_rows: self.rejected.len(),
            available_provinces: self.provinces(),
        }
    }
}
