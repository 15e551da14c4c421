use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::cache::DatasetCache;
use super::export::{to_csv_bytes, ExportError};
use super::report::views::{BursaryReport, DatasetOverview};
use super::report::{build_report, ProvinceFilter};
use super::table::EnrichedTable;
use crate::config::{DatasetConfig, DEFAULT_EXPORT_FILE_NAME};
use crate::workflows::ingest::IngestError;

/// Serves reports and exports for one configured dataset, loading it lazily through the cache.
pub struct BursaryReportService {
    dataset_path: PathBuf,
    export_file_name: String,
    cache: DatasetCache,
}

impl BursaryReportService {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            cache: DatasetCache::new(),
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.path.clone()).with_export_file_name(config.export_file_name.clone())
    }

    pub fn with_export_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.export_file_name = file_name.into();
        self
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn export_file_name(&self) -> &str {
        &self.export_file_name
    }

    pub fn table(&self) -> Result<Arc<EnrichedTable>, ReportServiceError> {
        Ok(self.cache.get_or_load(&self.dataset_path)?)
    }

    pub fn provinces(&self) -> Result<Vec<String>, ReportServiceError> {
        Ok(self.table()?.provinces())
    }

    pub fn report(
        &self,
        filter: &ProvinceFilter,
        generated_on: NaiveDate,
    ) -> Result<BursaryReport, ReportServiceError> {
        let table = self.table()?;
        Ok(build_report(&table, filter, generated_on))
    }

    /// CSV bytes for the filtered table, header row included even when empty.
    pub fn export_csv(&self, filter: &ProvinceFilter) -> Result<Vec<u8>, ReportServiceError> {
        let table = self.table()?;
        let view = filter.apply(&table);
        Ok(to_csv_bytes(view.records().iter().copied())?)
    }

    /// Drops the cached table and loads the dataset again from disk.
    pub fn reload(&self) -> Result<DatasetOverview, ReportServiceError> {
        let evicted = self.cache.invalidate(&self.dataset_path);
        info!(
            source = %self.dataset_path.display(),
            evicted,
            "reloading school dataset"
        );
        Ok(self.table()?.overview())
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_dataset(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bursary-insight-service-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("schools.csv");
        let mut file = std::fs::File::create(&path).expect("create dataset");
        file.write_all(contents.as_bytes()).expect("write dataset");
        path
    }

    const TWO_SCHOOLS: &str = "School_Name,Quintile,Pass_Rate,Province\n\
        Mbilwi Secondary,1,95,Limpopo\n\
        Pretoria Boys High,5,99,Gauteng\n";

    #[test]
    fn report_reads_the_configured_dataset() {
        let path = temp_dataset("report", TWO_SCHOOLS);
        let service = BursaryReportService::new(&path);
        let generated_on = NaiveDate::from_ymd_opt(2026, 1, 13).expect("date");

        let report = service
            .report(&ProvinceFilter::only(["Limpopo"]), generated_on)
            .expect("report");
        assert_eq!(report.dataset.schools_loaded, 2);
        assert_eq!(report.summary.kpis.schools_analysed, 1);
        assert_eq!(
            service.provinces().expect("provinces"),
            vec!["Gauteng", "Limpopo"]
        );
    }

    #[test]
    fn reload_picks_up_changes_on_disk() {
        let path = temp_dataset("reload", TWO_SCHOOLS);
        let service = BursaryReportService::new(&path);
        assert_eq!(service.table().expect("table").len(), 2);

        std::fs::write(
            &path,
            "School_Name,Quintile,Pass_Rate,Province\nMbilwi Secondary,1,95,Limpopo\n",
        )
        .expect("rewrite dataset");
        assert_eq!(service.table().expect("cached table").len(), 2);

        let overview = service.reload().expect("reload");
        assert_eq!(overview.schools_loaded, 1);
        assert_eq!(service.table().expect("table").len(), 1);
    }

    #[test]
    fn missing_dataset_surfaces_ingest_error() {
        let service = BursaryReportService::new("/definitely/not/here/schools.csv");
        let err = service.provinces().expect_err("missing file");
        assert!(matches!(err, ReportServiceError::Ingest(IngestError::Io(_))));
    }

    #[test]
    fn export_uses_configured_file_name() {
        let config = DatasetConfig {
            path: PathBuf::from("schools.csv"),
            export_file_name: "limpopo.csv".to_string(),
        };
        let service = BursaryReportService::from_config(&config);
        assert_eq!(service.export_file_name(), "limpopo.csv");
        assert_eq!(service.dataset_path(), Path::new("schools.csv"));
    }
}
