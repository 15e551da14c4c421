//! Bursary investment analysis: classify each school, score it, and roll the
//! enriched table up into the views the dashboard and CLI present.

pub mod cache;
pub mod domain;
pub mod export;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
mod table;

pub use cache::DatasetCache;
pub use domain::{FundingRecommendation, InvestmentGroup, RiskLevel, SchoolRecord};
pub use export::{to_csv_bytes, write_csv, ExportError, EXPORT_HEADERS};
pub use report::views::BursaryReport;
pub use report::{build_report, FilteredView, ProvinceFilter};
pub use router::bursary_router;
pub use scoring::{enrich, enrich_all, ContractViolation, EnrichedRecord, Enrichment};
pub use service::{BursaryReportService, ReportServiceError};
pub use table::EnrichedTable;
