use bursary_insight::workflows::bursary::ProvinceFilter;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Repeated `--province` flags; none selects every province.
pub(crate) fn province_filter(provinces: Vec<String>) -> ProvinceFilter {
    if provinces.is_empty() {
        ProvinceFilter::all()
    } else {
        ProvinceFilter::only(provinces)
    }
}
