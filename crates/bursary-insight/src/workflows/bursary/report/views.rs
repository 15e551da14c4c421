use super::super::domain::{FundingRecommendation, InvestmentGroup};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveKpis {
    pub schools_analysed: usize,
    /// `None` when the view holds no schools.
    pub average_pass_rate: Option<f64>,
    pub best_roi_schools: usize,
    pub high_risk_schools: usize,
    pub average_investment_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBreakdownEntry {
    pub group: InvestmentGroup,
    pub group_label: &'static str,
    pub schools: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupASchoolView {
    pub school_name: String,
    pub province: String,
    pub district: Option<String>,
    pub quintile: f64,
    pub pass_rate: f64,
    pub investment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceProfileEntry {
    pub province: String,
    pub schools: usize,
    pub average_pass_rate: f64,
    pub best_roi_schools: usize,
    pub high_risk_schools: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceGapView {
    pub school_name: String,
    pub province: String,
    pub quintile: f64,
    pub pass_rate: f64,
    pub performance_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighRiskSchoolView {
    pub school_name: String,
    pub province: String,
    pub district: Option<String>,
    pub quintile: f64,
    pub pass_rate: f64,
    pub funding_recommendation: FundingRecommendation,
    pub funding_recommendation_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingStrategyView {
    pub school_name: String,
    pub province: String,
    pub investment_group: InvestmentGroup,
    pub investment_group_label: &'static str,
    pub pass_rate: f64,
    pub investment_score: f64,
    pub funding_recommendation: FundingRecommendation,
    pub funding_recommendation_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BursaryReportSummary {
    pub kpis: ExecutiveKpis,
    pub group_breakdown: Vec<GroupBreakdownEntry>,
    pub group_a_schools: Vec<GroupASchoolView>,
    pub province_profile: Vec<ProvinceProfileEntry>,
    pub overperformers: Vec<PerformanceGapView>,
    pub underperformers: Vec<PerformanceGapView>,
    pub high_risk_schools: Vec<HighRiskSchoolView>,
    pub funding_strategy: Vec<FundingStrategyView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveTakeaways {
    pub best_roi_schools: usize,
    pub high_risk_schools: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
    pub strategy: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub schools_loaded: usize,
    pub dropped_rows: usize,
    pub rejected_rows: usize,
    pub available_provinces: Vec<String>,
}

/// Everything the dashboard shows for one province selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BursaryReport {
    pub generated_on: NaiveDate,
    pub dataset: DatasetOverview,
    pub selected_provinces: Vec<String>,
    pub summary: BursaryReportSummary,
    pub takeaways: ExecutiveTakeaways,
}
