use serde::{Deserialize, Serialize};

/// One cleaned row of the school performance table.
///
/// The four required fields are plain values: rows missing any of them are
/// dropped during ingestion and never reach the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    pub school_name: String,
    pub quintile: f64,
    pub province: String,
    pub district: Option<String>,
    pub total_wrote: Option<f64>,
    pub total_achieved: Option<f64>,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentGroup {
    GroupA,
    GroupB,
    GroupC,
    GroupD,
}

impl InvestmentGroup {
    pub const fn ordered() -> [Self; 4] {
        [Self::GroupA, Self::GroupB, Self::GroupC, Self::GroupD]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GroupA => "Group A: High Impact / Best ROI",
            Self::GroupB => "Group B: Stable / Scalable",
            Self::GroupC => "Group C: High Potential / Needs Support",
            Self::GroupD => "Group D: High Risk / Not Bursary Ready",
        }
    }

    pub const fn funding_recommendation(self) -> FundingRecommendation {
        match self {
            Self::GroupA => FundingRecommendation::FullBursary,
            Self::GroupB => FundingRecommendation::PartialBursary,
            Self::GroupC => FundingRecommendation::ConditionalBursary,
            Self::GroupD => FundingRecommendation::DoNotFund,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingRecommendation {
    FullBursary,
    PartialBursary,
    ConditionalBursary,
    DoNotFund,
}

impl FundingRecommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullBursary => "Full Bursary + University Support",
            Self::PartialBursary => "Partial Bursary + Monitoring",
            Self::ConditionalBursary => "Conditional Bursary + Academic Support",
            Self::DoNotFund => "Do Not Fund Without Intervention",
        }
    }
}
