use super::super::domain::{InvestmentGroup, RiskLevel};
use super::super::scoring::EnrichedRecord;
use super::super::table::EnrichedTable;
use super::views::{
    BursaryReportSummary, ExecutiveKpis, FundingStrategyView, GroupASchoolView,
    GroupBreakdownEntry, HighRiskSchoolView, PerformanceGapView, ProvinceProfileEntry,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

pub const PERFORMER_LIMIT: usize = 15;
pub const FUNDING_STRATEGY_LIMIT: usize = 30;

/// Province multi-select. `All` is the default selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProvinceFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl ProvinceFilter {
    pub fn all() -> Self {
        Self::All
    }

    pub fn only<I, S>(provinces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(provinces.into_iter().map(Into::into).collect())
    }

    /// `None` selects every province; an empty list selects nothing.
    pub fn from_selection(selection: Option<Vec<String>>) -> Self {
        match selection {
            Some(provinces) => Self::only(provinces),
            None => Self::All,
        }
    }

    pub fn matches(&self, province: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(provinces) => provinces.contains(province),
        }
    }

    pub fn apply<'a>(&self, table: &'a EnrichedTable) -> FilteredView<'a> {
        let records = table
            .records()
            .iter()
            .filter(|record| self.matches(&record.school.province))
            .collect();
        FilteredView { records }
    }

    /// Provinces of the table this filter selects; unknown names are ignored.
    pub fn selected_provinces(&self, table: &EnrichedTable) -> Vec<String> {
        let mut provinces = table.provinces();
        provinces.retain(|province| self.matches(province));
        provinces
    }
}

/// Read-only subset of the enriched table, in table order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a EnrichedRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> &[&'a EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn count_group(&self, group: InvestmentGroup) -> usize {
        self.records
            .iter()
            .filter(|record| record.investment_group == group)
            .count()
    }

    fn count_risk(&self, risk: RiskLevel) -> usize {
        self.records
            .iter()
            .filter(|record| record.risk_level == risk)
            .count()
    }

    pub fn kpis(&self) -> ExecutiveKpis {
        ExecutiveKpis {
            schools_analysed: self.records.len(),
            average_pass_rate: mean(self.records.iter().map(|r| r.school.pass_rate)),
            best_roi_schools: self.count_group(InvestmentGroup::GroupA),
            high_risk_schools: self.count_risk(RiskLevel::High),
            average_investment_score: mean(self.records.iter().map(|r| r.investment_score)),
        }
    }

    /// Bar chart data: present groups only, most populated first.
    pub fn group_breakdown(&self) -> Vec<GroupBreakdownEntry> {
        let mut entries: Vec<GroupBreakdownEntry> = InvestmentGroup::ordered()
            .into_iter()
            .map(|group| GroupBreakdownEntry {
                group,
                group_label: group.label(),
                schools: self.count_group(group),
            })
            .filter(|entry| entry.schools > 0)
            .collect();
        entries.sort_by(|a, b| b.schools.cmp(&a.schools));
        entries
    }

    pub fn group_a_schools(&self) -> Vec<GroupASchoolView> {
        let mut group_a: Vec<&EnrichedRecord> = self
            .records
            .iter()
            .copied()
            .filter(|record| record.investment_group == InvestmentGroup::GroupA)
            .collect();
        group_a.sort_by(|a, b| by_score_descending(a, b));

        group_a
            .into_iter()
            .map(|record| GroupASchoolView {
                school_name: record.school.school_name.clone(),
                province: record.school.province.clone(),
                district: record.school.district.clone(),
                quintile: record.school.quintile,
                pass_rate: record.school.pass_rate,
                investment_score: record.investment_score,
            })
            .collect()
    }

    pub fn province_profile(&self) -> Vec<ProvinceProfileEntry> {
        #[derive(Default)]
        struct Tally {
            schools: usize,
            pass_rate_total: f64,
            best_roi: usize,
            high_risk: usize,
        }

        let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
        for record in &self.records {
            let tally = tallies.entry(record.school.province.as_str()).or_default();
            tally.schools += 1;
            tally.pass_rate_total += record.school.pass_rate;
            if record.investment_group == InvestmentGroup::GroupA {
                tally.best_roi += 1;
            }
            if record.risk_level == RiskLevel::High {
                tally.high_risk += 1;
            }
        }

        tallies
            .into_iter()
            .map(|(province, tally)| ProvinceProfileEntry {
                province: province.to_string(),
                schools: tally.schools,
                average_pass_rate: tally.pass_rate_total / tally.schools as f64,
                best_roi_schools: tally.best_roi,
                high_risk_schools: tally.high_risk,
            })
            .collect()
    }

    pub fn overperformers(&self, limit: usize) -> Vec<PerformanceGapView> {
        self.ranked_by_gap(limit, |a, b| b.performance_gap.total_cmp(&a.performance_gap))
    }

    pub fn underperformers(&self, limit: usize) -> Vec<PerformanceGapView> {
        self.ranked_by_gap(limit, |a, b| a.performance_gap.total_cmp(&b.performance_gap))
    }

    fn ranked_by_gap<F>(&self, limit: usize, order: F) -> Vec<PerformanceGapView>
    where
        F: Fn(&EnrichedRecord, &EnrichedRecord) -> Ordering,
    {
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| order(*a, *b));

        ranked
            .into_iter()
            .take(limit)
            .map(|record| PerformanceGapView {
                school_name: record.school.school_name.clone(),
                province: record.school.province.clone(),
                quintile: record.school.quintile,
                pass_rate: record.school.pass_rate,
                performance_gap: record.performance_gap,
            })
            .collect()
    }

    pub fn high_risk_schools(&self) -> Vec<HighRiskSchoolView> {
        self.records
            .iter()
            .filter(|record| record.risk_level == RiskLevel::High)
            .map(|record| HighRiskSchoolView {
                school_name: record.school.school_name.clone(),
                province: record.school.province.clone(),
                district: record.school.district.clone(),
                quintile: record.school.quintile,
                pass_rate: record.school.pass_rate,
                funding_recommendation: record.funding_recommendation,
                funding_recommendation_label: record.funding_recommendation.label(),
            })
            .collect()
    }

    pub fn funding_strategy(&self, limit: usize) -> Vec<FundingStrategyView> {
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| by_score_descending(a, b));

        ranked
            .into_iter()
            .take(limit)
            .map(|record| FundingStrategyView {
                school_name: record.school.school_name.clone(),
                province: record.school.province.clone(),
                investment_group: record.investment_group,
                investment_group_label: record.investment_group.label(),
                pass_rate: record.school.pass_rate,
                investment_score: record.investment_score,
                funding_recommendation: record.funding_recommendation,
                funding_recommendation_label: record.funding_recommendation.label(),
            })
            .collect()
    }

    pub fn summary(&self) -> BursaryReportSummary {
        BursaryReportSummary {
            kpis: self.kpis(),
            group_breakdown: self.group_breakdown(),
            group_a_schools: self.group_a_schools(),
            province_profile: self.province_profile(),
            overperformers: self.overperformers(PERFORMER_LIMIT),
            underperformers: self.underperformers(PERFORMER_LIMIT),
            high_risk_schools: self.high_risk_schools(),
            funding_strategy: self.funding_strategy(FUNDING_STRATEGY_LIMIT),
        }
    }
}

fn by_score_descending(a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
    b.investment_score.total_cmp(&a.investment_score)
}

fn mean<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    let (count, total) = values.fold((0usize, 0.0), |(count, total), value| {
        (count + 1, total + value)
    });
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}
