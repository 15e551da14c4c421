//! Row-level classification and scoring.
//!
//! Every derived value is a pure function of one record's base fields, so the
//! pipeline can be re-run over the same table and produce identical output.

use super::domain::{FundingRecommendation, InvestmentGroup, RiskLevel, SchoolRecord};
use serde::Serialize;
use tracing::{debug, warn};

const PASS_RATE_WEIGHT: f64 = 0.6;
const DISADVANTAGE_WEIGHT: f64 = 0.4;
const EXPECTED_PASS_INTERCEPT: f64 = 40.0;
const EXPECTED_PASS_SLOPE: f64 = 15.0;

/// A school record with the investment columns appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub school: SchoolRecord,
    pub investment_group: InvestmentGroup,
    pub risk_level: RiskLevel,
    pub investment_score: f64,
    pub expected_pass: f64,
    pub performance_gap: f64,
    pub impact_potential: Option<f64>,
    pub funding_recommendation: FundingRecommendation,
}

/// Input outside the domain the scoring rules were written for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    #[error("{school}: pass rate {value} is outside 0-100")]
    PassRate { school: String, value: f64 },
    #[error("{school}: quintile {value} is not a whole number from 1 to 5")]
    Quintile { school: String, value: f64 },
}

impl ContractViolation {
    pub fn school(&self) -> &str {
        match self {
            Self::PassRate { school, .. } | Self::Quintile { school, .. } => school,
        }
    }
}

/// Result of enriching a batch: accepted rows in input order plus rejections.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    pub rejected: Vec<ContractViolation>,
}

/// Ordered decision list; the first matching rule wins.
pub fn investment_group(quintile: f64, pass_rate: f64) -> InvestmentGroup {
    if quintile <= 2.0 && pass_rate >= 80.0 {
        InvestmentGroup::GroupA
    } else if quintile == 3.0 && pass_rate >= 75.0 {
        InvestmentGroup::GroupB
    } else if pass_rate >= 60.0 {
        InvestmentGroup::GroupC
    } else {
        InvestmentGroup::GroupD
    }
}

pub fn risk_level(pass_rate: f64) -> RiskLevel {
    if pass_rate >= 80.0 {
        RiskLevel::Low
    } else if pass_rate >= 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// 60% pass rate, 40% inverted quintile: quintile 1 contributes 50 points,
/// quintile 5 contributes 10.
pub fn investment_score(quintile: f64, pass_rate: f64) -> f64 {
    pass_rate * PASS_RATE_WEIGHT + (6.0 - quintile) * 10.0 * DISADVANTAGE_WEIGHT
}

pub fn expected_pass(quintile: f64) -> f64 {
    quintile * EXPECTED_PASS_SLOPE + EXPECTED_PASS_INTERCEPT
}

/// Positive when the school beats its socio-economic baseline.
pub fn performance_gap(quintile: f64, pass_rate: f64) -> f64 {
    pass_rate - expected_pass(quintile)
}

pub fn impact_potential(total_achieved: Option<f64>, pass_rate: f64) -> Option<f64> {
    total_achieved.map(|achieved| achieved * pass_rate / 100.0)
}

fn check_domain(record: &SchoolRecord) -> Result<(), ContractViolation> {
    if !(0.0..=100.0).contains(&record.pass_rate) {
        return Err(ContractViolation::PassRate {
            school: record.school_name.clone(),
            value: record.pass_rate,
        });
    }

    let quintile = record.quintile;
    if quintile.fract() != 0.0 || !(1.0..=5.0).contains(&quintile) {
        return Err(ContractViolation::Quintile {
            school: record.school_name.clone(),
            value: quintile,
        });
    }

    Ok(())
}

pub fn enrich(record: SchoolRecord) -> Result<EnrichedRecord, ContractViolation> {
    check_domain(&record)?;

    let SchoolRecord {
        quintile,
        pass_rate,
        total_achieved,
        ..
    } = record;
    let group = investment_group(quintile, pass_rate);

    Ok(EnrichedRecord {
        investment_group: group,
        risk_level: risk_level(pass_rate),
        investment_score: investment_score(quintile, pass_rate),
        expected_pass: expected_pass(quintile),
        performance_gap: performance_gap(quintile, pass_rate),
        impact_potential: impact_potential(total_achieved, pass_rate),
        funding_recommendation: group.funding_recommendation(),
        school: record,
    })
}

pub fn enrich_all<I>(records: I) -> Enrichment
where
    I: IntoIterator<Item = SchoolRecord>,
{
    let mut enrichment = Enrichment::default();

    for record in records {
        match enrich(record) {
            Ok(enriched) => enrichment.records.push(enriched),
            Err(violation) => {
                warn!(school = violation.school(), %violation, "rejecting school record");
                enrichment.rejected.push(violation);
            }
        }
    }

    debug!(
        accepted = enrichment.records.len(),
        rejected = enrichment.rejected.len(),
        "scoring pipeline finished"
    );
    enrichment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(quintile: f64, pass_rate: f64) -> SchoolRecord {
        SchoolRecord {
            school_name: format!("Q{quintile} at {pass_rate}"),
            quintile,
            province: "Limpopo".to_string(),
            district: Some("Vhembe".to_string()),
            total_wrote: Some(100.0),
            total_achieved: Some(80.0),
            pass_rate,
        }
    }

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn quintile_gate_decides_group_a_before_pass_rate_fallbacks() {
        assert_eq!(investment_group(1.0, 80.0), InvestmentGroup::GroupA);
        assert_eq!(investment_group(2.0, 99.0), InvestmentGroup::GroupA);
        assert_eq!(investment_group(1.0, 79.0), InvestmentGroup::GroupC);
        assert_eq!(investment_group(4.0, 90.0), InvestmentGroup::GroupC);
        assert_eq!(investment_group(5.0, 59.9), InvestmentGroup::GroupD);
    }

    #[test]
    fn group_b_only_for_quintile_three() {
        assert_eq!(investment_group(3.0, 75.0), InvestmentGroup::GroupB);
        assert_eq!(investment_group(3.0, 95.0), InvestmentGroup::GroupB);
        assert_eq!(investment_group(3.0, 74.9), InvestmentGroup::GroupC);
        assert_eq!(investment_group(2.0, 76.0), InvestmentGroup::GroupC);
    }

    #[test]
    fn risk_thresholds_are_inclusive() {
        assert_eq!(risk_level(80.0), RiskLevel::Low);
        assert_eq!(risk_level(79.99), RiskLevel::Medium);
        assert_eq!(risk_level(60.0), RiskLevel::Medium);
        assert_eq!(risk_level(59.99), RiskLevel::High);
        assert_eq!(risk_level(0.0), RiskLevel::High);
    }

    #[test]
    fn score_and_baseline_formulas() {
        assert!(close(investment_score(1.0, 100.0), 80.0));
        assert!(close(investment_score(5.0, 0.0), 4.0));
        assert!(close(expected_pass(1.0), 55.0));
        assert!(close(expected_pass(5.0), 115.0));
        assert!(close(performance_gap(2.0, 50.0), -20.0));
    }

    #[test]
    fn impact_potential_stays_missing_without_achieved_count() {
        assert_eq!(impact_potential(None, 90.0), None);
        let value = impact_potential(Some(50.0), 50.0).expect("impact");
        assert!(close(value, 25.0));
    }

    #[test]
    fn enrich_rejects_out_of_domain_inputs() {
        match enrich(school(6.0, 70.0)) {
            Err(ContractViolation::Quintile { value, .. }) => assert_eq!(value, 6.0),
            other => panic!("expected quintile violation, got {other:?}"),
        }
        assert!(matches!(
            enrich(school(2.5, 70.0)),
            Err(ContractViolation::Quintile { .. })
        ));
        assert!(matches!(
            enrich(school(2.0, f64::NAN)),
            Err(ContractViolation::PassRate { .. })
        ));
        assert!(matches!(
            enrich(school(2.0, 100.5)),
            Err(ContractViolation::PassRate { .. })
        ));
    }

    #[test]
    fn enrich_all_keeps_order_and_collects_rejections() {
        let records = vec![school(1.0, 90.0), school(0.0, 50.0), school(4.0, 40.0)];
        let enrichment = enrich_all(records);

        assert_eq!(enrichment.records.len(), 2);
        assert_eq!(enrichment.records[0].school.pass_rate, 90.0);
        assert_eq!(enrichment.records[1].school.pass_rate, 40.0);
        assert_eq!(enrichment.rejected.len(), 1);
        assert_eq!(enrichment.rejected[0].school(), "Q0 at 50");
    }
}
