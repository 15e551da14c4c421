mod insights;
mod summary;
pub mod views;

pub use summary::{FilteredView, ProvinceFilter, FUNDING_STRATEGY_LIMIT, PERFORMER_LIMIT};

use super::table::EnrichedTable;
use chrono::NaiveDate;
use views::{BursaryReport, BursaryReportSummary, ExecutiveTakeaways};

impl BursaryReportSummary {
    pub fn takeaways(&self) -> ExecutiveTakeaways {
        insights::generate_takeaways(self)
    }
}

pub fn build_report(
    table: &EnrichedTable,
    filter: &ProvinceFilter,
    generated_on: NaiveDate,
) -> BursaryReport {
    let view = filter.apply(table);
    let summary = view.summary();
    let takeaways = summary.takeaways();

    BursaryReport {
        generated_on,
        dataset: table.overview(),
        selected_provinces: filter.selected_provinces(table),
        summary,
        takeaways,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::bursary::domain::{InvestmentGroup, SchoolRecord};
    use crate::workflows::ingest::CleanedDataset;

    fn record(name: &str, province: &str, quintile: f64, pass_rate: f64) -> SchoolRecord {
        SchoolRecord {
            school_name: name.to_string(),
            quintile,
            province: province.to_string(),
            district: None,
            total_wrote: Some(50.0),
            total_achieved: Some(40.0),
            pass_rate,
        }
    }

    fn table(records: Vec<SchoolRecord>) -> EnrichedTable {
        EnrichedTable::from_dataset(CleanedDataset {
            records,
            dropped_rows: 0,
        })
    }

    fn sample_table() -> EnrichedTable {
        table(vec![
            record("Mbilwi", "Limpopo", 1.0, 95.0),
            record("Thengwe", "Limpopo", 2.0, 82.0),
            record("Soshanguve", "Gauteng", 3.0, 78.0),
            record("Pretoria Boys", "Gauteng", 5.0, 99.0),
            record("Bushbuckridge", "Mpumalanga", 1.0, 41.0),
            record("Nkomazi", "Mpumalanga", 2.0, 64.0),
        ])
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let table = sample_table();
        let view = ProvinceFilter::only(Vec::<String>::new()).apply(&table);
        let kpis = view.kpis();

        assert_eq!(kpis.schools_analysed, 0);
        assert_eq!(kpis.average_pass_rate, None);
        assert_eq!(kpis.average_investment_score, None);
        assert!(view.group_breakdown().is_empty());
        assert!(view.province_profile().is_empty());

        let takeaways = view.summary().takeaways();
        assert_eq!(
            takeaways.observations,
            vec!["No schools match the current province selection".to_string()]
        );
        assert_eq!(takeaways.strategy.len(), 4);
    }

    #[test]
    fn filter_keeps_table_order_within_selection() {
        let table = sample_table();
        let view = ProvinceFilter::only(["Mpumalanga", "Limpopo"]).apply(&table);
        let names: Vec<&str> = view
            .records()
            .iter()
            .map(|record| record.school.school_name.as_str())
            .collect();
        assert_eq!(names, ["Mbilwi", "Thengwe", "Bushbuckridge", "Nkomazi"]);
    }

    #[test]
    fn breakdown_orders_groups_by_count() {
        let table = sample_table();
        let breakdown = ProvinceFilter::all().apply(&table).group_breakdown();
        let groups: Vec<(InvestmentGroup, usize)> = breakdown
            .iter()
            .map(|entry| (entry.group, entry.schools))
            .collect();
        assert_eq!(
            groups,
            vec![
                (InvestmentGroup::GroupA, 2),
                (InvestmentGroup::GroupC, 2),
                (InvestmentGroup::GroupB, 1),
                (InvestmentGroup::GroupD, 1),
            ]
        );
    }

    #[test]
    fn build_report_carries_dataset_overview_and_selection() {
        let table = sample_table();
        let generated_on = NaiveDate::from_ymd_opt(2026, 1, 13).expect("valid date");
        let report = build_report(&table, &ProvinceFilter::all(), generated_on);

        assert_eq!(report.dataset.schools_loaded, 6);
        assert_eq!(
            report.selected_provinces,
            vec!["Gauteng", "Limpopo", "Mpumalanga"]
        );
        assert_eq!(report.summary.kpis.best_roi_schools, 2);
        assert_eq!(report.summary.kpis.high_risk_schools, 1);
        assert_eq!(report.summary.group_a_schools[0].school_name, "Mbilwi");
        assert_eq!(report.summary.province_profile[0].province, "Gauteng");
        assert!(report
            .takeaways
            .observations
            .iter()
            .any(|line| line == "Limpopo holds the most Group A schools (2)"));
    }

    #[test]
    fn selection_ignores_provinces_missing_from_the_table() {
        let table = sample_table();
        let generated_on = NaiveDate::from_ymd_opt(2026, 1, 13).expect("valid date");

        let unknown = build_report(&table, &ProvinceFilter::only(["Atlantis"]), generated_on);
        assert!(unknown.selected_provinces.is_empty());
        assert_eq!(unknown.summary.kpis.schools_analysed, 0);

        let mixed = ProvinceFilter::only(["Limpopo", "Atlantis"]);
        assert_eq!(mixed.selected_provinces(&table), vec!["Limpopo"]);
    }
}
