use crate::infra::{parse_date, province_filter};
use bursary_insight::config::AppConfig;
use bursary_insight::error::AppError;
use bursary_insight::telemetry;
use bursary_insight::workflows::bursary::report::views::BursaryReport;
use bursary_insight::workflows::bursary::BursaryReportService;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

const BAR_WIDTH: usize = 30;

const PURPOSE_NOTE: &str = "Purpose: identify schools where bursary funding delivers the \
    highest probability of learner success per rand invested.";
const GROUP_A_NOTE: &str = "These schools show strong academic outcomes despite \
    socio-economic disadvantage, so funded learners are most likely to complete.";
const HIGH_RISK_NOTE: &str = "Schools below a 60% pass rate have a high probability of \
    bursary failure unless additional academic interventions are provided.";
const FOOTER_NOTE: &str = "Supports evidence-based bursary allocation for funding \
    committees and CSR investment boards.";

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// School performance dataset (.csv or .xlsx). Defaults to APP_DATASET_PATH.
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Limit the dashboard to a province; repeat for several
    #[arg(long)]
    pub(crate) province: Vec<String>,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// School performance dataset (.csv or .xlsx). Defaults to APP_DATASET_PATH.
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Limit the export to a province; repeat for several
    #[arg(long)]
    pub(crate) province: Vec<String>,
    /// Destination file. Defaults to APP_EXPORT_FILE_NAME in the working directory.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn service_for(dataset: Option<PathBuf>) -> Result<BursaryReportService, AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(path) = dataset {
        config.dataset.path = path;
    }
    Ok(BursaryReportService::from_config(&config.dataset))
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        dataset,
        province,
        today,
        json,
    } = args;

    let service = service_for(dataset)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = service.report(&province_filter(province), today)?;

    if json {
        let payload = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{payload}");
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        dataset,
        province,
        output,
    } = args;

    let service = service_for(dataset)?;
    let output = output.unwrap_or_else(|| PathBuf::from(service.export_file_name()));
    let bytes = service.export_csv(&province_filter(province))?;
    std::fs::write(&output, &bytes)?;

    info!(output = %output.display(), bytes = bytes.len(), "export written");
    println!("Wrote {}", output.display());
    Ok(())
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| format!("{v:.1}%"))
}

fn score(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| format!("{v:.1}"))
}

fn bar(count: usize, max: usize) -> String {
    let width = if max == 0 {
        0
    } else {
        (count * BAR_WIDTH).div_ceil(max)
    };
    "#".repeat(width)
}

pub(crate) fn render_report(report: &BursaryReport) -> String {
    let summary = &report.summary;
    let kpis = &summary.kpis;
    let mut lines = Vec::new();

    lines.push(format!(
        "Bursary investment analysis (generated {})",
        report.generated_on
    ));
    lines.push(PURPOSE_NOTE.to_string());
    lines.push(format!(
        "Dataset: {} schools loaded | {} rows dropped | {} rows rejected",
        report.dataset.schools_loaded, report.dataset.dropped_rows, report.dataset.rejected_rows
    ));
    if report.selected_provinces.is_empty() {
        lines.push("Provinces: none selected".to_string());
    } else {
        lines.push(format!("Provinces: {}", report.selected_provinces.join(", ")));
    }

    lines.push(String::new());
    lines.push("Executive KPIs".to_string());
    lines.push(format!("- Schools analysed: {}", kpis.schools_analysed));
    lines.push(format!(
        "- Average pass rate: {}",
        percent(kpis.average_pass_rate)
    ));
    lines.push(format!(
        "- Best ROI schools (Group A): {}",
        kpis.best_roi_schools
    ));
    lines.push(format!("- High risk schools: {}", kpis.high_risk_schools));
    lines.push(format!(
        "- Average investment score: {}",
        score(kpis.average_investment_score)
    ));

    lines.push(String::new());
    lines.push("Schools by Investment Category".to_string());
    if summary.group_breakdown.is_empty() {
        lines.push("- no data".to_string());
    }
    let max = summary
        .group_breakdown
        .iter()
        .map(|entry| entry.schools)
        .max()
        .unwrap_or(0);
    let label_width = summary
        .group_breakdown
        .iter()
        .map(|entry| entry.group_label.len())
        .max()
        .unwrap_or(0);
    for entry in &summary.group_breakdown {
        lines.push(format!(
            "{:<label_width$} | {} {}",
            entry.group_label,
            bar(entry.schools, max),
            entry.schools
        ));
    }

    lines.push(String::new());
    lines.push("Group A: High Impact Schools".to_string());
    lines.push(GROUP_A_NOTE.to_string());
    if summary.group_a_schools.is_empty() {
        lines.push("- none".to_string());
    }
    for school in &summary.group_a_schools {
        let district = school.district.as_deref().unwrap_or("district unknown");
        lines.push(format!(
            "- {} ({}, {}) | Q{} | pass {:.1}% | score {:.1}",
            school.school_name,
            school.province,
            district,
            school.quintile,
            school.pass_rate,
            school.investment_score
        ));
    }

    lines.push(String::new());
    lines.push("Province Investment Profile".to_string());
    if summary.province_profile.is_empty() {
        lines.push("- no data".to_string());
    }
    for entry in &summary.province_profile {
        lines.push(format!(
            "- {}: {} schools | avg pass {:.1}% | {} Group A | {} high risk",
            entry.province,
            entry.schools,
            entry.average_pass_rate,
            entry.best_roi_schools,
            entry.high_risk_schools
        ));
    }

    for (title, rows) in [
        ("Overperformers", &summary.overperformers),
        ("Underperformers", &summary.underperformers),
    ] {
        lines.push(String::new());
        lines.push(format!("{title} (gap vs quintile baseline)"));
        if rows.is_empty() {
            lines.push("- none".to_string());
        }
        for row in rows {
            lines.push(format!(
                "- {} ({}) | Q{} | pass {:.1}% | gap {:+.1}",
                row.school_name, row.province, row.quintile, row.pass_rate, row.performance_gap
            ));
        }
    }

    lines.push(String::new());
    lines.push("High Risk Schools".to_string());
    lines.push(HIGH_RISK_NOTE.to_string());
    if summary.high_risk_schools.is_empty() {
        lines.push("- none".to_string());
    }
    for school in &summary.high_risk_schools {
        lines.push(format!(
            "- {} ({}) | Q{} | pass {:.1}% | {}",
            school.school_name,
            school.province,
            school.quintile,
            school.pass_rate,
            school.funding_recommendation_label
        ));
    }

    lines.push(String::new());
    lines.push("Funding Strategy".to_string());
    if summary.funding_strategy.is_empty() {
        lines.push("- none".to_string());
    }
    for (rank, row) in summary.funding_strategy.iter().enumerate() {
        lines.push(format!(
            "{:>2}. {} ({}) | {} | score {:.1} | {}",
            rank + 1,
            row.school_name,
            row.province,
            row.investment_group_label,
            row.investment_score,
            row.funding_recommendation_label
        ));
    }

    lines.push(String::new());
    lines.push("Executive Takeaways".to_string());
    for note in &report.takeaways.observations {
        lines.push(format!("- {note}"));
    }
    lines.push("Recommended strategy".to_string());
    for step in &report.takeaways.strategy {
        lines.push(format!("- {step}"));
    }

    lines.push(String::new());
    lines.push(FOOTER_NOTE.to_string());

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use bursary_insight::workflows::bursary::{build_report, EnrichedTable, ProvinceFilter};
    use bursary_insight::workflows::ingest::SchoolDatasetLoader;

    fn sample_report(filter: &ProvinceFilter) -> BursaryReport {
        let csv = "School_Name,Quintile,Pass_Rate,Province,District,Total_Achieved\n\
            Mbilwi Secondary,1,95,Limpopo,Vhembe,140\n\
            Thengwe High,2,82,Limpopo,Vhembe,66\n\
            Bushbuckridge Secondary,1,41,Mpumalanga,Bohlabela,37\n";
        let dataset = SchoolDatasetLoader::from_reader(csv.as_bytes()).expect("imports");
        let table = EnrichedTable::from_dataset(dataset);
        let today = NaiveDate::from_ymd_opt(2026, 1, 13).expect("valid date");
        build_report(&table, filter, today)
    }

    #[test]
    fn bars_scale_to_the_largest_group() {
        assert_eq!(bar(2, 2).len(), BAR_WIDTH);
        assert_eq!(bar(1, 2).len(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 100).len(), 1);
        assert_eq!(bar(0, 0), "");
    }

    #[test]
    fn text_report_lists_every_section() {
        let text = render_report(&sample_report(&ProvinceFilter::all()));

        assert!(text.starts_with("Bursary investment analysis (generated 2026-01-13)"));
        assert!(text.contains("Provinces: Limpopo, Mpumalanga"));
        assert!(text.contains("- Average pass rate: 72.7%"));
        assert!(text.contains("Schools by Investment Category"));
        let group_a = text
            .lines()
            .find(|line| line.starts_with("Group A: High Impact / Best ROI"))
            .expect("group A bar");
        assert!(group_a.ends_with(&format!("| {} 2", "#".repeat(BAR_WIDTH))));
        assert!(
            text.contains("- Mbilwi Secondary (Limpopo, Vhembe) | Q1 | pass 95.0% | score 77.0")
        );
        assert!(text.contains(
            "- Bushbuckridge Secondary (Mpumalanga) | Q1 | pass 41.0% | \
             Do Not Fund Without Intervention"
        ));
        assert!(text.contains(" 1. Mbilwi Secondary (Limpopo)"));
        assert!(text.contains("- Prioritise Group A"));
    }

    #[test]
    fn text_report_explains_groups_and_risk() {
        let text = render_report(&sample_report(&ProvinceFilter::all()));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], PURPOSE_NOTE);
        let group_a = lines
            .iter()
            .position(|line| *line == "Group A: High Impact Schools")
            .expect("group A section");
        assert!(lines[group_a + 1].contains("strong academic outcomes despite socio-economic"));
        let high_risk = lines
            .iter()
            .position(|line| *line == "High Risk Schools")
            .expect("high risk section");
        assert!(lines[high_risk + 1].starts_with("Schools below a 60% pass rate"));
        assert_eq!(lines.last().copied(), Some(FOOTER_NOTE));
    }

    #[test]
    fn empty_selection_renders_no_data() {
        let text = render_report(&sample_report(&ProvinceFilter::only(Vec::<String>::new())));

        assert!(text.contains("Provinces: none selected"));
        assert!(text.contains("- Average pass rate: no data"));
        assert!(text.contains("- Average investment score: no data"));
        assert!(text.contains("- No schools match the current province selection"));
    }
}
