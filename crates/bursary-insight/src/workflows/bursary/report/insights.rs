use super::super::domain::InvestmentGroup;
use super::views::{BursaryReportSummary, ExecutiveTakeaways};

pub(crate) fn generate_takeaways(summary: &BursaryReportSummary) -> ExecutiveTakeaways {
    let kpis = &summary.kpis;
    let mut observations = Vec::new();

    if kpis.schools_analysed == 0 {
        observations.push("No schools match the current province selection".to_string());
    } else {
        observations.push(format!(
            "{} the highest return per bursary rand invested",
            schools(kpis.best_roi_schools, "offers", "offer")
        ));
        observations.push(format!(
            "{} significant dropout risk if funded without support",
            schools(kpis.high_risk_schools, "presents", "present")
        ));

        if let Some(top) = summary.overperformers.first() {
            if top.performance_gap > 0.0 {
                observations.push(format!(
                    "{} ({}) beats its socio-economic baseline by {:.1} points",
                    top.school_name, top.province, top.performance_gap
                ));
            }
        }

        let leading_province = summary
            .province_profile
            .iter()
            .filter(|entry| entry.best_roi_schools > 0)
            .max_by(|a, b| {
                a.best_roi_schools
                    .cmp(&b.best_roi_schools)
                    .then_with(|| b.province.cmp(&a.province))
            });
        if let Some(entry) = leading_province {
            observations.push(format!(
                "{} holds the most Group A schools ({})",
                entry.province, entry.best_roi_schools
            ));
        }
    }

    let strategy = InvestmentGroup::ordered()
        .into_iter()
        .map(|group| match group {
            InvestmentGroup::GroupA => "Prioritise Group A",
            InvestmentGroup::GroupB => "Scale Group B",
            InvestmentGroup::GroupC => "Pilot Group C",
            InvestmentGroup::GroupD => "Avoid Group D unless partnered with academic interventions",
        })
        .map(str::to_string)
        .collect();

    ExecutiveTakeaways {
        best_roi_schools: kpis.best_roi_schools,
        high_risk_schools: kpis.high_risk_schools,
        observations,
        strategy,
    }
}

fn schools(count: usize, singular_verb: &str, plural_verb: &str) -> String {
    if count == 1 {
        format!("1 school {singular_verb}")
    } else {
        format!("{count} schools {plural_verb}")
    }
}
