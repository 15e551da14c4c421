use super::normalizer::normalize_header;
use serde::Serialize;

/// Semantic fields recovered from the performance report's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolColumn {
    SchoolName,
    Quintile,
    TotalWrote,
    TotalAchieved,
    PassRate,
    District,
    Province,
}

impl SchoolColumn {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::SchoolName,
            Self::Quintile,
            Self::TotalWrote,
            Self::TotalAchieved,
            Self::PassRate,
            Self::District,
            Self::Province,
        ]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::SchoolName => "School_Name",
            Self::Quintile => "Quintile",
            Self::TotalWrote => "Total_Wrote",
            Self::TotalAchieved => "Total_Achieved",
            Self::PassRate => "Pass_Rate",
            Self::District => "District",
            Self::Province => "Province",
        }
    }

    /// Zero-based column of the field in the departmental spreadsheet, whose
    /// header cells for these columns are blank.
    pub const fn positional_slot(self) -> usize {
        match self {
            Self::SchoolName => 1,
            Self::Quintile => 3,
            Self::TotalWrote => 13,
            Self::TotalAchieved => 14,
            Self::PassRate => 15,
            Self::District => 16,
            Self::Province => 17,
        }
    }

    pub const fn required(self) -> bool {
        matches!(
            self,
            Self::SchoolName | Self::Quintile | Self::PassRate | Self::Province
        )
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::SchoolName => &["school name", "school", "centre name", "center name"],
            Self::Quintile => &["quintile", "school quintile"],
            Self::TotalWrote => &["total wrote", "wrote", "candidates wrote"],
            Self::TotalAchieved => &["total achieved", "achieved", "candidates achieved"],
            Self::PassRate => &["pass rate", "pass %", "% achieved", "percentage achieved"],
            Self::District => &["district", "district name"],
            Self::Province => &["province", "province name"],
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::SchoolName => 0,
            Self::Quintile => 1,
            Self::TotalWrote => 2,
            Self::TotalAchieved => 3,
            Self::PassRate => 4,
            Self::District => 5,
            Self::Province => 6,
        }
    }
}

/// Where each semantic field sits in a particular table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    positions: [Option<usize>; 7],
}

impl ColumnLayout {
    /// Resolves every field by an explicit `Unnamed: N` label first, then by a
    /// blank header in the field's positional slot, then by alias.
    pub(crate) fn resolve(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut layout = Self::default();

        for column in SchoolColumn::ordered() {
            let slot = column.positional_slot();
            let unnamed_label = format!("unnamed: {slot}");
            let by_label = normalized.iter().position(|header| *header == unnamed_label);
            let by_slot = || {
                normalized
                    .get(slot)
                    .filter(|header| header.is_empty())
                    .map(|_| slot)
            };
            let by_alias = || {
                normalized
                    .iter()
                    .position(|header| column.aliases().contains(&header.as_str()))
            };

            layout.positions[column.index()] = by_label.or_else(by_slot).or_else(by_alias);
        }

        layout
    }

    pub(crate) fn position(&self, column: SchoolColumn) -> Option<usize> {
        self.positions[column.index()]
    }

    pub(crate) fn first_missing_required(&self) -> Option<SchoolColumn> {
        SchoolColumn::ordered()
            .into_iter()
            .find(|column| column.required() && self.position(*column).is_none())
    }

    pub(crate) fn missing_optional(&self) -> Vec<SchoolColumn> {
        SchoolColumn::ordered()
            .into_iter()
            .filter(|column| !column.required() && self.position(*column).is_none())
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn resolve_for_tests(headers: &[&str]) -> ColumnLayout {
    let owned: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    ColumnLayout::resolve(&owned)
}
