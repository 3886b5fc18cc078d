//! Management plan parsing.
//!
//! Management plans are exported as Swedish-language spreadsheets: rows of
//! comma separated cells where a label in the first column names the value in
//! the second. The export has no quoting or escaping, so a row is simply split
//! on commas. Parsing is best effort. Short rows read as empty cells and
//! unknown rows are ignored, so a malformed document yields a sparsely
//! populated [`ManagementPlan`] instead of an error.
//!
//! The label set and column meanings live in [`PlanLayout`], so a change to
//! the export format is a change to one table.
//!
//! # Examples
//!
//! ```
//! use ustorp_core::plan::parse_management_plan;
//!
//! let plan = parse_management_plan("Skötselplan,Område 7\nTidslinje,20 år\nSlåtter,x,,500,25,10");
//! assert_eq!(plan.title, "Område 7");
//! assert_eq!(plan.timeline, "20 år");
//! assert_eq!(plan.actions.len(), 1);
//! ```

use log::debug;

use crate::types::{ManagementPlan, PlanAction};

/// Plan fields that are filled from a `label,value` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    CurrentBiotope,
    TargetBiotope,
    Timeline,
    NviValue,
    Area,
    NaturalValueClass,
    ManagementSummary,
}

impl PlanField {
    fn slot(self, plan: &mut ManagementPlan) -> &mut String {
        match self {
            Self::CurrentBiotope => &mut plan.current_biotope,
            Self::TargetBiotope => &mut plan.target_biotope,
            Self::Timeline => &mut plan.timeline,
            Self::NviValue => &mut plan.nvi_value,
            Self::Area => &mut plan.area,
            Self::NaturalValueClass => &mut plan.natural_value_class,
            Self::ManagementSummary => &mut plan.management_summary,
        }
    }
}

/// Labels of the Swedish plan export and the field each one fills.
pub const SWEDISH_LABELS: &[(&str, PlanField)] = &[
    ("Nuvarande biotop", PlanField::CurrentBiotope),
    ("Målbiotop", PlanField::TargetBiotope),
    ("Tidslinje", PlanField::Timeline),
    ("Naturvärdesbiotop (NVI)", PlanField::NviValue),
    ("Areal (ha)", PlanField::Area),
    ("Naturvärdesklass", PlanField::NaturalValueClass),
    ("Skötselsammanfattning", PlanField::ManagementSummary),
];

/// A cell that must hold an exact text for a row to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMatch {
    pub column: usize,
    pub text: &'static str,
}

/// Row rule that extracts one economics total.
///
/// All conditions must hold; the total is read from `value_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomicsRule {
    pub conditions: &'static [CellMatch],
    pub value_column: usize,
}

/// Column layout of a management plan export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLayout {
    /// Column of the title on the first row
    pub title_column: usize,
    /// Column holding row labels and action descriptions
    pub label_column: usize,
    /// Column holding the value of a labelled row
    pub value_column: usize,
    /// Label → field table
    pub labels: &'static [(&'static str, PlanField)],
    /// Cell marking a row as a planned action
    pub action_marker: CellMatch,
    /// Columns of the twenty-year, yearly and per-hectare yearly costs
    pub action_cost_columns: [usize; 3],
    pub total_cost: EconomicsRule,
    pub total_income: EconomicsRule,
    pub net_result: EconomicsRule,
}

const TOTAL_COST_CONDITIONS: &[CellMatch] = &[
    CellMatch { column: 0, text: "Ekonomi" },
    CellMatch { column: 1, text: "Summa" },
];
const TOTAL_INCOME_CONDITIONS: &[CellMatch] = &[CellMatch {
    column: 1,
    text: "Indikatorer: biotoper",
}];
// Third column alone, whatever the row label.
const NET_RESULT_CONDITIONS: &[CellMatch] = &[CellMatch { column: 2, text: "Netto" }];

impl Default for PlanLayout {
    fn default() -> Self {
        Self {
            title_column: 1,
            label_column: 0,
            value_column: 1,
            labels: SWEDISH_LABELS,
            action_marker: CellMatch { column: 1, text: "x" },
            action_cost_columns: [3, 4, 5],
            total_cost: EconomicsRule {
                conditions: TOTAL_COST_CONDITIONS,
                value_column: 4,
            },
            total_income: EconomicsRule {
                conditions: TOTAL_INCOME_CONDITIONS,
                value_column: 4,
            },
            net_result: EconomicsRule {
                conditions: NET_RESULT_CONDITIONS,
                value_column: 4,
            },
        }
    }
}

/// A split row; out-of-range columns read as empty.
struct Row<'a> {
    cells: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn new(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        Self {
            cells: line.split(',').collect(),
        }
    }

    fn cell(&self, column: usize) -> &'a str {
        self.cells.get(column).copied().unwrap_or("")
    }

    fn matches(&self, cell: CellMatch) -> bool {
        self.cell(cell.column) == cell.text
    }

    fn satisfies(&self, rule: &EconomicsRule) -> bool {
        rule.conditions.iter().all(|&cond| self.matches(cond))
    }
}

/// Parses a management plan using the Swedish export layout.
#[must_use]
pub fn parse_management_plan(text: &str) -> ManagementPlan {
    parse_management_plan_with(text, &PlanLayout::default())
}

/// Parses a management plan with an explicit column layout.
///
/// Never fails: anything the layout does not recognise is skipped.
#[must_use]
pub fn parse_management_plan_with(text: &str, layout: &PlanLayout) -> ManagementPlan {
    let mut plan = ManagementPlan::default();

    for (index, line) in text.split('\n').enumerate() {
        let row = Row::new(line);

        if index == 0 {
            let title = row.cell(layout.title_column);
            if !title.is_empty() {
                plan.title = title.to_string();
            }
        }

        let label = row.cell(layout.label_column);
        let value = row.cell(layout.value_column);
        if let Some(&(_, field)) = layout.labels.iter().find(|(name, _)| *name == label)
            && !value.is_empty()
        {
            *field.slot(&mut plan) = value.to_string();
        }

        if row.matches(layout.action_marker) && !label.trim().is_empty() {
            let [twenty_years, per_year, per_hectare_year] = layout.action_cost_columns;
            plan.actions.push(PlanAction {
                action: label.to_string(),
                cost_20_years: row.cell(twenty_years).to_string(),
                cost_per_year: row.cell(per_year).to_string(),
                cost_per_hectare_year: row.cell(per_hectare_year).to_string(),
            });
        }

        // Independent checks: one row may fill several totals.
        if row.satisfies(&layout.total_cost) {
            plan.economics.total_cost = row.cell(layout.total_cost.value_column).to_string();
        }
        if row.satisfies(&layout.total_income) {
            plan.economics.total_income = row.cell(layout.total_income.value_column).to_string();
        }
        if row.satisfies(&layout.net_result) {
            plan.economics.net_result = row.cell(layout.net_result.value_column).to_string();
        }
    }

    debug!(
        "Parsed management plan '{}' with {} action(s)",
        plan.title,
        plan.actions.len()
    );
    plan
}
