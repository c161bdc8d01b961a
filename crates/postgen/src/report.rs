//! Run report rendering

use crate::output;
use postgen_core::{RunReport, StepRecord};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StepRow {
    step: String,
    outcome: String,
    detail: String,
}

impl From<&StepRecord> for StepRow {
    fn from(record: &StepRecord) -> Self {
        Self {
            step: record.step.clone(),
            outcome: output::styled_outcome(&record.outcome),
            detail: record.outcome.detail().to_string(),
        }
    }
}

/// Render the step table as a string
pub fn render_table(report: &RunReport) -> String {
    let rows: Vec<StepRow> = report.steps().iter().map(StepRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// Print the report: step table, reached phase and non-fatal failures
pub fn print(report: &RunReport) {
    if report.steps().is_empty() {
        output::info("No steps were run");
        return;
    }

    output::header("Summary");
    println!("{}", render_table(report));
    output::kv("Repository", report.phase().as_str());

    let failures: Vec<&StepRecord> = report.failures().collect();
    if failures.is_empty() {
        output::success("All steps completed");
    } else {
        for failure in failures {
            output::warning(&format!("{}: {}", failure.step, failure.outcome.detail()));
        }
    }
}
