//! Terminal output utilities

use console::style;
use postgen_core::StepOutcome;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Outcome label colored by category
pub fn styled_outcome(outcome: &StepOutcome) -> String {
    let label = outcome.label();
    match outcome {
        StepOutcome::Done => style(label).green().to_string(),
        StepOutcome::SkippedEmpty | StepOutcome::Skipped { .. } => style(label).dim().to_string(),
        StepOutcome::SkippedMissingTool { .. } => style(label).yellow().to_string(),
        StepOutcome::FailedNonFatal { .. } => style(label).red().bold().to_string(),
    }
}
