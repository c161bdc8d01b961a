//! Step outcomes and the per-run report

use std::fmt;

/// Result category of a single non-fatal step.
///
/// Hard failures are not represented here: they surface as [`crate::Error`]
/// and abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step changed something
    Done,
    /// The step ran but had nothing to do (empty stage, nothing to remove)
    SkippedEmpty,
    /// The step was disabled or does not apply
    Skipped { reason: String },
    /// A required executable is not installed
    SkippedMissingTool { tool: String },
    /// The step failed but the run continues
    FailedNonFatal { message: String },
}

impl StepOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn missing_tool(tool: impl Into<String>) -> Self {
        Self::SkippedMissingTool { tool: tool.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::FailedNonFatal {
            message: message.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedNonFatal { .. })
    }

    /// Short category label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::SkippedEmpty => "nothing to do",
            Self::Skipped { .. } => "skipped",
            Self::SkippedMissingTool { .. } => "missing tool",
            Self::FailedNonFatal { .. } => "failed",
        }
    }

    /// Detail text, empty for outcomes without one
    pub fn detail(&self) -> &str {
        match self {
            Self::Done | Self::SkippedEmpty => "",
            Self::Skipped { reason } => reason,
            Self::SkippedMissingTool { tool } => tool,
            Self::FailedNonFatal { message } => message,
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail();
        if detail.is_empty() {
            write!(f, "{}", self.label())
        } else {
            write!(f, "{}: {}", self.label(), detail)
        }
    }
}

/// Repository lifecycle of one run. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RunPhase {
    #[default]
    Uninitialized,
    RepositoryReady,
    IdentityReady,
    BaseCommitted,
    BranchesCreated,
    RemoteLinked,
    Published,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::RepositoryReady => "repository ready",
            Self::IdentityReady => "identity ready",
            Self::BaseCommitted => "base committed",
            Self::BranchesCreated => "branches created",
            Self::RemoteLinked => "remote linked",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: String,
    pub outcome: StepOutcome,
}

/// Ordered record of every step of a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    steps: Vec<StepRecord>,
    phase: RunPhase,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step and hand its outcome back to the caller
    pub fn record(&mut self, step: impl Into<String>, outcome: StepOutcome) -> StepOutcome {
        self.steps.push(StepRecord {
            step: step.into(),
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Move to `phase` unless the run is already past it
    pub fn advance(&mut self, phase: RunPhase) {
        if phase > self.phase {
            self.phase = phase;
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Outcome of the last step recorded under `step`
    pub fn outcome_of(&self, step: &str) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .rev()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|record| record.outcome.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_only_moves_forward() {
        let mut report = RunReport::new();
        report.advance(RunPhase::BaseCommitted);
        report.advance(RunPhase::RepositoryReady);
        assert_eq!(report.phase(), RunPhase::BaseCommitted);

        report.advance(RunPhase::Published);
        assert_eq!(report.phase(), RunPhase::Published);
    }

    #[test]
    fn test_record_and_lookup() {
        let mut report = RunReport::new();
        report.record("commit", StepOutcome::Done);
        report.record("uv", StepOutcome::missing_tool("uv"));
        report.record("commit", StepOutcome::SkippedEmpty);
        report.record("push", StepOutcome::failed("rejected"));

        assert_eq!(report.steps().len(), 4);
        assert_eq!(report.outcome_of("commit"), Some(&StepOutcome::SkippedEmpty));
        assert_eq!(report.outcome_of("missing"), None);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(StepOutcome::Done.to_string(), "done");
        assert_eq!(
            StepOutcome::missing_tool("gh").to_string(),
            "missing tool: gh"
        );
        assert_eq!(
            StepOutcome::skipped("disabled").to_string(),
            "skipped: disabled"
        );
    }
}
