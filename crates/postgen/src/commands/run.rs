//! `postgen run`: the whole hook

use anyhow::Result;
use postgen_core::StepOutcome;

use super::Session;
use crate::cli::GlobalArgs;

pub async fn run(args: &GlobalArgs) -> Result<()> {
    let mut session = Session::load(args)?;

    session.scaffold().await?;

    if session.config.wants_repository() {
        session.branches().await?;
        session.publish().await?;
    } else {
        session.report.record(
            "repository",
            StepOutcome::skipped("no hosted repository and no stage branches requested"),
        );
    }

    session.finish();
    Ok(())
}
