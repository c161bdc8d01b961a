//! `postgen publish`: create the hosted repository and push

use anyhow::Result;

use super::Session;
use crate::cli::GlobalArgs;
use crate::output;

pub async fn run(args: &GlobalArgs) -> Result<()> {
    let mut session = Session::load(args)?;

    if !session.quiet && !session.config.create_github_repo.is_enabled() {
        output::info("create_github_repo is n, nothing to publish");
    }

    session.publish().await?;
    session.finish();
    Ok(())
}
