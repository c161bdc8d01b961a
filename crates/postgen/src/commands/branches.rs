//! `postgen branches`: commit an existing project and create its stage branches

use anyhow::Result;

use super::Session;
use crate::cli::GlobalArgs;

pub async fn run(args: &GlobalArgs) -> Result<()> {
    let mut session = Session::load(args)?;
    session.branches().await?;
    session.finish();
    Ok(())
}
