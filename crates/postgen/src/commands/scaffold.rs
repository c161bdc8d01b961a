//! `postgen scaffold`: filesystem steps only

use anyhow::Result;

use super::Session;
use crate::cli::GlobalArgs;

pub async fn run(args: &GlobalArgs) -> Result<()> {
    let mut session = Session::load(args)?;
    session.scaffold().await?;
    session.finish();
    Ok(())
}
