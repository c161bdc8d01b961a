//! Dependency locking (uv) and pre-commit hooks

use camino::Utf8Path;
use postgen_core::{Error, Result, StepOutcome, Tool, Toolchain};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info, warn};

const PYPROJECT: &str = "pyproject.toml";
const PRE_COMMIT_CONFIG: &str = ".pre-commit-config.yaml";

async fn run_tool(
    toolchain: &Toolchain,
    tool: Tool,
    cwd: &Utf8Path,
    args: &[&str],
) -> Result<Output> {
    let program = toolchain
        .path(tool)
        .ok_or_else(|| Error::tool_failed(tool.command(), "not installed"))?;

    debug!("Running: {} {}", tool.command(), args.join(" "));

    Ok(Command::new(program)
        .current_dir(cwd)
        .args(args)
        .output()
        .await?)
}

fn failure_message(tool: Tool, args: &[&str], output: &Output) -> String {
    format!(
        "{} {} exited with {}: {}",
        tool.command(),
        args.join(" "),
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    )
}

/// Lock and install the project's Python dependencies with uv.
///
/// A failing uv invocation is reported, never raised.
pub async fn sync_dependencies(root: &Utf8Path, toolchain: &Toolchain) -> Result<StepOutcome> {
    if !toolchain.has(Tool::Uv) {
        info!("Skipping uv: executable not found");
        return Ok(StepOutcome::missing_tool(Tool::Uv.command()));
    }
    if !root.join(PYPROJECT).is_file() {
        info!("Skipping uv: no {}", PYPROJECT);
        return Ok(StepOutcome::skipped(format!("no {}", PYPROJECT)));
    }

    let steps: [&[&str]; 2] = [
        &["lock", "--directory", root.as_str()],
        &["sync", "--locked", "--dev"],
    ];

    for args in steps {
        let output = run_tool(toolchain, Tool::Uv, root, args).await?;
        if !output.status.success() {
            let message = failure_message(Tool::Uv, args, &output);
            warn!("{}", message);
            return Ok(StepOutcome::failed(message));
        }
    }

    info!("Dependencies locked and synced");
    Ok(StepOutcome::Done)
}

/// Install the pre-commit hooks and run them over every file once.
///
/// # Errors
/// A failing hook run is only an error when `strict` is set
pub async fn run_pre_commit(
    root: &Utf8Path,
    toolchain: &Toolchain,
    strict: bool,
) -> Result<StepOutcome> {
    if !toolchain.has(Tool::PreCommit) {
        info!("pre-commit not found, hooks not installed");
        return Ok(StepOutcome::missing_tool(Tool::PreCommit.command()));
    }
    if !root.join(PRE_COMMIT_CONFIG).is_file() {
        debug!("No {}, skipping pre-commit", PRE_COMMIT_CONFIG);
        return Ok(StepOutcome::skipped(format!("no {}", PRE_COMMIT_CONFIG)));
    }

    let steps: [&[&str]; 2] = [&["install"], &["run", "-a"]];

    for args in steps {
        let output = run_tool(toolchain, Tool::PreCommit, root, args).await?;
        if output.status.success() {
            continue;
        }

        let message = failure_message(Tool::PreCommit, args, &output);
        if strict {
            return Err(Error::tool_failed(Tool::PreCommit.command(), message));
        }
        warn!("{}", message);
        return Ok(StepOutcome::failed(message));
    }

    info!("pre-commit hooks installed and run");
    Ok(StepOutcome::Done)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8Path::from_path(temp_dir.path()).unwrap().to_path_buf();
        for file in files {
            fs::write(root.join(file), "").unwrap();
        }
        (temp_dir, root)
    }

    #[tokio::test]
    async fn test_uv_missing_tool() {
        let (_temp_dir, root) = project(&[PYPROJECT]);

        let outcome = sync_dependencies(&root, &Toolchain::empty()).await.unwrap();
        assert_eq!(outcome, StepOutcome::missing_tool("uv"));
    }

    #[tokio::test]
    async fn test_uv_without_pyproject() {
        let (_temp_dir, root) = project(&[]);
        let toolchain = Toolchain::empty().with(Tool::Uv, "true");

        let outcome = sync_dependencies(&root, &toolchain).await.unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_uv_success_and_failure() {
        let (_temp_dir, root) = project(&[PYPROJECT]);

        let ok = Toolchain::empty().with(Tool::Uv, "true");
        assert_eq!(
            sync_dependencies(&root, &ok).await.unwrap(),
            StepOutcome::Done
        );

        let broken = Toolchain::empty().with(Tool::Uv, "false");
        let outcome = sync_dependencies(&root, &broken).await.unwrap();
        assert!(outcome.is_failure());
        assert!(outcome.detail().contains("uv lock"));
    }

    #[tokio::test]
    async fn test_pre_commit_requires_config() {
        let (_temp_dir, root) = project(&[]);
        let toolchain = Toolchain::empty().with(Tool::PreCommit, "true");

        let outcome = run_pre_commit(&root, &toolchain, true).await.unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_pre_commit_failure_strictness() {
        let (_temp_dir, root) = project(&[PRE_COMMIT_CONFIG]);
        let broken = Toolchain::empty().with(Tool::PreCommit, "false");

        let lenient = run_pre_commit(&root, &broken, false).await.unwrap();
        assert!(lenient.is_failure());

        let strict = run_pre_commit(&root, &broken, true).await;
        assert!(matches!(strict, Err(Error::ToolFailed { .. })));

        let ok = Toolchain::empty().with(Tool::PreCommit, "true");
        assert_eq!(
            run_pre_commit(&root, &ok, true).await.unwrap(),
            StepOutcome::Done
        );
    }
}
