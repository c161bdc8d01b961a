//! Workshop stage branches

use crate::commit::{commit_marker, safe_commit};
use crate::init::{
    branch_exists, checkout_branch, create_branch, current_branch, validate_branch_name,
};
use camino::Utf8Path;
use postgen_core::Result;
use tracing::{info, warn};

/// Options for [`create_branch_sequence`]
#[derive(Debug, Clone, Default)]
pub struct BranchSequenceOptions {
    /// When set, README.md is replaced with this content on every new branch
    pub readme: Option<String>,
}

/// Branches handled by [`create_branch_sequence`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSequence {
    /// Newly created, in creation order
    pub created: Vec<String>,
    /// Already present before the call and left untouched
    pub existing: Vec<String>,
}

/// Create one branch per name, each starting from the tip of `base_branch`.
///
/// Every new branch gets an empty `Initialize <name> branch` commit so it is
/// distinguishable from the base even when no content differs, followed by
/// the optional README rewrite. The base is checked out again before each
/// branch and once more at the end. If the base does not exist, the branch
/// current at call time is used as the starting point instead.
///
/// # Errors
/// Returns error if a name is invalid or creating/committing a branch fails.
/// Names are validated before anything is created.
pub async fn create_branch_sequence(
    path: &Utf8Path,
    names: &[String],
    base_branch: &str,
    options: &BranchSequenceOptions,
) -> Result<BranchSequence> {
    for name in names {
        validate_branch_name(name)?;
    }

    let start = match checkout_branch(path, base_branch).await {
        Ok(()) => Some(base_branch.to_string()),
        Err(e) => {
            warn!(
                "Base branch '{}' unavailable ({}), branching from the current branch",
                base_branch, e
            );
            Some(current_branch(path).await?).filter(|branch| !branch.is_empty())
        }
    };

    let mut sequence = BranchSequence::default();

    for name in names {
        if sequence.created.contains(name) || sequence.existing.contains(name) {
            continue;
        }

        if branch_exists(path, name).await? {
            warn!("Branch '{}' already exists, leaving it as is", name);
            sequence.existing.push(name.clone());
            continue;
        }

        if let Some(start) = &start {
            checkout_branch(path, start).await?;
        }

        create_branch(path, name).await?;
        commit_marker(path, &format!("Initialize {} branch", name)).await?;

        if let Some(readme) = &options.readme {
            tokio::fs::write(path.join("README.md"), readme).await?;
            safe_commit(path, &format!("docs: branch-specific README for {}", name)).await?;
        }

        info!("Branch '{}' ready", name);
        sequence.created.push(name.clone());
    }

    if let Some(start) = &start {
        if let Err(e) = checkout_branch(path, start).await {
            warn!("Could not return to '{}': {}", start, e);
        }
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::count_commits;
    use crate::init::list_branches;
    use crate::test_support::committed_repo;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_sequence_creates_distinct_branches() {
        let (_temp_dir, path) = committed_repo().await;

        let sequence = create_branch_sequence(
            &path,
            &names(&["a", "b", "c"]),
            "main",
            &BranchSequenceOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(sequence.created, names(&["a", "b", "c"]));
        assert_eq!(current_branch(&path).await.unwrap(), "main");
        assert_eq!(list_branches(&path).await.unwrap(), names(&["a", "b", "c", "main"]));

        for branch in ["a", "b", "c"] {
            let ahead = count_commits(&path, &format!("main..{}", branch))
                .await
                .unwrap();
            assert!(ahead >= 1, "{} has no commit beyond main", branch);
        }
    }

    #[tokio::test]
    async fn test_branches_start_from_base() {
        let (_temp_dir, path) = committed_repo().await;

        create_branch_sequence(
            &path,
            &names(&["first", "second"]),
            "main",
            &BranchSequenceOptions::default(),
        )
        .await
        .unwrap();

        // "second" does not contain the marker commit of "first"
        assert_eq!(count_commits(&path, "main..second").await.unwrap(), 1);
        assert_eq!(count_commits(&path, "first..second").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_readme_is_rewritten_per_branch() {
        let (_temp_dir, path) = committed_repo().await;
        let options = BranchSequenceOptions {
            readme: Some("# Stage\n".to_string()),
        };

        create_branch_sequence(&path, &names(&["easy"]), "main", &options)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(path.join("README.md")).unwrap(),
            "# test\n"
        );
        checkout_branch(&path, "easy").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(path.join("README.md")).unwrap(),
            "# Stage\n"
        );
        assert_eq!(count_commits(&path, "main..easy").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_existing_and_duplicate_names_are_skipped() {
        let (_temp_dir, path) = committed_repo().await;
        let options = BranchSequenceOptions::default();

        create_branch_sequence(&path, &names(&["easy"]), "main", &options)
            .await
            .unwrap();
        let sequence =
            create_branch_sequence(&path, &names(&["easy", "hard", "hard"]), "main", &options)
                .await
                .unwrap();

        assert_eq!(sequence.created, names(&["hard"]));
        assert_eq!(sequence.existing, names(&["easy"]));
    }

    #[tokio::test]
    async fn test_missing_base_uses_current_branch() {
        let (_temp_dir, path) = committed_repo().await;

        let sequence = create_branch_sequence(
            &path,
            &names(&["stage"]),
            "trunk",
            &BranchSequenceOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(sequence.created, names(&["stage"]));
        assert_eq!(current_branch(&path).await.unwrap(), "main");
    }

    #[tokio::test]
    async fn test_invalid_name_creates_nothing() {
        let (_temp_dir, path) = committed_repo().await;

        let result = create_branch_sequence(
            &path,
            &names(&["ok", "not ok"]),
            "main",
            &BranchSequenceOptions::default(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(list_branches(&path).await.unwrap(), names(&["main"]));
    }
}
