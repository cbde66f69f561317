//! Predefined repository scenarios
//!
//! Each scenario builds a history with pinned timestamps so rendered output is stable.

#![allow(dead_code)]

use super::repository::*;
use git_logview::core::error::Result;

/// Ids of the commits a scenario created, oldest first
pub struct History {
    pub repo: TestRepo,
    pub ids: Vec<String>,
}

/// Scenario: three commits on `main`, each touching a different file
pub fn create_linear_history() -> Result<History> {
    let mut repo = setup_test_repo()?;
    let mut ids = Vec::new();

    create_file(&repo.path, "README.md", "# Project\n")?;
    ids.push(repo.commit_all("Initial commit")?);

    create_file(&repo.path, "src/lib.rs", "pub fn answer() -> u32 {\n    42\n}\n")?;
    ids.push(repo.commit_all("Add library\n\nExposes the answer.")?);

    create_file(&repo.path, "README.md", "# Project\n\nNow with docs.\n")?;
    ids.push(repo.commit_all("Document project")?);

    Ok(History { repo, ids })
}

/// Scenario: a topic branch merged back into `main` with a merge commit
///
/// Ids: base, main work, topic work, merge.
pub fn create_merge_history() -> Result<History> {
    let mut repo = setup_test_repo()?;
    let mut ids = Vec::new();

    create_file(&repo.path, "base.txt", "base\n")?;
    ids.push(repo.commit_all("Base")?);

    repo.git(&["checkout", "-q", "-b", "topic"])?;
    create_file(&repo.path, "topic.txt", "topic\n")?;
    let topic = repo.commit_all("Topic work")?;

    repo.git(&["checkout", "-q", "main"])?;
    create_file(&repo.path, "main.txt", "main\n")?;
    ids.push(repo.commit_all("Main work")?);
    ids.push(topic);

    ids.push(repo.commit(&["merge", "-q", "--no-ff", "-m", "Merge topic", "topic"])?);
    Ok(History { repo, ids })
}

/// Scenario: the linear history with its newest commit annotated in the default and
/// `review` notes refs
pub fn create_noted_history() -> Result<History> {
    let history = create_linear_history()?;
    let head = history.ids[2].clone();
    history.repo.add_note("commits", &head, "Default note")?;
    history.repo.add_note("review", &head, "Approved\nby QA")?;
    Ok(history)
}
