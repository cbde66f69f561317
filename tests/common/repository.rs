//! Git repository management and setup utilities
//!
//! Provides functions for creating test repositories with a deterministic history and for
//! running the binary against them in an isolated environment.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use git_logview::core::error::{LogViewError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Author and committer time of the first fixture commit; each later commit is a minute on
pub const BASE_TIME: i64 = 1_700_000_000;

/// Test repository setup result. The TempDir must be kept alive for the duration of the
/// test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    /// Working tree of the repository
    pub path: PathBuf,
    /// Stand-in home directory so user-level git and app config stay out of the way
    pub home: PathBuf,
    commits: i64,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `$XDG_CONFIG_HOME` seen by the binary
    pub fn config_home(&self) -> PathBuf {
        self.home.join(".config")
    }

    /// Write the binary's defaults file
    pub fn write_defaults(&self, json: &str) -> Result<()> {
        let dir = self.config_home().join("git-logview");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("config.json"), json)?;
        Ok(())
    }

    /// Run git in the repository and return its trimmed stdout
    pub fn git(&self, args: &[&str]) -> Result<String> {
        let output = isolated(Command::new("git"), &self.home)
            .args(args)
            .current_dir(&self.path)
            .output()?;
        if !output.status.success() {
            return Err(LogViewError::Io(std::io::Error::other(format!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            ))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Commit everything in the working tree at the next fixture timestamp; returns the id
    pub fn commit_all(&mut self, message: &str) -> Result<String> {
        self.git(&["add", "-A"])?;
        self.commit(&["commit", "-q", "--allow-empty", "-m", message])
    }

    /// Run a committing git command at the next fixture timestamp; returns the new HEAD
    pub fn commit(&mut self, args: &[&str]) -> Result<String> {
        self.commits += 1;
        let date = commit_date(self.commits);
        let output = isolated(Command::new("git"), &self.home)
            .args(args)
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .current_dir(&self.path)
            .output()?;
        if !output.status.success() {
            return Err(LogViewError::Io(std::io::Error::other(format!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            ))));
        }
        self.git(&["rev-parse", "HEAD"])
    }

    /// Attach a note to `target` under `notes_ref` (short or full name)
    pub fn add_note(&self, notes_ref: &str, target: &str, message: &str) -> Result<()> {
        self.git(&["notes", "--ref", notes_ref, "add", "-f", "-m", message, target])?;
        Ok(())
    }

    /// The binary, run inside the repository with an isolated environment
    pub fn logview(&self) -> Command {
        let mut cmd = isolated(
            Command::cargo_bin("git-logview").expect("binary should be built"),
            &self.home,
        );
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("TERM", "dumb")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// `@<seconds> +0000` for the n-th fixture commit
pub fn commit_date(n: i64) -> String {
    format!("@{} +0000", BASE_TIME + n * 60)
}

fn isolated(mut cmd: Command, home: &Path) -> Command {
    cmd.env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE");
    cmd
}

/// Sets up a fresh git repository on branch `main`
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("repo");
    let home = temp_dir.path().join("home");
    fs::create_dir_all(&path)?;
    fs::create_dir_all(&home)?;

    let repo = TestRepo {
        temp_dir,
        path,
        home,
        commits: 0,
    };
    repo.git(&["init", "-q"])?;
    repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"])?;
    repo.git(&["config", "user.name", "Test User"])?;
    repo.git(&["config", "user.email", "test@example.com"])?;
    Ok(repo)
}

/// Creates a file with specified content in the repository
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Removes a file from the working tree
pub fn remove_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename))?;
    Ok(())
}
