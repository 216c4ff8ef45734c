//! Git operations for the publish pipeline.
//!
//! The repository itself is owned by external tooling; this module only
//! shells out for the three steps a publish needs: stage, commit, push.
//! Every command runs in the article's directory so the enclosing working
//! tree is discovered the way `git` itself discovers it.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Stage the given paths.
pub fn add(dir: &Path, paths: &[&Path]) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("add");
    for path in paths {
        cmd.arg(path);
    }
    run(cmd.current_dir(dir), "git add")
}

/// Commit staged changes with the given message.
pub fn commit(dir: &Path, message: &str) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.args(["commit", "-m", message]);
    run(cmd.current_dir(dir), "git commit")
}

/// Push the branch to the remote.
pub fn push(dir: &Path, remote: &str, branch: &str) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.args(["push", remote, branch]);
    run(cmd.current_dir(dir), "git push")
}

fn run(cmd: &mut Command, what: &str) -> Result<()> {
    let output = cmd
        .output()
        .with_context(|| format!("Failed to execute '{}'. Is git installed?", what))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{} failed: {}", what, stderr.trim());
    }

    Ok(())
}
