use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// The format of the commit output from `git log`
pub const LOG_FORMAT: &str = "%H%n%h%n%s%n%b%n==END==";

/// The struct representation of a `Commit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The 40 char hash
    pub hash: String,
    /// The abbreviated hash
    pub short_hash: String,
    /// The commit subject
    pub subject: String,
    /// The free-text body; paragraphs are delimited by blank lines. Empty
    /// when the commit has no description beyond the subject.
    pub body: String,
}

impl Commit {
    /// Whether the commit message (subject or body) matches the pattern.
    pub fn matches(&self, re: &Regex) -> bool {
        re.is_match(&self.subject) || re.is_match(&self.body)
    }
}

/// A convienience type for multiple commits
pub type Commits = Vec<Commit>;

/// A thin wrapper around the `git` binary, rooted at one working tree.
#[derive(Debug, Clone)]
pub struct GitRepo {
    work_tree: PathBuf,
}

impl GitRepo {
    /// Reports the installed git version, or that git is missing entirely.
    pub fn version() -> Result<String> {
        let output = Command::new("git")
            .arg("--version")
            .output()
            .map_err(missing_git)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    /// Resolves the repository toplevel for a directory.
    pub fn toplevel<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir.as_ref())
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(missing_git)?;
        if !output.status.success() {
            return Err(Error::ProjectNotFound(dir.as_ref().to_path_buf()));
        }
        let buf = String::from_utf8_lossy(&output.stdout);
        Ok(PathBuf::from(buf.trim_matches('\n')))
    }

    pub fn at<P: AsRef<Path>>(work_tree: P) -> GitRepo {
        GitRepo {
            work_tree: work_tree.as_ref().to_path_buf(),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!("running git {}", args.join(" "));
        Command::new("git")
            .arg("-C")
            .arg(&self.work_tree)
            .args(args)
            .output()
            .map_err(missing_git)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(Error::Git {
                cmd: args.first().copied().unwrap_or("").to_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        // `git config --get` exits nonzero when the key is unset
        let output = self.output(&["config", "--get", key])?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        Ok((!value.is_empty()).then_some(value))
    }

    /// The identity commits are filtered by: `user.email`, falling back to
    /// `user.name`.
    pub fn user_identity(&self) -> Result<String> {
        if let Some(email) = self.config_value("user.email")? {
            return Ok(email);
        }
        if let Some(name) = self.config_value("user.name")? {
            debug!("user.email not set, falling back to user.name");
            return Ok(name);
        }
        Err(Error::MissingIdentity)
    }

    /// The short name of the current upstream tracking branch, if any.
    pub fn upstream(&self) -> Result<Option<String>> {
        let output = self.output(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])?;
        if !output.status.success() {
            debug!("no upstream tracking branch resolved");
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        Ok((!name.is_empty()).then_some(name))
    }

    /// Lists the remote branches, skipping symbolic `HEAD` entries.
    pub fn remote_branches(&self) -> Result<Vec<String>> {
        let output = self.run(&["branch", "-r", "--format=%(refname:short)"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.ends_with("/HEAD"))
            .map(ToOwned::to_owned)
            .collect())
    }

    /// Retrieves the commits by `author` reachable from `reference`, newest
    /// first, optionally limited to the most recent `limit`.
    pub fn log(&self, reference: &str, author: &str, limit: Option<usize>) -> Result<Commits> {
        let author_arg = format!("--author={author}");
        let format_arg = format!("--format={LOG_FORMAT}");
        let count_arg;

        let mut args: Vec<&str> = vec!["log", &author_arg, &format_arg];
        if let Some(n) = limit {
            count_arg = format!("--max-count={n}");
            args.push(&count_arg);
        }
        args.push(reference);

        let output = self.run(&args)?;
        Ok(output
            .split("\n==END==\n")
            .filter_map(parse_raw_commit)
            .collect())
    }
}

fn missing_git(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::DependencyMissing("git")
    } else {
        Error::Io(e)
    }
}

/// Parses one record of `LOG_FORMAT` output. Returns `None` for records
/// without a hash line, such as the trailing empty split.
pub fn parse_raw_commit(commit_str: &str) -> Option<Commit> {
    let mut lines = commit_str.lines();

    let hash = lines.next()?.trim().to_owned();
    if hash.is_empty() {
        return None;
    }
    let short_hash = lines.next().unwrap_or("").trim().to_owned();
    let subject = lines.next().unwrap_or("").to_owned();

    // The body keeps its internal blank lines; only the padding the log
    // format adds around it is stripped.
    let body = lines.collect::<Vec<_>>().join("\n");
    let body = body.trim_matches('\n').to_owned();

    Some(Commit {
        hash,
        short_hash,
        subject,
        body,
    })
}
