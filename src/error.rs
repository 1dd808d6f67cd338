use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling the various errors encountered while
/// locating the project, talking to its external collaborators, or selecting
/// and assembling the commits.
#[derive(Debug, Error)]
pub enum Error {
    #[error("required tool `{0}` was not found on this system")]
    DependencyMissing(&'static str),

    #[error("`{tool}` failed: {stderr}")]
    Tool { tool: String, stderr: String },

    #[error("git {cmd} failed: {stderr}")]
    Git { cmd: String, stderr: String },

    #[error("no Maven project at {0} (a pom.xml next to .git is required)")]
    ProjectNotFound(PathBuf),

    #[error("pom.xml does not provide the project {0}")]
    MetadataMissing(&'static str),

    #[error("neither user.email nor user.name is configured in git")]
    MissingIdentity,

    #[error("the current branch has no upstream tracking branch")]
    NoUpstream,

    #[error("{author} has no commits on {branch}")]
    NoPushedCommits { author: String, branch: String },

    #[error("no commit by {author} matches {filter}")]
    NoMatch { author: String, filter: String },

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("editor session failed: {0}")]
    Editor(String),

    #[error("clipboard copy failed: {0}")]
    Clipboard(String),

    #[error("failed to parse config file: {0}")]
    ConfigParse(PathBuf),

    #[error("cannot get current directory")]
    CurrentDir,

    #[error("fatal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
