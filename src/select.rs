use regex::Regex;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    git::{Commits, GitRepo},
    prompt::SelectionPrompt,
};

/// How many recent commits the interactive picker offers.
pub const INTERACTIVE_CANDIDATES: usize = 10;

/// What the user asked to include in the comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCriteria {
    /// The last N commits.
    Last(usize),
    /// Every commit whose message matches the pattern.
    Matching(String),
    /// The pattern applied within the last N commits; the pattern never
    /// widens the window.
    LastMatching { number: usize, pattern: String },
    /// Manual marking of the most recent commits.
    Interactive,
}

impl SelectionCriteria {
    fn limit(&self) -> Option<usize> {
        match self {
            SelectionCriteria::Last(n) => Some(*n),
            SelectionCriteria::LastMatching { number, .. } => Some(*number),
            _ => None,
        }
    }

    fn pattern(&self) -> Option<&str> {
        match self {
            SelectionCriteria::Matching(pattern) => Some(pattern),
            SelectionCriteria::LastMatching { pattern, .. } => Some(pattern),
            _ => None,
        }
    }

    /// The filter description quoted back to the user when nothing matches.
    fn describe(&self) -> String {
        match self {
            SelectionCriteria::Last(n) => format!("--number {n}"),
            SelectionCriteria::Matching(pattern) => format!("--grep \"{pattern}\""),
            SelectionCriteria::LastMatching { number, pattern } => {
                format!("--number {number} --grep \"{pattern}\"")
            }
            SelectionCriteria::Interactive => String::new(),
        }
    }
}

/// Produces the commits the comment reports on: the current identity's
/// commits on the resolved branch, narrowed by the criteria.
pub struct CommitSelector<'a> {
    repo: &'a GitRepo,
    author: String,
    branch: String,
}

impl<'a> CommitSelector<'a> {
    pub fn new(repo: &'a GitRepo, author: &str, branch: &str) -> CommitSelector<'a> {
        CommitSelector {
            repo,
            author: author.to_owned(),
            branch: branch.to_owned(),
        }
    }

    /// Runs the selection. The result is newest first; display ordering is
    /// the assembler's concern.
    pub fn select(
        &self,
        criteria: &SelectionCriteria,
        prompt: &dyn SelectionPrompt,
    ) -> Result<Commits> {
        // The identity must have pushed something at all; an empty history
        // is fatal, not a retry.
        if self.repo.log(&self.branch, &self.author, Some(1))?.is_empty() {
            return Err(Error::NoPushedCommits {
                author: self.author.clone(),
                branch: self.branch.clone(),
            });
        }

        if *criteria == SelectionCriteria::Interactive {
            let candidates =
                self.repo
                    .log(&self.branch, &self.author, Some(INTERACTIVE_CANDIDATES))?;
            return pick_interactively(&candidates, prompt);
        }

        let fetched = self.repo.log(&self.branch, &self.author, criteria.limit())?;
        let selected = filter_selection(fetched, criteria)?;
        if selected.is_empty() {
            return Err(Error::NoMatch {
                author: self.author.clone(),
                filter: criteria.describe(),
            });
        }
        debug!("{} commit(s) selected", selected.len());
        Ok(selected)
    }
}

/// Applies count/pattern narrowing to a newest-first commit list. The
/// pattern only ever filters within the last-N window.
fn filter_selection(mut commits: Commits, criteria: &SelectionCriteria) -> Result<Commits> {
    if let Some(n) = criteria.limit() {
        commits.truncate(n);
    }
    if let Some(pattern) = criteria.pattern() {
        let re = Regex::new(pattern).map_err(|e| Error::Pattern {
            pattern: pattern.to_owned(),
            source: e,
        })?;
        commits.retain(|commit| commit.matches(&re));
    }
    Ok(commits)
}

/// Loops the prompt until at least one candidate is marked. An empty
/// marking asks again; it is never an error.
fn pick_interactively(candidates: &Commits, prompt: &dyn SelectionPrompt) -> Result<Commits> {
    loop {
        let marked = prompt.choose(candidates)?;
        if marked.is_empty() {
            info!("nothing was marked, reopening the selection");
            continue;
        }
        let selected: Commits = candidates
            .iter()
            .filter(|commit| marked.contains(&commit.hash))
            .cloned()
            .collect();
        if !selected.is_empty() {
            return Ok(selected);
        }
    }
}
