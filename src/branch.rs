use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    git::GitRepo,
};

/// Determines the branch the comment reports on: the upstream tracking
/// branch when one is configured, otherwise an interactive pick from the
/// remote branches.
pub struct BranchResolver<'a> {
    repo: &'a GitRepo,
}

impl<'a> BranchResolver<'a> {
    pub fn new(repo: &'a GitRepo) -> BranchResolver<'a> {
        BranchResolver { repo }
    }

    /// Resolves the branch. `interactive` is false in `--standard-output`
    /// mode, where prompting would block a redirected run.
    pub fn resolve(&self, interactive: bool) -> Result<String> {
        if let Some(upstream) = self.repo.upstream()? {
            debug!("upstream tracking branch is {upstream}");
            return Ok(upstream);
        }
        if !interactive {
            return Err(Error::NoUpstream);
        }

        info!("no upstream tracking branch, asking for one");
        let branches = self.repo.remote_branches()?;
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stderr();
        prompt_for_branch(&branches, &mut input, &mut out)
    }
}

/// Asks until a non-empty choice is made: either a 1-based index into the
/// listing or a branch name typed out. EOF on the input behaves like the
/// non-interactive case.
fn prompt_for_branch<R: BufRead, W: Write>(
    branches: &[String],
    input: &mut R,
    out: &mut W,
) -> Result<String> {
    loop {
        writeln!(out, "The current branch has no upstream. Remote branches:")?;
        for (i, branch) in branches.iter().enumerate() {
            writeln!(out, "  {:2}) {branch}", i + 1)?;
        }
        write!(out, "Branch to report on (number or name): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::NoUpstream);
        }
        let choice = line.trim();
        if choice.is_empty() {
            continue;
        }
        match choice.parse::<usize>() {
            Ok(i) if i >= 1 && i <= branches.len() => return Ok(branches[i - 1].clone()),
            Ok(_) => {
                writeln!(out, "no such entry")?;
                continue;
            }
            Err(_) => return Ok(choice.to_owned()),
        }
    }
}
