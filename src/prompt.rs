use std::{
    env, fs,
    io::{self, Write},
    process::{Command, Stdio},
};

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    git::Commit,
};

/// Fallback editor when `$EDITOR` is not set.
pub const DEFAULT_EDITOR: &str = "vi";

/// Presents candidate commits for manual marking.
pub trait SelectionPrompt {
    /// Returns the full hashes the user marked, in marking order and
    /// deduplicated. An empty set means "nothing chosen, ask again".
    fn choose(&self, candidates: &[Commit]) -> Result<IndexSet<String>>;
}

/// Marks commits through the user's editor: the candidates are written to a
/// scratch file, the editor runs with inherited stdio, and the saved file is
/// parsed for marks.
#[derive(Debug, Clone)]
pub struct EditorPrompt {
    editor: String,
}

impl EditorPrompt {
    /// Resolves the editor: config override → `$EDITOR` → `vi`.
    pub fn from_env(override_editor: Option<&str>) -> EditorPrompt {
        let editor = override_editor
            .map(ToOwned::to_owned)
            .or_else(|| env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_owned());
        EditorPrompt { editor }
    }
}

impl SelectionPrompt for EditorPrompt {
    fn choose(&self, candidates: &[Commit]) -> Result<IndexSet<String>> {
        // tempfile creates the scratch file with owner-only permissions and
        // removes it again when the guard drops.
        let mut scratch = tempfile::Builder::new()
            .prefix("cnote-select-")
            .suffix(".txt")
            .tempfile()?;
        scratch.write_all(render_candidates(candidates).as_bytes())?;
        scratch.flush()?;

        let mut parts = self.editor.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_EDITOR);
        debug!("opening {} with `{program}`", scratch.path().display());

        // The editor owns the terminal until the user closes it.
        let status = Command::new(program)
            .args(parts)
            .arg(scratch.path())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    Error::Editor(format!("`{program}` was not found"))
                } else {
                    Error::Io(e)
                }
            })?;
        if !status.success() {
            return Err(Error::Editor(format!("`{program}` exited with {status}")));
        }

        let text = fs::read_to_string(scratch.path())?;
        Ok(parse_marked(&text, candidates))
    }
}

fn render_candidates(candidates: &[Commit]) -> String {
    let mut text = String::from(
        "# Mark the commits to include in the comment by replacing the\n\
         # leading `.` with `x`, then save and close this file.\n\
         #\n",
    );
    for commit in candidates {
        text.push_str(&format!(".  {}  {}\n", commit.short_hash, commit.subject));
    }
    text
}

/// Picks the marked hashes out of the saved scratch file. Marks against
/// hashes that are not in the candidate list are ignored with a warning.
fn parse_marked(text: &str, candidates: &[Commit]) -> IndexSet<String> {
    let marked_re = regex!(r"^[xX*]\s+([0-9a-fA-F]{4,40})\b");
    let mut chosen = IndexSet::new();

    for line in text.lines() {
        let line = line.trim_start();
        if line.starts_with('#') {
            continue;
        }
        let caps = match marked_re.captures(line) {
            Some(caps) => caps,
            None => continue,
        };
        let id = &caps[1];
        match candidates
            .iter()
            .find(|c| c.hash == id || c.short_hash == id)
        {
            Some(commit) => {
                chosen.insert(commit.hash.clone());
            }
            None => warn!("ignoring mark for unknown commit {id}"),
        }
    }
    chosen
}
