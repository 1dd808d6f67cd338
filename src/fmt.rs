use std::io;

use crate::{
    error::Result,
    git::{Commit, Commits},
    project::ProjectMetadata,
};

/// The assembled comment: a fixed three-line header plus one entry per
/// commit, ordered oldest first.
#[derive(Debug, Clone)]
pub struct Comment {
    pub project: String,
    pub branch: String,
    pub version: String,
    /// Base URL for commit links; entries carry no link line when absent.
    pub base_url: Option<String>,
    /// Entries in display order (oldest first).
    pub entries: Commits,
}

impl Comment {
    /// Builds the comment from a selection. Selection order is newest
    /// first; the document renders oldest first.
    pub fn new(metadata: &ProjectMetadata, branch: &str, mut commits: Commits) -> Comment {
        commits.reverse();
        Comment {
            project: metadata.name.clone(),
            branch: branch.to_owned(),
            version: metadata.version.clone(),
            base_url: metadata.scm_url.clone(),
            entries: commits,
        }
    }

    /// The hyperlink for a commit: `<base>/commit/<hash>`.
    pub fn commit_link(&self, hash: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/commit/{}", base.trim_end_matches('/'), hash))
    }

    /// Renders the comment to a string.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        CommentWriter::new(&mut buf).write_comment(self)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Wraps a `std::io::Write` object to write the assembled comment.
pub struct CommentWriter<'a>(&'a mut dyn io::Write);

impl<'a> CommentWriter<'a> {
    /// Creates a new instance of the `CommentWriter` struct using a
    /// `std::io::Write` object.
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> CommentWriter<'a> {
        CommentWriter(writer)
    }

    fn write_header(&mut self, comment: &Comment) -> Result<()> {
        writeln!(self.0, "Project: {}", comment.project)?;
        writeln!(self.0, "Branch: {}", comment.branch)?;
        writeln!(self.0, "Version: {}", comment.version)?;
        writeln!(self.0).map_err(Into::into)
    }

    /// Writes one entry: bolded subject, link line (when a base URL is
    /// known) and the body with its paragraph breaks kept verbatim.
    fn write_entry(&mut self, comment: &Comment, entry: &Commit) -> Result<()> {
        writeln!(self.0, "**{}**", entry.subject)?;
        if let Some(link) = comment.commit_link(&entry.hash) {
            writeln!(self.0, "{link}")?;
        }
        if !entry.body.is_empty() {
            writeln!(self.0)?;
            writeln!(self.0, "{}", entry.body)?;
        }
        Ok(())
    }

    /// Writes the header and every entry, separated by single blank lines.
    pub fn write_comment(&mut self, comment: &Comment) -> Result<()> {
        self.write_header(comment)?;

        let mut entries = comment.entries.iter().peekable();
        while let Some(entry) = entries.next() {
            self.write_entry(comment, entry)?;
            if entries.peek().is_some() {
                writeln!(self.0)?;
            }
        }
        self.0.flush().map_err(Into::into)
    }
}
