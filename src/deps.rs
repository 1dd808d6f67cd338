use std::process::{Command, Stdio};

use tracing::debug;

use crate::{
    cli::OutputMode,
    error::Result,
    git::GitRepo,
    sink::{ClipboardSink, OutputSink, StdoutSink},
    xml::{self, XmlQuery},
};

/// The external collaborators a run needs, probed once before any project
/// work so a missing tool aborts early.
pub struct Collaborators {
    pub xml: Box<dyn XmlQuery>,
    pub sink: Box<dyn OutputSink>,
}

pub fn check(output: OutputMode) -> Result<Collaborators> {
    let git = GitRepo::version()?;
    debug!("found {git}");

    let xml = xml::detect()?;
    let sink: Box<dyn OutputSink> = match output {
        OutputMode::Clipboard => Box::new(ClipboardSink::detect()?),
        OutputMode::Stdout => Box::new(StdoutSink),
    };
    Ok(Collaborators { xml, sink })
}

/// Check if a command is available on the system
pub(crate) fn is_available(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
