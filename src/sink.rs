use std::{
    io::{self, BufWriter, Write},
    process::{Command, Stdio},
};

use tracing::debug;

use crate::{
    deps,
    error::{Error, Result},
};

/// The final destination of the assembled comment.
pub trait OutputSink {
    fn emit(&self, text: &str) -> Result<()>;
}

/// Platform clipboard commands in detection order:
/// `pbcopy` (macOS) → `wl-copy` (Wayland) → `xclip` (X11) → `xsel` (X11 fallback)
const CLIPBOARD_TOOLS: &[&[&str]] = &[
    &["pbcopy"],
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

/// Copies the text to the system clipboard through the platform tool that
/// was detected at startup.
pub struct ClipboardSink {
    tool: &'static [&'static str],
}

impl ClipboardSink {
    pub fn detect() -> Result<ClipboardSink> {
        for tool in CLIPBOARD_TOOLS {
            if deps::is_available(tool[0]) {
                debug!("using {} for clipboard copies", tool[0]);
                return Ok(ClipboardSink { tool });
            }
        }
        Err(Error::DependencyMissing("pbcopy, wl-copy, xclip or xsel"))
    }
}

impl OutputSink for ClipboardSink {
    fn emit(&self, text: &str) -> Result<()> {
        let program = self.tool[0];
        let mut child = Command::new(program)
            .args(&self.tool[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Clipboard(format!("failed to start {program}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| Error::Clipboard(format!("failed to write to {program}: {e}")))?;
        }

        let status = child
            .wait()
            .map_err(|e| Error::Clipboard(format!("failed to wait for {program}: {e}")))?;
        if !status.success() {
            return Err(Error::Clipboard(format!("{program} exited with {status}")));
        }
        Ok(())
    }
}

/// Prints the comment to standard output; logs stay on stderr.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, text: &str) -> Result<()> {
        let out = io::stdout();
        let mut out_buf = BufWriter::new(out.lock());
        out_buf.write_all(text.as_bytes())?;
        out_buf.flush().map_err(Into::into)
    }
}
