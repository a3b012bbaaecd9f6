use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::errors::ClipboardError;

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

pub type DynClipboard = Arc<dyn Clipboard + Send + Sync>;

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Host clipboard reached through the platform's copy utility, fed on stdin.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tool: Option<(PathBuf, Vec<String>)>,
}

impl SystemClipboard {
    /// First candidate tool found on PATH.
    pub fn detect() -> Self {
        let tool = CANDIDATES.iter().find_map(|(name, args)| {
            which::which(name).ok().map(|p| (p, args.iter().map(|a| a.to_string()).collect()))
        });
        match &tool {
            Some((p, _)) => tracing::debug!(tool = %p.display(), "clipboard tool found"),
            None => tracing::debug!("no clipboard tool on PATH"),
        }
        Self { tool }
    }

    pub fn is_available(&self) -> bool {
        self.tool.is_some()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let (program, args) = self.tool.as_ref().ok_or(ClipboardError::Unavailable)?;
        let tool = program.display().to_string();

        // xclip and wl-copy leave a child behind to serve the selection. It
        // inherits any pipe we hand out, so only stdin is piped and we wait on
        // the tool itself, never on EOF.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A tool that exits early closes the pipe; its exit status says why.
            match stdin.write_all(text.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Failed { tool, reason: format!("exit {}", status.code().unwrap_or_default()) })
        }
    }
}
