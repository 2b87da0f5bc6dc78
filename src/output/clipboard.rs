//! Best-effort clipboard access through the platform's clipboard tools.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

/// A clipboard tool and its arguments.
type ClipboardCommand = (&'static str, &'static [&'static str]);

/// Clipboard tools to try, in order.
#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[("pbcopy", &[])];

#[cfg(windows)]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", windows)))]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Copies `text` to the clipboard.
///
/// Returns whether a clipboard tool accepted the text. Failures are logged
/// at debug level and otherwise ignored.
pub fn copy_to_clipboard(text: &str) -> bool {
    for (program, args) in CLIPBOARD_COMMANDS {
        match pipe_to(program, args, text) {
            Ok(()) => {
                debug!(program, bytes = text.len(), "Copied to clipboard");
                return true;
            }
            Err(e) => debug!(program, error = %e, "Clipboard tool failed"),
        }
    }
    false
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("{program} exited with {status}")))
    }
}
