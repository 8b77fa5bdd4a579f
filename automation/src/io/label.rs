//! Label sinks used by the binary.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::host::LabelSink;

/// Label backed by a text file, rewritten atomically on every change.
#[derive(Debug, Clone)]
pub struct FileLabel {
    path: PathBuf,
    last: Option<String>,
}

impl FileLabel {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            last: None,
        }
    }
}

impl LabelSink for FileLabel {
    fn set_text(&mut self, text: &str) {
        if self.last.as_deref() == Some(text) {
            return;
        }
        let mut contents = text.to_string();
        contents.push('\n');
        // Failures are only logged; `last` stays stale so the next tick retries.
        match crate::io::write_atomic(&self.path, &contents) {
            Ok(()) => self.last = Some(text.to_string()),
            Err(err) => warn!(path = %self.path.display(), error = %err, "write progress label"),
        }
    }
}

/// Label printed to stdout whenever its text changes.
#[derive(Debug, Clone, Default)]
pub struct StdoutLabel {
    last: Option<String>,
}

impl LabelSink for StdoutLabel {
    fn set_text(&mut self, text: &str) {
        if self.last.as_deref() != Some(text) {
            println!("progress {text}");
            self.last = Some(text.to_string());
        }
    }
}
