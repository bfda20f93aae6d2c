//! Console and file emission of rendered output.
//!
//! The console stream always receives the rendered results. The optional
//! output file is an append-only log: a missing file is created atomically
//! with the whole block, an existing one is only ever appended to.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tempfile::Builder;
use tracing::debug;

/// Destination for everything the user is meant to read.
pub struct OutputSink {
    console: Box<dyn Write + Send>,
    quiet: bool,
}

impl OutputSink {
    /// Sink writing to an arbitrary console stream.
    pub fn new(console: Box<dyn Write + Send>, quiet: bool) -> Self {
        Self { console, quiet }
    }

    /// Sink writing to standard output.
    pub fn stdout(quiet: bool) -> Self {
        Self::new(Box::new(io::stdout()), quiet)
    }

    /// Write primary output. Never suppressed.
    pub fn emit(&mut self, text: &str) -> Result<()> {
        writeln!(self.console, "{}", text).context("Failed to write output")?;
        self.console.flush().context("Failed to flush output")
    }

    /// Write informational output, suppressed in quiet mode.
    pub fn info(&mut self, text: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(text)
    }
}

/// Append `content` plus a trailing newline to the file at `path`.
pub fn append_line_to_file(path: &Path, content: &str) -> Result<()> {
    let line = format!("{}\n", content);

    if path.exists() {
        return append(path, &line);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = staging_builder()
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    staged
        .write_all(line.as_bytes())
        .with_context(|| format!("Failed to stage output for {}", path.display()))?;

    match staged.persist_noclobber(path) {
        Ok(_) => {
            debug!("Created output file {}", path.display());
            Ok(())
        }
        // Someone else created it in the meantime; keep their content.
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => append(path, &line),
        Err(e) => Err(e.error)
            .with_context(|| format!("Failed to create output file {}", path.display())),
    }
}

/// Staged files get the mode a plain `create` would give (0666 less umask)
/// rather than tempfile's private 0600.
fn staging_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    builder.prefix(".deadscan-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}

fn append(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file: {}", path.display()))?;

    file.write_all(line.as_bytes())
        .with_context(|| format!("Failed to append to output file: {}", path.display()))?;

    debug!("Appended {} bytes to {}", line.len(), path.display());
    Ok(())
}

/// In-memory console for tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
