//! Shared tracing setup for MoveKit binaries.
//!
//! Everything of interest goes to a size-capped file under
//! `~/.movekit/logs`; the console layer is filtered down to warnings while
//! the TUI owns the terminal, since any stray line would corrupt the form
//! rendering.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "movekit=info,movekit_sink=info,movekit_handoff=info";
const MAX_LOG_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Logging options decided by the CLI.
pub struct LogConfig {
    pub verbose: bool,
    pub tui_mode: bool,
}

/// Initialize tracing with a capped file writer plus stderr output.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let log_path = ensure_logs_dir()
        .context("Failed to ensure log directory")?
        .join("movekit.log");
    let writer = CappedFileWriter::open(log_path)?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let console_filter = if config.tui_mode {
        EnvFilter::new("warn")
    } else if config.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(console_filter),
        )
        .init();

    Ok(())
}

/// The MoveKit home directory: `~/.movekit`, overridable via `MOVEKIT_HOME`.
pub fn movekit_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("MOVEKIT_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".movekit")
}

/// The logs directory: `~/.movekit/logs`.
pub fn logs_dir() -> PathBuf {
    movekit_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Append-only writer that swaps the file aside (`movekit.log.old`) once it
/// grows past the size cap. One previous generation is enough for a tool
/// whose sessions last minutes.
#[derive(Clone)]
struct CappedFileWriter {
    inner: Arc<Mutex<CappedFile>>,
}

struct CappedFile {
    path: PathBuf,
    file: File,
    size: u64,
}

impl CappedFileWriter {
    fn open(path: PathBuf) -> Result<Self> {
        let file = append_handle(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            inner: Arc::new(Mutex::new(CappedFile { path, file, size })),
        })
    }
}

fn append_handle(path: &PathBuf) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl CappedFile {
    fn rotate(&mut self) -> io::Result<()> {
        let _ = self.file.flush();
        let old = self.path.with_extension("log.old");
        if self.path.exists() {
            fs::rename(&self.path, &old)?;
        }
        self.file = append_handle(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for CappedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

struct CappedFileGuard {
    inner: Arc<Mutex<CappedFile>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CappedFileWriter {
    type Writer = CappedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        CappedFileGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for CappedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.flush()
    }
}
