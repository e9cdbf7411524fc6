//! Log sinks: a size-bounded rotating file plus an optional console stream.

use chrono::Local;
use std::{
    fmt::Display,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::utils::APP_NAME;

/// Rotate once the active file would grow past this many bytes.
pub const MAX_LOG_BYTES: u64 = 500_000;

/// Number of rotated files kept next to the active one.
pub const MAX_ROTATED_FILES: usize = 3;

const DEFAULT_LOG_FILTER: &str = "info";

/// Local-time timestamps, e.g. `2024-01-15 10:00:00`.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Append-only log file that shifts itself to `<name>.1`, `<name>.2`, ... when
/// it reaches `max_bytes`, keeping at most `max_files` rotations.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_files: usize,
    file: Option<File>,
    written: u64,
}

impl RotatingFile {
    pub fn open(
        dir: &Path,
        file_name: &str,
        max_bytes: u64,
        max_files: usize,
    ) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let file = Self::open_append(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(RotatingFile {
            path,
            max_bytes,
            max_files,
            file: Some(file),
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_append(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        // Windows refuses to rename a file with an open handle.
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        if self.max_files == 0 {
            fs::remove_file(&self.path)?;
        } else {
            let oldest = self.rotated_path(self.max_files);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.max_files).rev() {
                let from = self.rotated_path(index);
                if from.exists() {
                    fs::rename(&from, self.rotated_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.rotated_path(1))?;
        }

        self.file = Some(Self::open_append(&self.path)?);
        self.written = 0;
        Ok(())
    }

    fn active_file(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = Self::open_append(&self.path)?;
            self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file unavailable"))
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            // A failed rotation keeps appending to whatever file is usable.
            if let Err(e) = self.rotate() {
                eprintln!("failed to rotate {}: {}", self.path.display(), e);
            }
        }

        let written = self.active_file()?.write(buf)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the lifetime of the program so buffered
/// lines reach the file.
pub fn init_logging(log_dir: &Path, console: bool) -> crate::Result<WorkerGuard> {
    let file = RotatingFile::open(
        log_dir,
        &format!("{APP_NAME}.log"),
        MAX_LOG_BYTES,
        MAX_ROTATED_FILES,
    )?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(console.then(|| fmt::layer().with_timer(LocalTimer)))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_timer(LocalTimer),
        )
        .try_init()
        .map_err(|e| {
            io::Error::other(format!("Failed to set global default subscriber: {e}"))
        })?;

    Ok(guard)
}

/// Reports an error that ends the program. Without an installed subscriber
/// the message also goes to `fallback`, since `tracing` would drop it.
pub fn report_fatal<W: Write>(error: &dyn Display, logging_active: bool, mut fallback: W) {
    tracing::error!("{}", error);
    if !logging_active {
        let _ = writeln!(fallback, "{error}");
    }
}
