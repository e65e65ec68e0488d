//! The rotation-and-write engine.
//!
//! A [`RotatingWriter`] appends leveled lines to a live file at its path
//! prefix. Every write derives a suffix from the current time; when the suffix
//! changes the live file is closed, renamed to `<prefix>.<previous suffix>`,
//! and a fresh live file is opened. The time check, the rotation and the
//! append all happen under one lock, so concurrent writers never see a
//! half-rotated writer and never write into two generations at once.
//!
//! Failures stay inside the write path:
//!
//! * a rename that fails is skipped,
//! * a log directory that cannot be created sends output to stdout until the
//!   next rotation,
//! * a live file that cannot be opened panics with [`Error::Open`].

use crate::error::Error;
use crate::level::Level;
use crate::suffix::{Clock, SuffixFormat, SystemClock};
use crate::value::{Concat, Value};
use chrono::{DateTime, Local};
use std::fmt::{Display, Write as _};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Timestamp at the start of every line.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

enum Sink {
    Unopened,
    File(File),
    Console,
}

struct State {
    /// Window the live file belongs to; `None` until the first write.
    active_suffix: Option<String>,
    sink: Sink,
    console: Box<dyn Write + Send>,
}

impl State {
    fn append(&mut self, line: &[u8]) -> io::Result<()> {
        match &mut self.sink {
            Sink::File(file) => file.write_all(line),
            Sink::Console | Sink::Unopened => {
                self.console.write_all(line)?;
                self.console.flush()
            }
        }
    }
}

pub struct RotatingWriter {
    path_prefix: PathBuf,
    suffix_format: SuffixFormat,
    clock: Box<dyn Clock>,
    state: Mutex<State>,
}

impl RotatingWriter {
    /// Creates a writer whose live file is `path_prefix`.
    ///
    /// Nothing touches the filesystem until the first write.
    pub fn new(path_prefix: impl Into<PathBuf>, suffix_format: SuffixFormat) -> Self {
        Self::with_parts(
            path_prefix.into(),
            suffix_format,
            Box::new(SystemClock),
            Box::new(io::stdout()),
        )
    }

    pub(crate) fn with_parts(
        path_prefix: PathBuf,
        suffix_format: SuffixFormat,
        clock: Box<dyn Clock>,
        console: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            path_prefix,
            suffix_format,
            clock,
            state: Mutex::new(State {
                active_suffix: None,
                sink: Sink::Unopened,
                console,
            }),
        }
    }

    pub fn path_prefix(&self) -> &Path {
        &self.path_prefix
    }

    pub fn suffix_format(&self) -> &SuffixFormat {
        &self.suffix_format
    }

    /// Path a live file is renamed to when the window `suffix` is finished.
    pub fn rotated_path(&self, suffix: &str) -> PathBuf {
        let mut name = self.path_prefix.clone().into_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Writes one `<timestamp> [<LEVEL>] <message>` line, rotating first if the
    /// time window changed since the previous write.
    ///
    /// # Panics
    ///
    /// Panics when the live file cannot be opened even though its directory
    /// exists. A logger that lost its output target does not keep running.
    pub fn log<M: Display>(&self, level: Level, message: M) {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let suffix = self.suffix_format.format(&now);
        if state.active_suffix.as_deref() != Some(suffix.as_str()) {
            if let Err(err) = self.rotate(&mut state, suffix) {
                panic!("{err}");
            }
        }

        let line = format_line(&now, level, &message);
        if let Err(err) = state.append(line.as_bytes()) {
            warn!(path = %self.path_prefix.display(), error = %err, "Failed to append log line");
        }
    }

    /// Writes the concatenation of `values` as one line, with a space between
    /// neighbours that are both non-strings.
    pub fn log_values(&self, level: Level, values: &[&dyn Value]) {
        self.log(level, Concat(values));
    }

    pub fn debug<M: Display>(&self, message: M) {
        self.log(Level::Debug, message);
    }

    pub fn info<M: Display>(&self, message: M) {
        self.log(Level::Info, message);
    }

    pub fn notice<M: Display>(&self, message: M) {
        self.log(Level::Notice, message);
    }

    pub fn warn<M: Display>(&self, message: M) {
        self.log(Level::Warn, message);
    }

    pub fn error<M: Display>(&self, message: M) {
        self.log(Level::Error, message);
    }

    fn rotate(&self, state: &mut State, suffix: String) -> Result<(), Error> {
        // Replacing the sink drops, and so closes, the previous file.
        let previous = mem::replace(&mut state.sink, Sink::Unopened);
        match (previous, state.active_suffix.take()) {
            (Sink::File(file), Some(finished)) => {
                drop(file);
                self.archive(&finished);
            }
            (_, None) => self.adopt_or_archive_stale(&suffix),
            // Console windows have no live file to rename.
            (_, Some(_)) => {}
        }

        match self.ensure_parent_dir() {
            Ok(()) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path_prefix)
                    .map_err(|source| Error::Open {
                        path: self.path_prefix.clone(),
                        source,
                    })?;
                state.sink = Sink::File(file);
            }
            Err(err) => {
                warn!(
                    path = %self.path_prefix.display(),
                    error = %err,
                    "Unable to create log directory, logging to stdout"
                );
                state.sink = Sink::Console;
            }
        }

        debug!(path = %self.path_prefix.display(), suffix = %suffix, "Opened log window");
        state.active_suffix = Some(suffix);
        Ok(())
    }

    /// Moves the live file to `<prefix>.<suffix>`. A window can come around
    /// again when the clock steps back, so an existing archive is appended to
    /// rather than replaced.
    fn archive(&self, suffix: &str) {
        let target = self.rotated_path(suffix);
        let result = if target.is_file() {
            append_and_remove(&self.path_prefix, &target)
        } else {
            fs::rename(&self.path_prefix, &target)
        };
        match result {
            Ok(()) => debug!(to = %target.display(), "Rotated log file"),
            Err(err) => debug!(to = %target.display(), error = %err, "Skipped log file rotation"),
        }
    }

    /// A live file left behind by an earlier process is kept when it was last
    /// written in the current window and archived under its own window
    /// otherwise.
    fn adopt_or_archive_stale(&self, current: &str) {
        let modified = match fs::metadata(&self.path_prefix) {
            Ok(meta) if meta.is_file() => match meta.modified() {
                Ok(modified) => DateTime::<Local>::from(modified),
                Err(_) => return,
            },
            _ => return,
        };

        let suffix = self.suffix_format.format(&modified);
        if suffix != current {
            self.archive(&suffix);
        }
    }

    fn ensure_parent_dir(&self) -> io::Result<()> {
        match self.path_prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

fn append_and_remove(live: &Path, target: &Path) -> io::Result<()> {
    let mut source = File::open(live)?;
    let mut archive = OpenOptions::new().append(true).open(target)?;
    io::copy(&mut source, &mut archive)?;
    fs::remove_file(live)
}

fn format_line(now: &DateTime<Local>, level: Level, message: &dyn Display) -> String {
    let mut line = String::new();
    // A failing Display impl truncates the message; the line is still written.
    let _ = write!(line, "{} [{}] {}", now.format(TIMESTAMP_FORMAT), level, message);
    line.push('\n');
    line
}
