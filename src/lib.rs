//! A time-rotating file logger.
//!
//! [`RotatingWriter`] appends `YYYY/MM/DD HH:MM:SS [LEVEL] message` lines to a
//! live file and, whenever the [`SuffixFormat`] of the current time changes,
//! renames that file to `<prefix>.<suffix>` and starts a new one.
//!
//! ```no_run
//! use rotalog::{noticef, warnv, RotatingWriter, SuffixFormat};
//!
//! let log = RotatingWriter::new("logs/app", SuffixFormat::Day);
//! log.info("service started");
//! noticef!(log, "listening on port {}", 8080);
//! warnv!(log, "retries: ", 3, 5);
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod level;
pub mod logging;
pub mod suffix;
pub mod value;
pub mod writer;

pub use error::{Error, Result};
pub use layer::RotatingLayer;
pub use level::Level;
pub use suffix::SuffixFormat;
pub use value::Value;
pub use writer::RotatingWriter;

/// Writes a `format!`-style message at an explicit level.
#[macro_export]
macro_rules! logf {
    ($writer:expr, $level:expr, $($arg:tt)+) => {
        $writer.log($level, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debugf {
    ($writer:expr, $($arg:tt)+) => {
        $crate::logf!($writer, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! infof {
    ($writer:expr, $($arg:tt)+) => {
        $crate::logf!($writer, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! noticef {
    ($writer:expr, $($arg:tt)+) => {
        $crate::logf!($writer, $crate::Level::Notice, $($arg)+)
    };
}

#[macro_export]
macro_rules! warnf {
    ($writer:expr, $($arg:tt)+) => {
        $crate::logf!($writer, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! errorf {
    ($writer:expr, $($arg:tt)+) => {
        $crate::logf!($writer, $crate::Level::Error, $($arg)+)
    };
}

/// Writes the concatenation of values at an explicit level. Neighbouring
/// values that are both non-strings are separated by a space.
#[macro_export]
macro_rules! logv {
    ($writer:expr, $level:expr, $($value:expr),+ $(,)?) => {
        $writer.log_values($level, &[$(&$value as &dyn $crate::Value),+])
    };
}

#[macro_export]
macro_rules! debugv {
    ($writer:expr, $($value:expr),+ $(,)?) => {
        $crate::logv!($writer, $crate::Level::Debug, $($value),+)
    };
}

#[macro_export]
macro_rules! infov {
    ($writer:expr, $($value:expr),+ $(,)?) => {
        $crate::logv!($writer, $crate::Level::Info, $($value),+)
    };
}

#[macro_export]
macro_rules! noticev {
    ($writer:expr, $($value:expr),+ $(,)?) => {
        $crate::logv!($writer, $crate::Level::Notice, $($value),+)
    };
}

#[macro_export]
macro_rules! warnv {
    ($writer:expr, $($value:expr),+ $(,)?) => {
        $crate::logv!($writer, $crate::Level::Warn, $($value),+)
    };
}

#[macro_export]
macro_rules! errorv {
    ($writer:expr, $($value:expr),+ $(,)?) => {
        $crate::logv!($writer, $crate::Level::Error, $($value),+)
    };
}
