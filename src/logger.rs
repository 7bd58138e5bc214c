//! Colour-coded console logging with a UTC timestamp prefix.
//!
//! `event!` is silent unless `LOG_FORMATION_EVENTS` is set; it carries the per-tick
//! traces (status reports, dropped commands) that would otherwise flood the console.
//! The variable is read once, on the first trace.

use chrono::Utc;
use std::fmt::Arguments;
use std::sync::LazyLock;

/// Whether `event!` traces are printed.
pub static EVENTS_ENABLED: LazyLock<bool> =
    LazyLock::new(|| std::env::var_os("LOG_FORMATION_EVENTS").is_some());

/// Severity of a log line, selecting its tag and ANSI colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Fatal,
    /// Accepted operator or remote commands.
    Cmd,
    Event,
}

impl Level {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Info => ("32", "INFO"),
            Level::Warn => ("35", "WARN"),
            Level::Error => ("31", "ERROR"),
            Level::Fatal => ("1;31", "FATAL"),
            Level::Cmd => ("1;34", "CMD"),
            Level::Event => ("36", "EVENT"),
        }
    }
}

/// Renders one log line: coloured, padded tag and timestamp, then the message.
pub fn line(level: Level, args: Arguments<'_>) -> String {
    let (colour, tag) = level.style();
    let label = format!("[{tag}]");
    format!("\x1b[{colour}m{label:<7}[{}]\x1b[0m {args}", Utc::now().format("%H:%M:%S"))
}

pub fn emit(level: Level, args: Arguments<'_>) { println!("{}", line(level, args)); }

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Level::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Level::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Level::Error, format_args!($($arg)*))
    };
}

/// Logs and panics. Only the binary's start-up uses it.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("{}", $crate::logger::line($crate::logger::Level::Fatal, format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! cmd {
    ($($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Level::Cmd, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if *$crate::logger::EVENTS_ENABLED {
            $crate::logger::emit($crate::logger::Level::Event, format_args!($($arg)*))
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{line, Level};

    #[test]
    fn test_line_layout() {
        let rendered = line(Level::Cmd, format_args!("Sent '{}' to {}.", "stop", "all"));
        assert!(rendered.starts_with("\x1b[1;34m[CMD]  ["));
        assert!(rendered.ends_with("\x1b[0m Sent 'stop' to all."));

        let error = line(Level::Error, format_args!("x"));
        assert!(error.starts_with("\x1b[31m[ERROR]["));
        // HH:MM:SS between the brackets
        let stamp = &error["\x1b[31m[ERROR][".len()..];
        assert_eq!(stamp.find(']'), Some(8));
    }
}
