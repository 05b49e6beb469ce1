use std::fmt;

/// The logging configuration.
///
/// Logging is used to collect information about the progress of a search or
/// a batch driver run. It can be disabled, enabled, enabled with verbose
/// output, or verbose only.
pub enum Logging {
    /// Logging is disabled.
    Disabled,
    /// The progress is written to the given writer which is usually
    /// `std::io::stdout()` or a comparable console.
    Enabled { progress_writer: Box<dyn std::io::Write> },
    /// The progress is written to `progress_writer`. Additionally, debug
    /// information (e.g. a full tree dump) is written to `debug_writer`,
    /// which is usually a file.
    Verbose {
        progress_writer: Box<dyn std::io::Write>,
        debug_writer: Box<dyn std::io::Write>,
    },
    /// Only the debug information is written, to `debug_writer`.
    VerboseOnly { debug_writer: Box<dyn std::io::Write> },
}

impl Logging {
    /// Indicates if logging is enabled at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Logging::Disabled)
    }

    /// Indicates if the debug writer (full tree dumps) is active.
    pub fn is_verbose(&self) -> bool {
        matches!(self, Logging::Verbose { .. } | Logging::VerboseOnly { .. })
    }
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logging::Disabled => write!(f, "Logging::Disabled"),
            Logging::Enabled { .. } => write!(f, "Logging::Enabled"),
            Logging::Verbose { .. } => write!(f, "Logging::Verbose"),
            Logging::VerboseOnly { .. } => write!(f, "Logging::VerboseOnly"),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Logging::Enabled {
                progress_writer: Box::new(std::io::stdout()),
            }
        } else {
            Logging::Disabled
        }
    }
}
