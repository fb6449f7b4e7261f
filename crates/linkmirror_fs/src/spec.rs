//! Link specification models, verbosity handle and top-level error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exclude patterns applied when the caller does not supply its own.
///
/// - `/LICENSE`  : the license file directly under the input root.
/// - `.*`        : any hidden entry (and everything below a hidden directory).
/// - `make_link*`: the tool's own files.
pub const DEFAULT_PATTERNS_EXCLUDE: [&str; 3] = ["/LICENSE", ".*", "make_link*"];

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for include/exclude lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
}

/// Which of the two roots a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumLinkRootRole {
    Input,
    Output,
}

impl fmt::Display for EnumLinkRootRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input_dir"),
            Self::Output => write!(f, "output_dir"),
        }
    }
}

/// Filesystem mutation kinds performed by `make_links`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumLinkActionKind {
    /// Mirror a source directory as a real directory.
    CreateDir,
    /// Point a destination entry back at its source.
    CreateSymlink,
}

impl fmt::Display for EnumLinkActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir => write!(f, "create directory"),
            Self::CreateSymlink => write!(f, "create symlink"),
        }
    }
}

/// Diagnostic output levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnumVerbosityLevel {
    Silent = 0,
    /// Directory and link creation.
    Major = 1,
    /// Link creation.
    Link = 2,
    /// Path computations and compiled pattern expressions.
    Detail = 3,
}

impl EnumVerbosityLevel {
    fn log_level(self) -> log::Level {
        match self {
            Self::Silent | Self::Major => log::Level::Info,
            Self::Link => log::Level::Debug,
            Self::Detail => log::Level::Trace,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Verbosity

/// Explicit verbosity handle carried through the walker and the mirror.
///
/// A message tagged with level `n` is emitted when the configured level is
/// `>= n`. Output goes through the `log` facade, indented by `n` spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecVerbosity {
    level: u8,
}

impl SpecVerbosity {
    pub fn new(level: u8) -> Self {
        Self { level }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_enabled(&self, level: EnumVerbosityLevel) -> bool {
        level != EnumVerbosityLevel::Silent && self.level >= level as u8
    }

    /// `log` filter matching this verbosity, for front-ends that install a logger.
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn emit(&self, level: EnumVerbosityLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        log::log!(
            level.log_level(),
            "{:n_indent$}{args}",
            "",
            n_indent = level as usize
        );
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `make_links`.
#[derive(Debug, Clone)]
pub struct SpecLinkOptions {
    /// Include patterns applied to file basename.
    pub patterns_include: Option<Vec<String>>,
    /// Exclude patterns applied to the root-relative path of every entry.
    pub patterns_exclude: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumPatternMode,
    /// Diagnostic output level.
    pub verbosity: SpecVerbosity,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

impl Default for SpecLinkOptions {
    fn default() -> Self {
        Self {
            patterns_include: None,
            patterns_exclude: Some(
                DEFAULT_PATTERNS_EXCLUDE
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            ),
            rule_pattern: EnumPatternMode::Glob,
            verbosity: SpecVerbosity::default(),
            if_dry_run: false,
        }
    }
}

/// Errors that end a `make_links` run. Nothing is retried or rolled back.
#[derive(Debug)]
pub enum LinkTreeError {
    /// Input or output root is missing or not a directory.
    InvalidRoot {
        role: EnumLinkRootRole,
        path: PathBuf,
    },
    /// Invalid include/exclude pattern.
    InvalidPattern(String),
    /// A directory could not be listed during traversal.
    Walk { path: PathBuf, source: io::Error },
    /// Directory or symlink creation failed.
    Mutation {
        action: EnumLinkActionKind,
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for LinkTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoot { role, path } => {
                write!(f, "{role} ({}) must be a directory", path.display())
            }
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::Walk { path, source } => {
                write!(f, "Failed to read directory {} ({source})", path.display())
            }
            Self::Mutation {
                action,
                path,
                source,
            } => write!(f, "Failed to {action} {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for LinkTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Walk { source, .. } | Self::Mutation { source, .. } => Some(source),
            Self::InvalidRoot { .. } | Self::InvalidPattern(_) => None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
