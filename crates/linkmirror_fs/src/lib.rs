//! `linkmirror_fs` v1:
//! Mirror a directory tree as real directories plus relative symlinks.
//!
//! - `walk`   : pattern-filtered top-down traversal
//! - `mirror` : directory mirroring and symlink creation
//! - `spec`   : enums/options/verbosity/errors
//! - `report` : run-time report model
//! - `util`   : shared path helpers

pub mod mirror;
pub mod report;
pub mod spec;
mod util;
pub mod walk;

pub use mirror::{make_links, make_links_with};
pub use report::{ReportLink, ReportLinkBuilder, SpecLinkAction};
pub use spec::{
    DEFAULT_PATTERNS_EXCLUDE, EnumLinkActionKind, EnumLinkRootRole, EnumPatternMode,
    EnumVerbosityLevel, LinkTreeError, SpecLinkOptions, SpecVerbosity,
};
pub use walk::{SpecWalkEntry, SpecWalkPatterns, WalkFiltered, walk_filtered};
