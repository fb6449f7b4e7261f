//! Link report models and mutable report builder.

use std::fmt;
use std::path::PathBuf;

use crate::spec::EnumLinkActionKind;

/// One directory or symlink creation, performed or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecLinkAction {
    CreateDir {
        path_dst: PathBuf,
    },
    CreateSymlink {
        /// Source entry the link stands for.
        path_src: PathBuf,
        path_dst: PathBuf,
        /// Link content, relative to the parent of `path_dst`.
        path_target: PathBuf,
    },
}

impl SpecLinkAction {
    pub fn kind(&self) -> EnumLinkActionKind {
        match self {
            Self::CreateDir { .. } => EnumLinkActionKind::CreateDir,
            Self::CreateSymlink { .. } => EnumLinkActionKind::CreateSymlink,
        }
    }

    pub fn path_dst(&self) -> &PathBuf {
        match self {
            Self::CreateDir { path_dst } | Self::CreateSymlink { path_dst, .. } => path_dst,
        }
    }
}

impl fmt::Display for SpecLinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path_dst } => {
                write!(f, "creating directory {}", path_dst.display())
            }
            Self::CreateSymlink {
                path_dst,
                path_target,
                ..
            } => write!(
                f,
                "creating symlink from {} to {}",
                path_target.display(),
                path_dst.display()
            ),
        }
    }
}

/// Aggregate counters for one `make_links` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportLink {
    /// Entries yielded by the filtered walk.
    pub cnt_scanned: u64,
    /// Directories created in the destination.
    pub cnt_dirs_created: u64,
    /// Symlinks created in the destination.
    pub cnt_links_created: u64,
    /// Actions reported but not performed (dry-run).
    pub cnt_planned: u64,
}

impl ReportLink {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} dirs={} links={} planned={}",
            self.cnt_scanned, self.cnt_dirs_created, self.cnt_links_created, self.cnt_planned
        )
    }
}

impl fmt::Display for ReportLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[LINK]"))
    }
}

/// Mutable accumulator for link statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportLinkBuilder {
    cnt_scanned: u64,
    cnt_dirs_created: u64,
    cnt_links_created: u64,
    cnt_planned: u64,
}

impl ReportLinkBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Count an action that will not be performed.
    pub fn add_planned(&mut self) {
        self.cnt_planned += 1;
    }

    /// Count an action that was committed to the filesystem.
    pub fn add_performed(&mut self, kind: EnumLinkActionKind) {
        match kind {
            EnumLinkActionKind::CreateDir => self.cnt_dirs_created += 1,
            EnumLinkActionKind::CreateSymlink => self.cnt_links_created += 1,
        }
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportLink {
        ReportLink {
            cnt_scanned: self.cnt_scanned,
            cnt_dirs_created: self.cnt_dirs_created,
            cnt_links_created: self.cnt_links_created,
            cnt_planned: self.cnt_planned,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportLinkBuilder, SpecLinkAction};
    use crate::spec::EnumLinkActionKind;

    #[test]
    fn report_link_counts_and_format() {
        let mut builder_link_report = ReportLinkBuilder::default();
        builder_link_report.add_scanned();
        builder_link_report.add_scanned();
        builder_link_report.add_performed(EnumLinkActionKind::CreateDir);
        builder_link_report.add_planned();
        let report = builder_link_report.build();

        assert_eq!(report.cnt_scanned, 2);
        assert_eq!(report.cnt_dirs_created, 1);
        assert_eq!(report.cnt_links_created, 0);
        assert_eq!(report.cnt_planned, 1);

        let txt = report.format("[LINK]");
        assert_eq!(txt, "[LINK] scanned=2 dirs=1 links=0 planned=1");
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn link_action_display_matches_cli_wording() {
        let action_dir = SpecLinkAction::CreateDir {
            path_dst: PathBuf::from("dst/sub"),
        };
        let action_link = SpecLinkAction::CreateSymlink {
            path_src: PathBuf::from("src/sub/b.txt"),
            path_dst: PathBuf::from("dst/sub/b.txt"),
            path_target: PathBuf::from("../../src/sub/b.txt"),
        };
        assert_eq!(action_dir.to_string(), "creating directory dst/sub");
        assert_eq!(
            action_link.to_string(),
            "creating symlink from ../../src/sub/b.txt to dst/sub/b.txt"
        );
        assert_eq!(action_link.path_dst(), &PathBuf::from("dst/sub/b.txt"));
    }
}
