//! Pattern-filtered, top-down directory traversal.

use std::collections::VecDeque;
use std::fs;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::spec::{EnumPatternMode, EnumVerbosityLevel, LinkTreeError, SpecVerbosity};
use crate::util::to_slash_string;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
enum TypePatternSeq {
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypePatternSeq {
    fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Glob(v) => v.iter().any(|p| p.is_match(value)),
            Self::Regex(v) => v.iter().any(|p| p.is_match(value)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Glob(v) => v
                .iter()
                .map(|p| p.glob().regex().to_string())
                .collect::<Vec<_>>()
                .join("|"),
            Self::Regex(v) => v
                .iter()
                .map(|p| p.as_str().to_string())
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// Compiled include/exclude pattern set.
///
/// Includes match the whole basename of a file. Excludes match the
/// root-relative `/`-joined path of any entry, starting at a component
/// boundary and running to the end of the path; `*` may span separators, so
/// `.*` drops every hidden entry together with anything below it. A leading
/// `/` anchors an exclude pattern at the walk root.
#[derive(Debug, Clone, Default)]
pub struct SpecWalkPatterns {
    patterns_include: Option<TypePatternSeq>,
    patterns_exclude: Option<TypePatternSeq>,
}

impl SpecWalkPatterns {
    pub fn from_raw(
        patterns_include: Option<&[String]>,
        patterns_exclude: Option<&[String]>,
        rule_pattern: EnumPatternMode,
    ) -> Result<Self, LinkTreeError> {
        Ok(Self {
            patterns_include: _compile_include(patterns_include, rule_pattern)?,
            patterns_exclude: _compile_exclude(patterns_exclude, rule_pattern)?,
        })
    }

    /// Whether a file basename passes the include set.
    pub fn is_included(&self, name: &str) -> bool {
        match &self.patterns_include {
            None => true,
            Some(patterns) => patterns.is_match(name),
        }
    }

    /// Whether a root-relative path (`/`-joined) hits the exclude set.
    pub fn is_excluded(&self, path_rel: &str) -> bool {
        match &self.patterns_exclude {
            None => false,
            Some(patterns) => patterns.is_match(path_rel),
        }
    }

    fn log_compiled(&self, verbosity: &SpecVerbosity) {
        let c_includes = self
            .patterns_include
            .as_ref()
            .map_or_else(|| ".*".to_string(), TypePatternSeq::describe);
        let c_excludes = self
            .patterns_exclude
            .as_ref()
            .map_or_else(|| "$.".to_string(), TypePatternSeq::describe);
        verbosity.emit(
            EnumVerbosityLevel::Detail,
            format_args!("includes_re = {c_includes}"),
        );
        verbosity.emit(
            EnumVerbosityLevel::Detail,
            format_args!("excludes_re = {c_excludes}"),
        );
    }
}

fn _invalid_pattern(e: impl std::fmt::Display) -> LinkTreeError {
    LinkTreeError::InvalidPattern(format!("Invalid pattern in include/exclude: {e}"))
}

fn _compile_glob(pattern: &str) -> Result<GlobMatcher, LinkTreeError> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(false)
        .backslash_escape(false)
        .build()
        .map_err(_invalid_pattern)?
        .compile_matcher())
}

fn _compile_include(
    patterns: Option<&[String]>,
    rule_pattern: EnumPatternMode,
) -> Result<Option<TypePatternSeq>, LinkTreeError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumPatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                l_glob.push(_compile_glob(pattern)?);
            }
            Ok(Some(TypePatternSeq::Glob(l_glob)))
        }
        EnumPatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(_invalid_pattern)?;
                l_regex.push(regex);
            }
            Ok(Some(TypePatternSeq::Regex(l_regex)))
        }
    }
}

fn _compile_exclude(
    patterns: Option<&[String]>,
    rule_pattern: EnumPatternMode,
) -> Result<Option<TypePatternSeq>, LinkTreeError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumPatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len() * 2);
            for pattern in patterns {
                if let Some(pattern_rooted) = pattern.strip_prefix('/') {
                    l_glob.push(_compile_glob(pattern_rooted)?);
                } else {
                    l_glob.push(_compile_glob(pattern)?);
                    l_glob.push(_compile_glob(&format!("*/{pattern}"))?);
                }
            }
            Ok(Some(TypePatternSeq::Glob(l_glob)))
        }
        EnumPatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let c_regex = match pattern.strip_prefix('/') {
                    Some(pattern_rooted) => format!("^(?:{pattern_rooted})$"),
                    None => format!("(?:^|/)(?:{pattern})$"),
                };
                l_regex.push(Regex::new(&c_regex).map_err(_invalid_pattern)?);
            }
            Ok(Some(TypePatternSeq::Regex(l_regex)))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Traversal

/// One path that survived the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWalkEntry {
    /// Full path (walk root joined with `path_rel`).
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub path_rel: PathBuf,
    /// Directory, or a symlink resolving to one.
    pub if_is_dir: bool,
    pub if_is_symlink: bool,
    /// 1 for direct children of the root.
    pub depth: usize,
}

/// Lazy filtered walk. Created by [`walk_filtered`].
///
/// Each step lists one directory: its surviving subdirectories are yielded
/// first, then its surviving files, both in name order. Subdirectories that
/// are real directories (not symlinks) are then visited depth-first, so a
/// directory is always yielded before anything inside it. The first error
/// ends the sequence.
#[derive(Debug)]
pub struct WalkFiltered {
    path_root: PathBuf,
    spec_walk_pats: SpecWalkPatterns,
    l_dirs_pending: Vec<(PathBuf, usize)>,
    l_entries_ready: VecDeque<SpecWalkEntry>,
}

/// Walk `path_root` top-down, yielding directories and files that pass the
/// include/exclude patterns.
///
/// Patterns are compiled up front; a malformed one fails here rather than
/// during iteration.
pub fn walk_filtered<P: AsRef<Path>>(
    path_root: P,
    patterns_include: Option<&[String]>,
    patterns_exclude: Option<&[String]>,
    rule_pattern: EnumPatternMode,
    verbosity: SpecVerbosity,
) -> Result<WalkFiltered, LinkTreeError> {
    let spec_walk_pats =
        SpecWalkPatterns::from_raw(patterns_include, patterns_exclude, rule_pattern)?;
    spec_walk_pats.log_compiled(&verbosity);
    Ok(WalkFiltered::new(path_root.as_ref().to_path_buf(), spec_walk_pats))
}

impl WalkFiltered {
    pub fn new(path_root: PathBuf, spec_walk_pats: SpecWalkPatterns) -> Self {
        Self {
            l_dirs_pending: vec![(path_root.clone(), 0)],
            path_root,
            spec_walk_pats,
            l_entries_ready: VecDeque::new(),
        }
    }

    fn scan_directory(&mut self, path_dir: &Path, n_depth: usize) -> Result<(), LinkTreeError> {
        let walk_error = |source| LinkTreeError::Walk {
            path: path_dir.to_path_buf(),
            source,
        };

        let mut l_dirs: Vec<SpecWalkEntry> = Vec::new();
        let mut l_files: Vec<SpecWalkEntry> = Vec::new();

        for entry_res in fs::read_dir(path_dir).map_err(walk_error)? {
            let entry = entry_res.map_err(walk_error)?;
            let cfg_file_type = entry.file_type().map_err(walk_error)?;

            let path_entry = entry.path();
            let path_rel = path_entry
                .strip_prefix(&self.path_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
            let b_is_symlink = cfg_file_type.is_symlink();
            let b_is_dir = cfg_file_type.is_dir() || (b_is_symlink && path_entry.is_dir());

            let spec_entry = SpecWalkEntry {
                path: path_entry,
                path_rel,
                if_is_dir: b_is_dir,
                if_is_symlink: b_is_symlink,
                depth: n_depth + 1,
            };
            if b_is_dir {
                l_dirs.push(spec_entry);
            } else {
                l_files.push(spec_entry);
            }
        }

        l_dirs.sort_by(|a, b| a.path_rel.cmp(&b.path_rel));
        l_files.sort_by(|a, b| a.path_rel.cmp(&b.path_rel));

        l_dirs.retain(|d| !self.spec_walk_pats.is_excluded(&to_slash_string(&d.path_rel)));
        l_files.retain(|f| {
            let c_name = f
                .path
                .file_name()
                .map(|v| v.to_string_lossy())
                .unwrap_or_default();
            self.spec_walk_pats.is_included(&c_name)
                && !self.spec_walk_pats.is_excluded(&to_slash_string(&f.path_rel))
        });

        // Symlinked directories are yielded but never entered.
        self.l_dirs_pending.extend(
            l_dirs
                .iter()
                .rev()
                .filter(|d| !d.if_is_symlink)
                .map(|d| (d.path.clone(), d.depth)),
        );
        self.l_entries_ready.extend(l_dirs);
        self.l_entries_ready.extend(l_files);
        Ok(())
    }
}

impl Iterator for WalkFiltered {
    type Item = Result<SpecWalkEntry, LinkTreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(spec_entry) = self.l_entries_ready.pop_front() {
                return Some(Ok(spec_entry));
            }
            let (path_dir, n_depth) = self.l_dirs_pending.pop()?;
            if let Err(e) = self.scan_directory(&path_dir, n_depth) {
                self.l_dirs_pending.clear();
                self.l_entries_ready.clear();
                return Some(Err(e));
            }
        }
    }
}

impl FusedIterator for WalkFiltered {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
