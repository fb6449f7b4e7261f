//! Directory mirroring and relative symlink creation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::{ReportLink, ReportLinkBuilder, SpecLinkAction};
use crate::spec::{
    EnumLinkActionKind, EnumLinkRootRole, EnumVerbosityLevel, LinkTreeError, SpecLinkOptions,
    SpecVerbosity,
};
use crate::util::{absolutize_path, common_path_prefix, relative_path};
use crate::walk::{SpecWalkEntry, walk_filtered};

struct SpecLinkContext<'a> {
    path_dir_dst: PathBuf,
    verbosity: SpecVerbosity,
    if_dry_run: bool,
    builder_link_report: ReportLinkBuilder,
    on_action: &'a mut dyn FnMut(&SpecLinkAction),
}

/// Mirror `dir_input` into `dir_output` with relative symlinks.
///
/// See [`make_links_with`]; actions are only counted.
pub fn make_links<P, Q>(
    dir_input: P,
    dir_output: Q,
    spec_link_options: SpecLinkOptions,
) -> Result<ReportLink, LinkTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    make_links_with(dir_input, dir_output, spec_link_options, |_| {})
}

/// Mirror `dir_input` into `dir_output` with relative symlinks, handing each
/// action to `on_action` as its entry is processed.
///
/// Every directory that survives the filter is recreated under `dir_output`
/// (mode `0o777`, subject to umask) before anything inside it is handled.
/// Every other entry, including a symlink that points at a directory, becomes
/// one symlink whose target is relative to the link's own parent directory.
///
/// With `if_dry_run` nothing is created; `on_action` still sees every action,
/// in the same order a real run would perform them. Otherwise `on_action` runs
/// after the action succeeded.
///
/// The first failure ends the run. Existing destination entries are not
/// checked beforehand, so a collision surfaces as
/// [`LinkTreeError::Mutation`]; whatever was created before it stays.
pub fn make_links_with<P, Q, F>(
    dir_input: P,
    dir_output: Q,
    spec_link_options: SpecLinkOptions,
    mut on_action: F,
) -> Result<ReportLink, LinkTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&SpecLinkAction),
{
    let path_dir_src = dir_input.as_ref().to_path_buf();
    let path_dir_dst = dir_output.as_ref().to_path_buf();

    if !path_dir_src.is_dir() {
        return Err(LinkTreeError::InvalidRoot {
            role: EnumLinkRootRole::Input,
            path: path_dir_src,
        });
    }
    if !path_dir_dst.is_dir() {
        return Err(LinkTreeError::InvalidRoot {
            role: EnumLinkRootRole::Output,
            path: path_dir_dst,
        });
    }

    let verbosity = spec_link_options.verbosity;
    let path_common = common_path_prefix(
        &absolutize_path(&path_dir_src),
        &absolutize_path(&path_dir_dst),
    );
    verbosity.emit(
        EnumVerbosityLevel::Major,
        format_args!("common file path: {}", path_common.display()),
    );

    let iter_entries = walk_filtered(
        &path_dir_src,
        spec_link_options.patterns_include.as_deref(),
        spec_link_options.patterns_exclude.as_deref(),
        spec_link_options.rule_pattern,
        verbosity,
    )?;

    let mut spec_link_ctx = SpecLinkContext {
        path_dir_dst,
        verbosity,
        if_dry_run: spec_link_options.if_dry_run,
        builder_link_report: ReportLinkBuilder::default(),
        on_action: &mut on_action,
    };

    for entry_res in iter_entries {
        let spec_entry = entry_res?;
        spec_link_ctx.builder_link_report.add_scanned();
        if spec_entry.if_is_dir && !spec_entry.if_is_symlink {
            handle_dir_entry(spec_entry, &mut spec_link_ctx)?;
        } else {
            handle_link_entry(spec_entry, &mut spec_link_ctx)?;
        }
    }

    Ok(spec_link_ctx.builder_link_report.build())
}

fn handle_dir_entry(
    spec_entry: SpecWalkEntry,
    spec_link_ctx: &mut SpecLinkContext<'_>,
) -> Result<(), LinkTreeError> {
    let path_dst = spec_link_ctx.path_dir_dst.join(&spec_entry.path_rel);
    spec_link_ctx.verbosity.emit(
        EnumVerbosityLevel::Detail,
        format_args!(
            "p = '{}', relative = '{}'",
            spec_entry.path.display(),
            spec_entry.path_rel.display()
        ),
    );

    let action = SpecLinkAction::CreateDir { path_dst };
    if spec_link_ctx.if_dry_run {
        spec_link_ctx.builder_link_report.add_planned();
        (spec_link_ctx.on_action)(&action);
        return Ok(());
    }

    spec_link_ctx
        .verbosity
        .emit(EnumVerbosityLevel::Major, format_args!("{action}"));
    create_directory(action.path_dst()).map_err(|source| LinkTreeError::Mutation {
        action: EnumLinkActionKind::CreateDir,
        path: action.path_dst().clone(),
        source,
    })?;
    spec_link_ctx
        .builder_link_report
        .add_performed(EnumLinkActionKind::CreateDir);
    (spec_link_ctx.on_action)(&action);
    Ok(())
}

fn handle_link_entry(
    spec_entry: SpecWalkEntry,
    spec_link_ctx: &mut SpecLinkContext<'_>,
) -> Result<(), LinkTreeError> {
    let path_dst = spec_link_ctx.path_dir_dst.join(&spec_entry.path_rel);
    let path_dir_dst_parent = path_dst
        .parent()
        .unwrap_or(spec_link_ctx.path_dir_dst.as_path())
        .to_path_buf();
    let path_target = relative_path(&spec_entry.path, &path_dir_dst_parent);

    spec_link_ctx.verbosity.emit(
        EnumVerbosityLevel::Detail,
        format_args!(
            "p = '{}', relative = '{}', dest = '{}'",
            spec_entry.path.display(),
            spec_entry.path_rel.display(),
            path_dst.display()
        ),
    );

    if !spec_link_ctx.if_dry_run {
        spec_link_ctx.verbosity.emit(
            EnumVerbosityLevel::Link,
            format_args!(
                "creating symlink from {} to {}",
                path_target.display(),
                path_dst.display()
            ),
        );
        create_symbolic_link(&path_target, &path_dst, spec_entry.if_is_dir).map_err(
            |source| LinkTreeError::Mutation {
                action: EnumLinkActionKind::CreateSymlink,
                path: path_dst.clone(),
                source,
            },
        )?;
    }

    let action = SpecLinkAction::CreateSymlink {
        path_src: spec_entry.path,
        path_dst,
        path_target,
    };
    if spec_link_ctx.if_dry_run {
        spec_link_ctx.builder_link_report.add_planned();
    } else {
        spec_link_ctx
            .builder_link_report
            .add_performed(EnumLinkActionKind::CreateSymlink);
    }
    (spec_link_ctx.on_action)(&action);
    Ok(())
}

fn create_directory(path_dst: &Path) -> Result<(), io::Error> {
    let mut dir_builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        dir_builder.mode(0o777);
    }
    dir_builder.create(path_dst)
}

fn create_symbolic_link(
    path_target: &Path,
    path_dst: &Path,
    if_target_is_dir: bool,
) -> Result<(), io::Error> {
    #[cfg(unix)]
    {
        let _ = if_target_is_dir;
        std::os::unix::fs::symlink(path_target, path_dst)
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        if if_target_is_dir {
            symlink_dir(path_target, path_dst)
        } else {
            symlink_file(path_target, path_dst)
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (path_target, path_dst, if_target_is_dir);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Symbolic links are unsupported on this platform",
        ))
    }
}
