use std::path::{Component, Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

pub(crate) fn absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` directly under the root (or at the start of a relative path) is kept
/// on relative paths and dropped on absolute ones.
pub(crate) fn normalize_lexical(path: &Path) -> PathBuf {
    let mut l_parts: Vec<Component<'_>> = Vec::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => match l_parts.last() {
                Some(Component::Normal(_)) => {
                    l_parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => l_parts.push(part),
            },
            _ => l_parts.push(part),
        }
    }
    if l_parts.is_empty() {
        return PathBuf::from(".");
    }
    l_parts.iter().collect()
}

/// Path of `path_target` expressed relative to the directory `path_base`.
///
/// Both sides are absolutized against the current directory and normalized
/// lexically first, so symlinks inside either path are not resolved.
///
/// # Examples
/// ```ignore
/// let rel = relative_path(Path::new("/w/src/sub/b.txt"), Path::new("/w/dst/sub"));
/// assert_eq!(rel, Path::new("../../src/sub/b.txt"));
/// ```
pub(crate) fn relative_path(path_target: &Path, path_base: &Path) -> PathBuf {
    let path_target_abs = normalize_lexical(&absolutize_path(path_target));
    let path_base_abs = normalize_lexical(&absolutize_path(path_base));

    let l_target: Vec<Component<'_>> = path_target_abs.components().collect();
    let l_base: Vec<Component<'_>> = path_base_abs.components().collect();
    let n_common = l_target
        .iter()
        .zip(l_base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut path_rel = PathBuf::new();
    for _ in n_common..l_base.len() {
        path_rel.push("..");
    }
    for part in &l_target[n_common..] {
        path_rel.push(part.as_os_str());
    }
    if path_rel.as_os_str().is_empty() {
        return PathBuf::from(".");
    }
    path_rel
}

/// Longest leading run of components shared by both paths.
pub(crate) fn common_path_prefix(path_a: &Path, path_b: &Path) -> PathBuf {
    path_a
        .components()
        .zip(path_b.components())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect()
}

/// Root-relative path rendered with `/` separators for pattern matching.
pub(crate) fn to_slash_string(path_rel: &Path) -> String {
    path_rel
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{common_path_prefix, normalize_lexical, relative_path, to_slash_string};

    #[test]
    fn normalize_lexical_folds_dots() {
        assert_eq!(
            normalize_lexical(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexical(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_lexical(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize_lexical(Path::new("a/..")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn relative_path_walks_up_from_link_parent() {
        assert_eq!(
            relative_path(Path::new("/w/src/a.txt"), Path::new("/w/dst")),
            PathBuf::from("../src/a.txt")
        );
        assert_eq!(
            relative_path(Path::new("/w/src/sub/b.txt"), Path::new("/w/dst/sub")),
            PathBuf::from("../../src/sub/b.txt")
        );
        assert_eq!(
            relative_path(Path::new("/w/tools/x"), Path::new("/w/tools")),
            PathBuf::from("x")
        );
        assert_eq!(
            relative_path(Path::new("/w/tools"), Path::new("/w/tools")),
            PathBuf::from(".")
        );
    }

    #[cfg(unix)]
    #[test]
    fn relative_path_accepts_unnormalized_inputs() {
        assert_eq!(
            relative_path(Path::new("/w/./src/../src/a.txt"), Path::new("/w/dst/")),
            PathBuf::from("../src/a.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn common_path_prefix_is_component_wise() {
        assert_eq!(
            common_path_prefix(Path::new("/w/tools"), Path::new("/w/toolsets/x")),
            PathBuf::from("/w")
        );
        assert_eq!(
            common_path_prefix(Path::new("/w/a/b"), Path::new("/w/a/c")),
            PathBuf::from("/w/a")
        );
        assert_eq!(
            common_path_prefix(Path::new("a"), Path::new("b")),
            PathBuf::new()
        );
    }

    #[test]
    fn slash_string_joins_components() {
        let path_rel: PathBuf = ["sub", "deeper", "f.txt"].iter().collect();
        assert_eq!(to_slash_string(&path_rel), "sub/deeper/f.txt");
    }
}
