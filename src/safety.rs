//! Path validation for exported entries.
//!
//! Entry names come from the archive and are not trusted. Before anything is
//! created on disk, each name is resolved against the destination directory
//! according to a [`PathSafety`] policy. Symlink targets are checked too, so
//! a link created by one entry cannot carry a later entry out of the tree.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Policy for validating entry paths during export.
///
/// The default is `Strict`.
///
/// ```rust
/// use guitar::safety::PathSafety;
///
/// assert_eq!(PathSafety::default(), PathSafety::Strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathSafety {
    /// Rejects `..` components and absolute names, then verifies that the
    /// resolved path stays inside the canonical destination, following any
    /// symbolic links already on disk.
    #[default]
    Strict,
    /// Rejects `..` components and absolute names without touching the
    /// filesystem.
    Relaxed,
    /// No validation at all.
    ///
    /// A malicious archive can write anywhere the process can. Only use this
    /// for archives you created yourself.
    Disabled,
}

fn has_parent_component(name: &str) -> bool {
    name.split('/').any(|component| component == "..")
}

fn is_absolute_name(name: &str) -> bool {
    name.starts_with('/') || Path::new(name).has_root()
}

/// Resolves an entry name to its location under `dest_root`.
///
/// # Errors
///
/// - [`Error::PathTraversal`] if the name escapes the destination under the
///   given policy
/// - [`Error::Filesystem`] if the destination (or an existing ancestor of the
///   target) cannot be canonicalized in strict mode
pub fn resolve_entry_path(name: &str, dest_root: &Path, policy: PathSafety) -> Result<PathBuf> {
    let traversal = || Error::PathTraversal {
        entry: name.to_string(),
    };

    if policy == PathSafety::Disabled {
        return Ok(dest_root.join(name));
    }

    if has_parent_component(name) || is_absolute_name(name) {
        return Err(traversal());
    }

    let full_path = dest_root.join(name);
    if policy == PathSafety::Relaxed {
        return Ok(full_path);
    }

    let canonical_dest = dest_root
        .canonicalize()
        .map_err(|e| Error::filesystem("resolve destination", dest_root, e))?;

    // Canonicalize the deepest existing ancestor and re-append the rest.
    // `symlink_metadata` sees a dangling link where `exists` would not.
    let present = |path: &Path| std::fs::symlink_metadata(path).is_ok();
    let mut ancestor = full_path.as_path();
    let mut pending = Vec::new();
    while !present(ancestor) {
        match (ancestor.file_name(), ancestor.parent()) {
            (Some(file_name), Some(parent)) => {
                pending.push(file_name.to_os_string());
                ancestor = parent;
            }
            _ => break,
        }
    }

    let mut resolved = if present(ancestor) {
        match ancestor.canonicalize() {
            Ok(path) => path,
            // A dangling link: its target cannot be checked.
            Err(_) if is_symlink(ancestor) => return Err(traversal()),
            Err(e) => return Err(Error::filesystem("resolve path", ancestor, e)),
        }
    } else {
        canonical_dest.clone()
    };
    for component in pending.into_iter().rev() {
        resolved.push(component);
    }

    let escapes = resolved
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    if escapes || !resolved.starts_with(&canonical_dest) {
        return Err(traversal());
    }

    Ok(full_path)
}

/// Resolves the location of a symbolic link entry under `dest_root`.
///
/// The parent directory is resolved like any other entry; the final
/// component is not followed, since the link replaces whatever is there.
pub fn resolve_link_path(name: &str, dest_root: &Path, policy: PathSafety) -> Result<PathBuf> {
    if policy == PathSafety::Disabled {
        return Ok(dest_root.join(name));
    }

    let (parent, file_name) = name.rsplit_once('/').unwrap_or(("", name));
    if file_name == ".." || is_absolute_name(name) {
        return Err(Error::PathTraversal {
            entry: name.to_string(),
        });
    }
    if parent.is_empty() {
        return Ok(dest_root.join(file_name));
    }

    let parent_path = resolve_entry_path(parent, dest_root, policy).map_err(|e| match e {
        Error::PathTraversal { .. } => Error::PathTraversal {
            entry: name.to_string(),
        },
        other => other,
    })?;
    Ok(parent_path.join(file_name))
}

/// Checks that a symlink target stays inside the destination directory.
///
/// The check is lexical: the target is walked from the link's parent
/// directory within the tree, and the walk may never climb above the
/// destination root. Absolute targets are always rejected.
///
/// ```rust
/// use guitar::safety::validate_symlink_target;
///
/// assert!(validate_symlink_target("a/c", "b.txt").is_ok());
/// assert!(validate_symlink_target("a/c", "../b.txt").is_ok());
/// assert!(validate_symlink_target("a/c", "../../b.txt").is_err());
/// assert!(validate_symlink_target("a/c", "/etc/passwd").is_err());
/// ```
pub fn validate_symlink_target(entry: &str, target: &str) -> Result<()> {
    let escape = || Error::SymlinkTargetEscape {
        entry: entry.to_string(),
        target: target.to_string(),
    };

    if is_absolute_name(target) || target.starts_with('\\') {
        return Err(escape());
    }
    // Drive-letter targets such as `C:\x`.
    if target.len() >= 2 && target.as_bytes()[1] == b':' {
        return Err(escape());
    }

    let parent = Path::new(entry).parent().unwrap_or(Path::new(""));
    let mut depth = parent
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();

    for component in Path::new(target).components() {
        match component {
            Component::ParentDir => {
                depth = depth.checked_sub(1).ok_or_else(escape)?;
            }
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }
    Ok(())
}

fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}
