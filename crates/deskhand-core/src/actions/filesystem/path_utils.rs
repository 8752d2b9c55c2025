//! Path utilities for base-directory confinement.

use std::path::{Component, Path, PathBuf};

use crate::error::ActionError;

/// Convert a path to a display string with consistent forward slash separators.
pub fn path_to_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Normalize a path by resolving `.` and `..` components without filesystem access.
///
/// Used for validating paths that may not exist yet.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => components.push(Component::Prefix(p)),
            Component::RootDir => {
                // Keep only prefix (if any) when we see root
                components.retain(|c| matches!(c, Component::Prefix(_)));
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                // Can't go above root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::Normal(_) | Component::CurDir) => {
                    components.pop();
                }
                Some(Component::ParentDir) | None => components.push(Component::ParentDir),
            },
            Component::Normal(c) => components.push(Component::Normal(c)),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Resolve `relative` against `base_dir` and make sure the result stays inside it.
///
/// The first check is purely lexical, so nothing on disk is touched for a
/// request that escapes. Absolute inputs are refused outright. The nearest
/// entry that exists on disk (the target itself or an ancestor, links not
/// followed) is then canonicalized so that a symlink inside the base
/// directory cannot point outside of it. A dangling symlink is refused, since
/// writing through it would create a file wherever it points.
pub fn resolve_within(base_dir: &Path, relative: &str) -> Result<PathBuf, ActionError> {
    let requested = Path::new(relative);
    if requested.is_absolute() || requested.has_root() {
        return Err(ActionError::AccessDenied(relative.to_string()));
    }

    let base = normalize_path(base_dir);
    let target = normalize_path(&base.join(requested));

    if !target.starts_with(&base) {
        return Err(ActionError::AccessDenied(relative.to_string()));
    }

    if escapes_via_link(&base, &target) {
        return Err(ActionError::AccessDenied(relative.to_string()));
    }

    Ok(target)
}

/// Whether the on-disk part of `target` leads outside `base`
fn escapes_via_link(base: &Path, target: &Path) -> bool {
    let Ok(canonical_base) = dunce::canonicalize(base) else {
        // Nothing under a missing base can be a link
        return false;
    };

    let Some(existing) = target.ancestors().find(|p| p.symlink_metadata().is_ok()) else {
        return false;
    };

    match dunce::canonicalize(existing) {
        Ok(canonical) => !canonical.starts_with(&canonical_base),
        // Only a dangling link exists without canonicalizing
        Err(_) => existing
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink()),
    }
}
