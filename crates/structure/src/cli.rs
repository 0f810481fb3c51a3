//! Argument helpers shared by the `structure` and `structure-file` binaries.

use std::path::Path;

/// Splits a comma-separated ignore list into trimmed, non-empty names.
pub fn parse_ignore_list(raw: Option<&str>) -> Vec<String> {
    raw.map_or_else(Vec::new, |list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

/// Derives the default project name from the resolved root path.
pub fn project_name_from_root(root: &Path) -> String {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    resolved
        .file_name()
        .map_or_else(|| resolved.display().to_string(), |name| name.to_string_lossy().into_owned())
}
