//! Recursive directory tree renderer shared by the terminal and file CLIs.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod style;

use style::StyleClass;

/// Directory names excluded from every traversal regardless of caller input.
pub const DEFAULT_IGNORES: [&str; 6] = [
    ".git",
    "__pycache__",
    "venv",
    "env",
    ".venv",
    "node_modules",
];

/// Hidden entry that is always listed despite its leading dot.
const HIDDEN_EXCEPTION: &str = ".env.example";

/// One line of rendered tree output.
///
/// The plain projection is `prefix` followed by `name`; the decorated
/// projection styles `name` only, so both projections always agree on
/// content and order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderLine {
    /// Nesting level, `0` for the root directory itself.
    pub depth: usize,
    /// Whether this entry is the last item of its parent's combined list.
    pub is_last: bool,
    /// Ancestor bars plus the connector glyph; empty at the root.
    pub prefix: String,
    /// Display name; directories carry a trailing `/`.
    pub name: String,
    /// Style class applied to `name` in the decorated projection.
    pub style: StyleClass,
}

impl RenderLine {
    /// Returns the line without any decoration.
    pub fn plain(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }

    /// Returns the line with ANSI styling applied to the name.
    pub fn decorated(&self) -> String {
        format!("{}{}", self.prefix, style::paint(&self.name, self.style, self.depth))
    }
}

/// Renders `root` into decorated and plain line projections.
///
/// Both projections come from a single traversal and are content-identical;
/// when `use_decoration` is `false` the decorated projection equals the
/// plain one.
pub fn render(
    root: &Path,
    extra_ignore: &[String],
    use_decoration: bool,
) -> (Vec<String>, Vec<String>) {
    let lines = render_lines(root, extra_ignore);
    let plain: Vec<String> = lines.iter().map(RenderLine::plain).collect();
    let decorated = if use_decoration {
        lines.iter().map(RenderLine::decorated).collect()
    } else {
        plain.clone()
    };

    (decorated, plain)
}

/// Walks `root` and returns the structured line sequence in display order.
///
/// Traversal is a synchronous, depth-first, pre-order recursion over a
/// static snapshot of the directory; it only reads the filesystem.
/// Caller-supplied ignore names are unioned with [`DEFAULT_IGNORES`], never
/// replacing them.
pub fn render_lines(root: &Path, extra_ignore: &[String]) -> Vec<RenderLine> {
    let mut ignore: HashSet<String> =
        DEFAULT_IGNORES.iter().map(|name| (*name).to_string()).collect();
    ignore.extend(extra_ignore.iter().cloned());

    let mut lines = Vec::new();
    walk(root, "", true, 0, &ignore, &mut lines);

    lines
}

/// A directory child selected for rendering.
struct ChildEntry {
    is_dir: bool,
    name: String,
    path: PathBuf,
}

/// Emits the line for `path` and recurses into its children.
fn walk(
    path: &Path,
    prefix: &str,
    is_last: bool,
    depth: usize,
    ignore: &HashSet<String>,
    out: &mut Vec<RenderLine>,
) {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    let (line_prefix, child_prefix) = if depth == 0 {
        (String::new(), String::new())
    } else if is_last {
        (format!("{prefix}└── "), format!("{prefix}    "))
    } else {
        (format!("{prefix}├── "), format!("{prefix}│   "))
    };

    out.push(RenderLine {
        depth,
        is_last,
        prefix: line_prefix,
        name: format!("{name}/"),
        style: StyleClass::Directory,
    });

    let (children, errors) = match list_children(path, ignore) {
        Ok(listing) => listing,
        Err(message) => {
            out.push(placeholder(depth + 1, &child_prefix, &message));
            return;
        }
    };

    let count = children.len();
    for (index, child) in children.into_iter().enumerate() {
        let child_is_last = index + 1 == count;
        if child.is_dir {
            walk(&child.path, &child_prefix, child_is_last, depth + 1, ignore, out);
        } else {
            let connector = if child_is_last { "└── " } else { "├── " };
            out.push(RenderLine {
                depth: depth + 1,
                is_last: child_is_last,
                prefix: format!("{child_prefix}{connector}"),
                style: style::classify(&child.name),
                name: child.name,
            });
        }
    }

    for message in errors {
        out.push(placeholder(depth + 1, &child_prefix, &message));
    }
}

/// Lists visible, non-ignored children of `path`: directories first, then
/// files, each group sorted ascending by name.
///
/// Entry-level enumeration failures are collected alongside the successful
/// entries so the caller can render them in place; failing to open the
/// directory itself is returned as `Err`.
fn list_children(
    path: &Path,
    ignore: &HashSet<String>,
) -> Result<(Vec<ChildEntry>, Vec<String>), String> {
    let reader = fs::read_dir(path).map_err(|err| describe(&err))?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in reader {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                errors.push(describe(&err));
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') && name != HIDDEN_EXCEPTION {
            continue;
        }

        let child_path = entry.path();
        let is_dir = child_path.is_dir();
        // Ignore names only exclude directories; a file named `env` stays.
        if is_dir && ignore.contains(&name) {
            continue;
        }

        let child = ChildEntry { is_dir, name, path: child_path };
        if child.is_dir {
            dirs.push(child);
        } else {
            files.push(child);
        }
    }

    dirs.sort_by(|first, second| first.name.cmp(&second.name));
    files.sort_by(|first, second| first.name.cmp(&second.name));
    dirs.extend(files);

    Ok((dirs, errors))
}

/// Builds the inline placeholder emitted when an entry cannot be listed.
fn placeholder(depth: usize, prefix: &str, message: &str) -> RenderLine {
    RenderLine {
        depth,
        is_last: false,
        prefix: format!("{prefix}├── "),
        name: message.to_string(),
        style: StyleClass::Error,
    }
}

/// Converts an I/O failure into its placeholder text.
fn describe(err: &io::Error) -> String {
    if err.kind() == io::ErrorKind::PermissionDenied {
        "Access Denied".to_string()
    } else {
        format!("Error: {err}")
    }
}
