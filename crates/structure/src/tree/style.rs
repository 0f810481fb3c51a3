//! Extension-based style classification and ANSI decoration for tree lines.

use std::path::Path;

use colored::Colorize;

/// Extensions rendered with the source-code style.
const SOURCE_EXTENSIONS: [&str; 14] = [
    "py", "rs", "js", "ts", "jsx", "tsx", "java", "c", "cpp", "h", "cs", "go", "rb", "php",
];

/// Extensions rendered with the markup/config style.
const MARKUP_EXTENSIONS: [&str; 9] =
    ["html", "xml", "css", "json", "yml", "yaml", "toml", "ini", "conf"];

/// Extensions rendered with the documentation style.
const DOCUMENTATION_EXTENSIONS: [&str; 6] = ["md", "txt", "rst", "pdf", "doc", "docx"];

/// Extensions rendered with the image style.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "svg", "ico", "webp"];

/// Extensions rendered with the binary/executable style.
const BINARY_EXTENSIONS: [&str; 5] = ["exe", "dll", "so", "dylib", "bin"];

/// Display category attached to every rendered line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleClass {
    Directory,
    Source,
    Markup,
    Documentation,
    Image,
    Binary,
    Error,
    Other,
}

/// Classifies a file name by its extension.
///
/// Classification only affects the decorated projection; plain output and
/// ordering never depend on it.
pub fn classify(name: &str) -> StyleClass {
    let Some(extension) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
        return StyleClass::Other;
    };
    let extension = extension.to_ascii_lowercase();

    if SOURCE_EXTENSIONS.contains(&extension.as_str()) {
        StyleClass::Source
    } else if MARKUP_EXTENSIONS.contains(&extension.as_str()) {
        StyleClass::Markup
    } else if DOCUMENTATION_EXTENSIONS.contains(&extension.as_str()) {
        StyleClass::Documentation
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        StyleClass::Image
    } else if BINARY_EXTENSIONS.contains(&extension.as_str()) {
        StyleClass::Binary
    } else {
        StyleClass::Other
    }
}

/// Applies the ANSI style for `class` to `name`.
///
/// The root directory (depth `0`) is rendered bold in addition to the
/// directory color.
pub(crate) fn paint(name: &str, class: StyleClass, depth: usize) -> String {
    let styled = match class {
        StyleClass::Directory if depth == 0 => name.blue().bold(),
        StyleClass::Directory => name.blue(),
        StyleClass::Source => name.green(),
        StyleClass::Markup => name.cyan(),
        StyleClass::Documentation => name.yellow(),
        StyleClass::Image => name.magenta(),
        StyleClass::Binary | StyleClass::Error => name.red(),
        StyleClass::Other => name.white(),
    };

    styled.to_string()
}
