//! Path helpers: user-input cleanup and parent folder derivation

use std::path::{Component, Path};

/// Typographic quotes that sneak into pasted paths
const CURLY_QUOTES: [char; 4] = ['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// Drop curly quotes from a user-supplied path
pub fn sanitize_path(raw: &str) -> String {
    raw.chars().filter(|c| !CURLY_QUOTES.contains(c)).collect()
}

/// Last component of the configured root, e.g. `tests` for `/work/repo/tests`
pub fn root_folder_name(root: &Path) -> Option<&str> {
    root.components().rev().find_map(|component| match component {
        Component::Normal(name) => name.to_str(),
        _ => None,
    })
}

/// Path of `file_path` starting at the root folder, `/`-separated
///
/// `None` when the root folder is not a component of `file_path`.
pub fn parent_folder_path(root: &Path, file_path: &Path) -> Option<String> {
    let root_name = root_folder_name(root)?;

    let components: Vec<&str> = file_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();

    let start = components.iter().position(|name| *name == root_name)?;
    Some(components[start..].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_curly_quotes() {
        assert_eq!(sanitize_path("\u{201C}/work/tests\u{201D}"), "/work/tests");
        assert_eq!(sanitize_path("\u{2018}a\u{2019}/b"), "a/b");
        assert_eq!(sanitize_path("plain/\"path\""), "plain/\"path\"");
    }

    #[test]
    fn test_root_folder_name() {
        assert_eq!(root_folder_name(Path::new("/work/repo/tests/")), Some("tests"));
        assert_eq!(root_folder_name(Path::new("tests")), Some("tests"));
        assert_eq!(root_folder_name(Path::new("/")), None);
    }

    #[test]
    fn test_parent_folder_path() {
        let root = Path::new("/work/repo/tests");
        assert_eq!(
            parent_folder_path(root, Path::new("/ci/checkout/tests/auth/test_login.py")),
            Some("tests/auth/test_login.py".to_string())
        );
        assert_eq!(
            parent_folder_path(root, Path::new("./tests/smoke.robot")),
            Some("tests/smoke.robot".to_string())
        );
    }

    #[test]
    fn test_root_must_be_whole_component() {
        let root = Path::new("/work/tests");
        assert_eq!(parent_folder_path(root, Path::new("/work/mytests/a.py")), None);
        assert_eq!(parent_folder_path(root, Path::new("/elsewhere/a.py")), None);
    }
}
