//! Node-style relative specifier resolution.
//!
//! Only specifiers starting with `.` are resolved. Bare and absolute
//! specifiers are treated as external packages and never touch the disk.

use std::path::{Component, Path, PathBuf};

/// Extensions tried, in order, for extension-less specifiers and `index` files.
pub const RESOLVE_EXTENSIONS: [&str; 5] = ["vue", "ts", "tsx", "js", "jsx"];

/// Lexically normalize `.` and `..` components without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn has_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RESOLVE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Try the candidate itself, then each extension, then `index.<ext>` inside it.
pub fn resolve_with_extensions(candidate: &Path) -> Option<PathBuf> {
    let candidate = normalize_path(candidate);
    if has_recognized_extension(&candidate) {
        return candidate.is_file().then_some(candidate);
    }
    for ext in RESOLVE_EXTENSIONS {
        let with_ext = with_suffix(&candidate, ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    if candidate.is_dir() {
        for ext in RESOLVE_EXTENSIONS {
            let index = candidate.join(format!("index.{ext}"));
            if index.is_file() {
                return Some(index);
            }
        }
    }
    None
}

/// Resolve `spec` as written in `from_file`. Returns the normalized absolute path.
pub fn resolve_relative(from_file: &Path, spec: &str) -> Option<PathBuf> {
    if !spec.starts_with('.') {
        return None;
    }
    let parent = from_file.parent()?;
    resolve_with_extensions(&parent.join(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "").expect("write");
        path
    }

    #[test]
    fn bare_and_absolute_specifiers_are_external() {
        let tmp = TempDir::new().expect("tempdir");
        let from = touch(tmp.path(), "src/App.tsx");
        touch(tmp.path(), "node_modules/lodash/index.js");
        assert_eq!(resolve_relative(&from, "lodash"), None);
        assert_eq!(resolve_relative(&from, "@/components/Header"), None);
        assert_eq!(resolve_relative(&from, "/src/App.tsx"), None);
    }

    #[test]
    fn extension_order_prefers_vue_then_ts() {
        let tmp = TempDir::new().expect("tempdir");
        let from = touch(tmp.path(), "src/App.vue");
        let vue = touch(tmp.path(), "src/Card.vue");
        touch(tmp.path(), "src/Card.ts");
        let ts = touch(tmp.path(), "src/util.ts");
        touch(tmp.path(), "src/util.js");
        assert_eq!(resolve_relative(&from, "./Card"), Some(vue));
        assert_eq!(resolve_relative(&from, "./util"), Some(ts));
    }

    #[test]
    fn explicit_extension_must_exist() {
        let tmp = TempDir::new().expect("tempdir");
        let from = touch(tmp.path(), "src/App.tsx");
        touch(tmp.path(), "src/Card.tsx");
        assert_eq!(resolve_relative(&from, "./Card.jsx"), None);
        assert!(resolve_relative(&from, "./Card.tsx").is_some());
    }

    #[test]
    fn directory_index_and_parent_segments() {
        let tmp = TempDir::new().expect("tempdir");
        let from = touch(tmp.path(), "src/pages/Home.tsx");
        let index = touch(tmp.path(), "src/components/Nav/index.tsx");
        let resolved = resolve_relative(&from, "../components/Nav").expect("index resolves");
        assert_eq!(resolved, normalize_path(&index));
        assert!(!resolved.to_string_lossy().contains(".."));

        // resolving twice is stable
        assert_eq!(resolve_relative(&from, "../components/Nav"), Some(resolved));
    }

    #[test]
    fn dotted_names_still_get_extensions() {
        let tmp = TempDir::new().expect("tempdir");
        let from = touch(tmp.path(), "src/App.tsx");
        let styled = touch(tmp.path(), "src/Button.styles.ts");
        assert_eq!(resolve_relative(&from, "./Button.styles"), Some(styled));
    }

    #[test]
    fn normalize_handles_dots() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./../c/d.ts")),
            PathBuf::from("/a/c/d.ts")
        );
    }
}
