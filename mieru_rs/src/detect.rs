//! Project flavor detection.
//!
//! Two independent signals:
//! - the scanned file list (extension mix, `pages/`/`app/` directories and
//!   framework config files) decides which page resolver runs;
//! - `package.json` (or an externally supplied JSON hint) gives a
//!   [`FrameworkHint`] with page globs. A hint is advisory only.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::types::SourceFile;

/// Hints below this confidence are ignored.
pub const MIN_HINT_CONFIDENCE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectFlavor {
    React,
    Next,
    Vue,
    Nuxt,
    Unknown,
}

impl ProjectFlavor {
    /// React and Next projects go through entry-point routing.
    pub fn is_react_like(self) -> bool {
        matches!(self, ProjectFlavor::React | ProjectFlavor::Next)
    }

    /// Default component expansion depth for this flavor.
    pub fn default_expansion_depth(self) -> usize {
        if self.is_react_like() { 5 } else { 3 }
    }
}

impl std::fmt::Display for ProjectFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectFlavor::React => "react",
            ProjectFlavor::Next => "next",
            ProjectFlavor::Vue => "vue",
            ProjectFlavor::Nuxt => "nuxt",
            ProjectFlavor::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Flavor from the file list alone. Directory markers win over extensions.
pub fn detect_flavor(files: &[SourceFile]) -> ProjectFlavor {
    let rooted: Vec<String> = files
        .iter()
        .map(|f| format!("/{}", f.relative_str()))
        .collect();

    let next = rooted
        .iter()
        .any(|p| p.contains("/pages/") || p.contains("/app/") || p.contains("next.config"));
    let nuxt = rooted
        .iter()
        .any(|p| p.contains("nuxt.config") || p.contains(".nuxt/"));

    if next {
        ProjectFlavor::Next
    } else if nuxt {
        ProjectFlavor::Nuxt
    } else if files.iter().any(|f| f.extension == "vue") {
        ProjectFlavor::Vue
    } else if files
        .iter()
        .any(|f| f.extension == "jsx" || f.extension == "tsx")
    {
        ProjectFlavor::React
    } else {
        ProjectFlavor::Unknown
    }
}

/// Framework guess with page and component globs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameworkHint {
    #[serde(alias = "framework")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 0 to 100.
    pub confidence: u8,
    #[serde(alias = "page_patterns")]
    pub page_patterns: Vec<String>,
    #[serde(alias = "component_patterns")]
    pub component_patterns: Vec<String>,
    #[serde(alias = "config_files")]
    pub config_files: Vec<String>,
}

impl FrameworkHint {
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_string(),
            ..Self::default()
        }
    }

    pub fn is_confident(&self) -> bool {
        self.confidence >= MIN_HINT_CONFIDENCE
    }

    /// Flavor named by a confident hint.
    pub fn flavor(&self) -> Option<ProjectFlavor> {
        if !self.is_confident() {
            return None;
        }
        let lower = self.name.to_ascii_lowercase();
        if lower.contains("next") {
            Some(ProjectFlavor::Next)
        } else if lower.contains("nuxt") {
            Some(ProjectFlavor::Nuxt)
        } else if lower.contains("vue") {
            Some(ProjectFlavor::Vue)
        } else if lower.contains("react") {
            Some(ProjectFlavor::React)
        } else {
            None
        }
    }
}

const CONFIG_FILES: &[&str] = &[
    "package.json",
    "nuxt.config.js",
    "nuxt.config.ts",
    "next.config.js",
    "next.config.ts",
    "vite.config.js",
    "vite.config.ts",
    "vue.config.js",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Dependency name, display name, confidence, page globs, component globs.
type FrameworkRow = (&'static str, &'static str, u8, &'static [&'static str], &'static [&'static str]);

const FRAMEWORKS: &[FrameworkRow] = &[
    (
        "next",
        "Next.js",
        90,
        &["pages/**/*.{js,jsx,ts,tsx}", "app/**/page.{js,jsx,ts,tsx}", "src/pages/**/*.{js,jsx,ts,tsx}"],
        &["components/**/*.{jsx,tsx}", "src/components/**/*.{jsx,tsx}"],
    ),
    (
        "nuxt",
        "Nuxt.js",
        90,
        &["pages/**/*.vue", "layouts/**/*.vue"],
        &["components/**/*.vue"],
    ),
    (
        "vue",
        "Vue.js",
        85,
        &["src/views/**/*.vue", "src/pages/**/*.vue"],
        &["src/components/**/*.vue"],
    ),
    (
        "react",
        "React",
        85,
        &["src/pages/**/*.{js,jsx,ts,tsx}", "src/routes/**/*.{js,jsx,ts,tsx}"],
        &["src/components/**/*.{js,jsx,ts,tsx}"],
    ),
];

/// Static framework guess from `package.json` dependencies.
pub fn detect_framework(root: &Path) -> FrameworkHint {
    let manifest = root.join("package.json");
    let Ok(content) = std::fs::read_to_string(&manifest) else {
        return FrameworkHint::unknown();
    };
    let json: serde_json::Value = match serde_json::from_str(&content) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to parse {}: {}", manifest.display(), e);
            return FrameworkHint::unknown();
        }
    };

    let dependency = |name: &str| -> Option<String> {
        ["dependencies", "devDependencies", "peerDependencies"]
            .iter()
            .find_map(|section| json.get(section)?.get(name)?.as_str().map(str::to_string))
    };

    let config_files: Vec<String> = CONFIG_FILES
        .iter()
        .filter(|f| root.join(f).is_file())
        .map(|f| f.to_string())
        .collect();

    for (dep, name, confidence, pages, components) in FRAMEWORKS {
        if let Some(version) = dependency(*dep) {
            debug!("package.json declares {} {}", dep, version);
            return FrameworkHint {
                name: name.to_string(),
                version: Some(version),
                confidence: *confidence,
                page_patterns: strings(pages),
                component_patterns: strings(components),
                config_files,
            };
        }
    }

    FrameworkHint {
        config_files,
        ..FrameworkHint::unknown()
    }
}

/// Read a hint produced elsewhere (JSON, camelCase or snake_case keys).
pub fn load_hint(path: &Path) -> Result<FrameworkHint, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::HintIo {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hint: FrameworkHint =
        serde_json::from_str(&content).map_err(|source| ConfigError::HintFormat {
            path: path.to_path_buf(),
            source,
        })?;
    hint.confidence = hint.confidence.min(100);
    Ok(hint)
}

/// File-list detection, with a confident hint breaking an `Unknown` tie.
pub fn resolve_flavor(files: &[SourceFile], hint: Option<&FrameworkHint>) -> ProjectFlavor {
    let detected = detect_flavor(files);
    if detected != ProjectFlavor::Unknown {
        return detected;
    }
    hint.and_then(FrameworkHint::flavor).unwrap_or(ProjectFlavor::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn files(root: &Path, rels: &[&str]) -> Vec<SourceFile> {
        rels.iter()
            .map(|rel| {
                let path = root.join(rel);
                std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
                std::fs::write(&path, "").expect("write");
                SourceFile::from_path(root, &path).expect("stat")
            })
            .collect()
    }

    #[test]
    fn flavor_markers() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path();
        assert_eq!(detect_flavor(&files(root, &["pages/index.tsx"])), ProjectFlavor::Next);
        assert_eq!(detect_flavor(&files(root, &["nuxt.config.ts"])), ProjectFlavor::Nuxt);
        assert_eq!(detect_flavor(&files(root, &["src/App.vue"])), ProjectFlavor::Vue);
        assert_eq!(detect_flavor(&files(root, &["src/App.jsx"])), ProjectFlavor::React);
        assert_eq!(detect_flavor(&files(root, &["src/util.ts"])), ProjectFlavor::Unknown);
        // directory markers beat extensions
        assert_eq!(
            detect_flavor(&files(root, &["src/App.vue", "src/app/main.ts"])),
            ProjectFlavor::Next
        );
    }

    #[test]
    fn framework_from_package_json() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(
            tmp.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.2.0", "vue": "^3.4.0"}}"#,
        )
        .expect("write");
        let hint = detect_framework(tmp.path());
        // vue is checked before react
        assert_eq!(hint.name, "Vue.js");
        assert_eq!(hint.version.as_deref(), Some("^3.4.0"));
        assert_eq!(hint.confidence, 85);
        assert_eq!(hint.config_files, vec!["package.json".to_string()]);
        assert_eq!(hint.flavor(), Some(ProjectFlavor::Vue));
    }

    #[test]
    fn missing_manifest_is_unknown() {
        let tmp = TempDir::new().expect("tempdir");
        let hint = detect_framework(tmp.path());
        assert_eq!(hint.name, "Unknown");
        assert_eq!(hint.confidence, 0);
        assert!(hint.flavor().is_none());
    }

    #[test]
    fn hint_file_accepts_camel_case() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("hint.json");
        std::fs::write(
            &path,
            r#"{"framework": "Nuxt.js", "confidence": 95, "pagePatterns": ["pages/**/*.vue"]}"#,
        )
        .expect("write");
        let hint = load_hint(&path).expect("hint");
        assert_eq!(hint.name, "Nuxt.js");
        assert_eq!(hint.page_patterns, vec!["pages/**/*.vue".to_string()]);
        assert!(hint.component_patterns.is_empty());

        std::fs::write(&path, "{not json").expect("write");
        assert!(matches!(load_hint(&path), Err(ConfigError::HintFormat { .. })));
        assert!(matches!(
            load_hint(&tmp.path().join("missing.json")),
            Err(ConfigError::HintIo { .. })
        ));
    }

    #[test]
    fn low_confidence_hint_does_not_decide() {
        let tmp = TempDir::new().expect("tempdir");
        let scanned = files(tmp.path(), &["src/util.ts"]);
        let weak = FrameworkHint {
            name: "Vue.js".into(),
            confidence: 20,
            ..FrameworkHint::default()
        };
        assert_eq!(resolve_flavor(&scanned, Some(&weak)), ProjectFlavor::Unknown);
        let strong = FrameworkHint {
            confidence: 80,
            ..weak
        };
        assert_eq!(resolve_flavor(&scanned, Some(&strong)), ProjectFlavor::Vue);
    }
}
