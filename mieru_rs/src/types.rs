use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extensions the scanner accepts and the extractor knows how to parse.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["vue", "jsx", "tsx", "js", "ts"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Vue,
    Unknown,
}

impl Language {
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_str() {
            "ts" | "tsx" => Language::TypeScript,
            "js" | "jsx" => Language::JavaScript,
            "vue" => Language::Vue,
            _ => Language::Unknown,
        }
    }
}

/// Lowercased extension without the leading dot, empty when missing.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// One scanned file. Created once per scan, never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub extension: String,
    pub language: Language,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl SourceFile {
    /// Stat `path` and build the record. `root` is used for the relative path.
    pub fn from_path(root: &Path, path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            relative_path,
            extension: extension_of(path),
            language: Language::from_path(path),
            size: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    /// Relative path with forward slashes, used by every path-pattern heuristic.
    pub fn relative_str(&self) -> String {
        slash_path(&self.relative_path)
    }
}

/// Render a path with `/` separators regardless of platform.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    Default,
    Named,
    Namespace,
    SideEffect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// Local binding. Empty only for side-effect imports.
    pub name: String,
    pub source: String,
    pub line: usize,
    /// Original exported name when a named import is renamed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported: Option<String>,
}

impl ImportRecord {
    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.')
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Default,
    Named,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub kind: ExportKind,
    pub name: String,
    pub line: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Function,
    Variable,
    Class,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub kind: DefinitionKind,
    pub name: String,
    pub line: usize,
    pub exported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ExportKind>,
}

/// One instantiation of a capitalized tag. Repeated uses stay separate records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentUsageRecord {
    pub name: String,
    pub props: Vec<String>,
    pub line: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicImportKind {
    DynamicImport,
    Require,
}

/// `import("./x")` or `require("./x")` with a literal argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicImportRecord {
    pub kind: DynamicImportKind,
    pub source: String,
    pub line: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfcBlock {
    /// 1-based line of the opening tag.
    pub start_line: usize,
    /// 1-based line of the closing tag.
    pub end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub setup: bool,
    pub scoped: bool,
}

/// Block layout of a Vue single-file component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfcDescriptor {
    pub scripts: Vec<SfcBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<SfcBlock>,
    pub styles: Vec<SfcBlock>,
}

/// Normalized per-file extraction output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileFacts {
    pub path: PathBuf,
    pub language: Option<Language>,
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
    pub definitions: Vec<DefinitionRecord>,
    pub usages: Vec<ComponentUsageRecord>,
    pub dynamic_imports: Vec<DynamicImportRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfc: Option<SfcDescriptor>,
    pub errors: Vec<String>,
    /// Wall-clock extraction time. The only field that differs between runs.
    pub parse_time_ms: f64,
}

impl FileFacts {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            language: Some(Language::from_path(path)),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Drop every extracted fact, keeping identity and timing.
    pub fn clear_facts(&mut self) {
        self.imports.clear();
        self.exports.clear();
        self.definitions.clear();
        self.usages.clear();
        self.dynamic_imports.clear();
    }

    /// Name of the default-exported definition, if there is one.
    pub fn default_definition_name(&self) -> Option<&str> {
        self.definitions
            .iter()
            .find(|d| d.exported && d.export_kind == Some(ExportKind::Default))
            .map(|d| d.name.as_str())
    }

    pub fn has_default_export(&self) -> bool {
        self.exports.iter().any(|e| e.kind == ExportKind::Default)
    }

    pub fn has_named_export(&self) -> bool {
        self.exports.iter().any(|e| e.kind == ExportKind::Named)
    }
}

/// Result of extracting a batch of files. Failures are counted, never dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BatchExtraction {
    pub records: Vec<FileFacts>,
    pub total_files: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub total_time_ms: f64,
}

impl BatchExtraction {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} files parsed successfully",
            self.success_count, self.total_files
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_follows_extension() {
        assert_eq!(Language::from_path(Path::new("a/B.tsx")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("a/b.js")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("App.vue")), Language::Vue);
        assert_eq!(Language::from_path(Path::new("style.css")), Language::Unknown);
        assert_eq!(Language::from_path(Path::new("Makefile")), Language::Unknown);
    }

    #[test]
    fn default_definition_requires_default_export_kind() {
        let mut facts = FileFacts::new(Path::new("Button.tsx"));
        facts.definitions.push(DefinitionRecord {
            kind: DefinitionKind::Function,
            name: "helper".into(),
            line: 1,
            exported: true,
            export_kind: Some(ExportKind::Named),
        });
        assert_eq!(facts.default_definition_name(), None);

        facts.definitions.push(DefinitionRecord {
            kind: DefinitionKind::Function,
            name: "Button".into(),
            line: 3,
            exported: true,
            export_kind: Some(ExportKind::Default),
        });
        assert_eq!(facts.default_definition_name(), Some("Button"));
    }

    #[test]
    fn source_file_from_disk() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let file = dir.path().join("src").join("Header.tsx");
        std::fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
        std::fs::write(&file, "export default function Header() {}\n").expect("write");

        let record = SourceFile::from_path(dir.path(), &file).expect("stat");
        assert_eq!(record.name, "Header.tsx");
        assert_eq!(record.relative_str(), "src/Header.tsx");
        assert_eq!(record.extension, "tsx");
        assert_eq!(record.language, Language::TypeScript);
        assert!(record.size > 0);
        assert!(record.last_modified.is_some());
    }
}
