//! JavaScript/TypeScript fact extraction using the OXC parser.
//!
//! One parse, one top-down traversal. Six rules fire on node shape (import
//! declaration, export declaration, function, variable statement, class,
//! JSX opening element) and traversal always continues into children.
//!
//! # Module Structure
//!
//! - `visitor`: FactVisitor struct, line numbers and the declaration rule
//! - `imports`: import declarations
//! - `exports`: named and default exports
//! - `jsx`: component usages
//! - `calls`: `import()` and `require()`
//! - `sfc`: Vue block splitting
//! - `template`: regex pass over Vue templates

mod calls;
mod exports;
mod imports;
mod jsx;
pub(crate) mod sfc;
mod template;
mod visitor;

use std::path::Path;
use std::time::Instant;

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::SourceType;
use tracing::{debug, info, warn};

use crate::types::{BatchExtraction, ExportKind, FileFacts, SourceFile, extension_of};

pub use jsx::{jsx_attribute_names, jsx_element_name};
pub(crate) use jsx::is_component_tag;

use sfc::split_sfc;
use template::parse_template_usages;
use visitor::FactVisitor;

/// OXC source type for a script file extension.
pub fn source_type_for(ext: &str) -> SourceType {
    match ext {
        "ts" | "mts" | "cts" => SourceType::ts(),
        "tsx" => SourceType::tsx(),
        _ => SourceType::jsx(),
    }
}

/// SFC script blocks always allow JSX; `lang="ts"` adds TypeScript.
pub fn sfc_source_type(lang: Option<&str>) -> SourceType {
    match lang {
        Some("ts" | "tsx") => SourceType::tsx(),
        _ => SourceType::jsx(),
    }
}

/// Parse `source` and run the visitor over it. Any syntax error fails the
/// whole parse; the error string names the count and the first diagnostic.
fn extract_script(
    source: &str,
    source_type: SourceType,
    line_offset: usize,
    facts: &mut FileFacts,
) -> Result<(), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let first = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        return Err(format!(
            "{} syntax error(s): {}",
            ret.errors.len().max(1),
            first
        ));
    }

    let mut visitor = FactVisitor::new(facts, source, line_offset);
    visitor.visit_program(&ret.program);
    Ok(())
}

/// `export default Name` marks the matching local definition as the default
/// export, wherever the definition sits in the file.
fn mark_default_definitions(facts: &mut FileFacts) {
    let defaults: Vec<String> = facts
        .exports
        .iter()
        .filter(|e| e.kind == ExportKind::Default && e.name != "default")
        .map(|e| e.name.clone())
        .collect();
    for name in defaults {
        if let Some(def) = facts
            .definitions
            .iter_mut()
            .find(|d| d.name == name && d.export_kind != Some(ExportKind::Default))
        {
            def.exported = true;
            def.export_kind = Some(ExportKind::Default);
        }
    }
}

fn extract_vue(content: &str, facts: &mut FileFacts) {
    let parts = split_sfc(content);
    facts.sfc = Some(parts.descriptor);

    for script in &parts.scripts {
        let source_type = sfc_source_type(script.lang.as_deref());
        if let Err(err) = extract_script(script.content, source_type, script.line_offset, facts) {
            facts.errors.push(format!("script block: {}", err));
        }
    }

    if let Some(template) = parts.template {
        facts
            .usages
            .extend(parse_template_usages(template.content, template.first_line));
    }
}

/// Extract the fact record for one file's content. Never fails: a syntax
/// error yields an empty fact set and one error string.
pub fn extract_facts(content: &str, path: &Path) -> FileFacts {
    let started = Instant::now();
    let mut facts = FileFacts::new(path);
    let ext = extension_of(path);

    if ext == "vue" {
        extract_vue(content, &mut facts);
    } else if let Err(err) = extract_script(content, source_type_for(&ext), 0, &mut facts) {
        facts.errors.push(err);
    }

    if facts.errors.is_empty() {
        mark_default_definitions(&mut facts);
    } else {
        facts.clear_facts();
        facts.errors.truncate(1);
        debug!("parse failed for {}: {}", path.display(), facts.errors[0]);
    }

    facts.parse_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    facts
}

/// Read and extract one scanned file. An unreadable file becomes an error record.
pub fn extract_file(file: &SourceFile) -> FileFacts {
    match std::fs::read_to_string(&file.path) {
        Ok(content) => extract_facts(&content, &file.path),
        Err(err) => {
            warn!("failed to read {}: {}", file.path.display(), err);
            let mut facts = FileFacts::new(&file.path);
            facts.errors.push(format!("failed to read file: {}", err));
            facts
        }
    }
}

/// Extract every file in order, counting successes and failures.
pub fn extract_batch(files: &[SourceFile]) -> BatchExtraction {
    let started = Instant::now();
    let mut batch = BatchExtraction {
        total_files: files.len(),
        ..BatchExtraction::default()
    };

    for file in files {
        let facts = extract_file(file);
        if facts.is_ok() {
            batch.success_count += 1;
        } else {
            batch.error_count += 1;
        }
        debug!(
            "extracted {} ({} imports, {} usages)",
            file.relative_path.display(),
            facts.imports.len(),
            facts.usages.len()
        );
        batch.records.push(facts);
    }

    batch.total_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!("{}", batch.summary());
    batch
}

/// Wires the visitor hooks to the rule handlers in the submodules.
impl<'a> Visit<'a> for FactVisitor<'a> {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        self.handle_import_declaration(decl);
        walk::walk_import_declaration(self, decl);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        self.handle_export_named_declaration(decl);
        walk::walk_export_named_declaration(self, decl);
        self.pending_export = None;
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        self.handle_export_default_declaration(decl);
        walk::walk_export_default_declaration(self, decl);
    }

    // function, variable statement and class rules
    fn visit_declaration(&mut self, decl: &Declaration<'a>) {
        self.handle_declaration(decl);
        walk::walk_declaration(self, decl);
    }

    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement<'a>) {
        self.handle_jsx_opening_element(element);
        walk::walk_jsx_opening_element(self, element);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        self.handle_import_expression(expr);
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        self.handle_call_expression(call);
        walk::walk_call_expression(self, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DefinitionKind;
    use std::path::Path;

    #[test]
    fn test_syntax_error_yields_empty_facts_and_one_error() {
        let content = r#"
import Header from "./Header";
export default function Broken( {
"#;
        let facts = extract_facts(content, Path::new("Broken.jsx"));
        assert_eq!(facts.errors.len(), 1);
        assert!(facts.errors[0].contains("syntax error"), "{:?}", facts.errors);
        assert!(facts.imports.is_empty());
        assert!(facts.exports.is_empty());
        assert!(facts.definitions.is_empty());
        assert!(facts.usages.is_empty());
        assert!(facts.parse_time_ms >= 0.0);
    }

    #[test]
    fn test_extraction_is_idempotent_apart_from_timing() {
        let content = r#"
import { Card } from "./Card";
export const Grid = ({ items }) => items.map((i) => <Card key={i.id} item={i} />);
"#;
        let mut first = extract_facts(content, Path::new("Grid.jsx"));
        let mut second = extract_facts(content, Path::new("Grid.jsx"));
        first.parse_time_ms = 0.0;
        second.parse_time_ms = 0.0;
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
    }

    #[test]
    fn test_nested_definitions_are_visited() {
        let content = r#"
function outer() {
  function inner() {}
  const local = 1;
  class Helper {}
}
"#;
        let facts = extract_facts(content, Path::new("nested.js"));
        let defs: Vec<_> = facts
            .definitions
            .iter()
            .map(|d| (d.kind, d.name.as_str(), d.line))
            .collect();
        assert_eq!(
            defs,
            vec![
                (DefinitionKind::Function, "outer", 2),
                (DefinitionKind::Function, "inner", 3),
                (DefinitionKind::Variable, "local", 4),
                (DefinitionKind::Class, "Helper", 5),
            ]
        );
        assert!(facts.definitions.iter().all(|d| !d.exported));
    }

    #[test]
    fn test_typescript_generics_without_jsx() {
        let content = "export const id = <T,>(value: T): T => value;\nexport type Id = string;\n";
        let facts = extract_facts(content, Path::new("id.ts"));
        assert!(facts.errors.is_empty(), "errors: {:?}", facts.errors);
        assert_eq!(facts.exports.len(), 1);
    }

    #[test]
    fn test_vue_sfc_merges_script_and_template() {
        let content = r#"<template>
  <div>
    <UserCard :user="me" />
    <base-button>Save</base-button>
  </div>
</template>

<script setup lang="ts">
import UserCard from './UserCard.vue'
const me = { name: 'a' }
</script>
"#;
        let facts = extract_facts(content, Path::new("Profile.vue"));
        assert!(facts.errors.is_empty(), "errors: {:?}", facts.errors);
        assert_eq!(facts.imports.len(), 1);
        assert_eq!(facts.imports[0].line, 9);
        assert_eq!(facts.definitions[0].name, "me");
        assert_eq!(facts.definitions[0].line, 10);

        assert_eq!(facts.usages.len(), 1);
        assert_eq!(facts.usages[0].name, "UserCard");
        assert_eq!(facts.usages[0].line, 3);
        assert_eq!(facts.usages[0].props, vec!["user".to_string()]);
        assert!(facts.sfc.is_some());
    }

    #[test]
    fn test_vue_ts_script_allows_jsx() {
        let content = r#"<script lang="ts">
import UserCard from './UserCard.vue'
const count: number = 1
export const render = () => <UserCard count={count} />
</script>
"#;
        let facts = extract_facts(content, Path::new("Card.vue"));
        assert!(facts.errors.is_empty(), "errors: {:?}", facts.errors);
        assert_eq!(facts.usages.len(), 1);
        assert_eq!(facts.usages[0].name, "UserCard");
        assert_eq!(facts.usages[0].line, 4);
    }

    #[test]
    fn test_vue_script_error_fails_the_record() {
        let content = "<template><Foo /></template>\n<script>\nimport {\n</script>\n";
        let facts = extract_facts(content, Path::new("Bad.vue"));
        assert_eq!(facts.errors.len(), 1);
        assert!(facts.errors[0].starts_with("script block:"));
        assert!(facts.usages.is_empty());
    }

    #[test]
    fn test_batch_counts_failures() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let good = tmp.path().join("Good.jsx");
        let bad = tmp.path().join("Bad.jsx");
        std::fs::write(&good, "export default function Good() { return <div/>; }").expect("write");
        std::fs::write(&bad, "export default function Bad( {").expect("write");
        let files = vec![
            SourceFile::from_path(tmp.path(), &bad).expect("stat"),
            SourceFile::from_path(tmp.path(), &good).expect("stat"),
        ];
        std::fs::remove_file(&good).expect("remove");

        let batch = extract_batch(&files);
        assert_eq!(batch.total_files, 2);
        assert_eq!(batch.success_count, 0);
        assert_eq!(batch.error_count, 2);
        assert_eq!(batch.records.len(), 2);
        assert!(batch.records[1].errors[0].contains("failed to read"));
        assert_eq!(batch.summary(), "0 of 2 files parsed successfully");
    }
}
