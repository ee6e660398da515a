//! FactVisitor struct and helper methods for AST traversal.

use oxc_ast::ast::*;
use oxc_span::Span;

use crate::types::{DefinitionKind, DefinitionRecord, ExportKind, ExportRecord, FileFacts};

/// Visitor for traversing a JS/TS AST and collecting the fact record.
pub(super) struct FactVisitor<'a> {
    pub facts: &'a mut FileFacts,
    pub source_text: &'a str,
    /// Lines before the parsed text in the original file (SFC script blocks).
    pub line_offset: usize,
    /// Set by an `export` wrapper, consumed by the declaration it wraps.
    pub pending_export: Option<ExportKind>,
}

impl<'a> FactVisitor<'a> {
    pub(super) fn new(facts: &'a mut FileFacts, source_text: &'a str, line_offset: usize) -> Self {
        Self {
            facts,
            source_text,
            line_offset,
            pending_export: None,
        }
    }

    /// Get line number from span position.
    pub(super) fn get_line(&self, span: Span) -> usize {
        let start = span.start as usize;
        let capped = std::cmp::min(start, self.source_text.len());
        self.source_text.as_bytes()[..capped]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1
            + self.line_offset
    }

    /// Record a definition, plus the correlated export when it is exported.
    pub(super) fn push_definition(
        &mut self,
        kind: DefinitionKind,
        name: &str,
        span: Span,
        export: Option<ExportKind>,
    ) {
        let line = self.get_line(span);
        self.facts.definitions.push(DefinitionRecord {
            kind,
            name: name.to_string(),
            line,
            exported: export.is_some(),
            export_kind: export,
        });
        if let Some(kind) = export {
            self.push_export(kind, name, span);
        }
    }

    pub(super) fn push_export(&mut self, kind: ExportKind, name: &str, span: Span) {
        let line = self.get_line(span);
        self.facts.exports.push(ExportRecord {
            kind,
            name: name.to_string(),
            line,
        });
    }

    /// Function, class and variable statements. Other declarations (TS types,
    /// enums) only consume a pending export marker.
    pub(super) fn handle_declaration(&mut self, decl: &Declaration<'a>) {
        let export = self.pending_export.take();
        match decl {
            Declaration::FunctionDeclaration(f) => {
                if let Some(id) = &f.id {
                    self.push_definition(DefinitionKind::Function, &id.name, f.span, export);
                }
            }
            Declaration::ClassDeclaration(c) => {
                if let Some(id) = &c.id {
                    self.push_definition(DefinitionKind::Class, &id.name, c.span, export);
                }
            }
            Declaration::VariableDeclaration(var) => {
                for d in &var.declarations {
                    if let BindingPattern::BindingIdentifier(id) = &d.id {
                        self.push_definition(DefinitionKind::Variable, &id.name, var.span, export);
                    }
                }
            }
            _ => {}
        }
    }
}

pub(super) fn module_export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}
