//! Export declaration handling.
//!
//! Declarations wrapped in `export` are recorded by the declaration rule, which
//! reads the pending export marker set here. Specifier lists and default
//! exports are recorded directly.

use oxc_ast::ast::*;

use crate::types::{DefinitionKind, ExportKind};

use super::visitor::{FactVisitor, module_export_name};

impl<'a> FactVisitor<'a> {
    /// `export const x`, `export function f`, `export { a, b as c }`,
    /// `export { x } from './y'`.
    pub(super) fn handle_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if decl.declaration.is_some() {
            self.pending_export = Some(ExportKind::Named);
            return;
        }
        for spec in &decl.specifiers {
            let exported = module_export_name(&spec.exported);
            if exported == "default" {
                let local = module_export_name(&spec.local);
                self.push_export(ExportKind::Default, &local, spec.span);
            } else {
                self.push_export(ExportKind::Named, &exported, spec.span);
            }
        }
    }

    /// `export default function Page() {}`, `export default class X {}`,
    /// `export default Page`, `export default { ... }`.
    pub(super) fn handle_export_default_declaration(
        &mut self,
        decl: &ExportDefaultDeclaration<'a>,
    ) {
        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(f) => match &f.id {
                Some(id) => self.push_definition(
                    DefinitionKind::Function,
                    &id.name,
                    decl.span,
                    Some(ExportKind::Default),
                ),
                None => self.push_export(ExportKind::Default, "default", decl.span),
            },
            ExportDefaultDeclarationKind::ClassDeclaration(c) => match &c.id {
                Some(id) => self.push_definition(
                    DefinitionKind::Class,
                    &id.name,
                    decl.span,
                    Some(ExportKind::Default),
                ),
                None => self.push_export(ExportKind::Default, "default", decl.span),
            },
            ExportDefaultDeclarationKind::Identifier(id) => {
                // the local definition is marked once the whole file is visited
                self.push_export(ExportKind::Default, &id.name, decl.span);
            }
            _ => self.push_export(ExportKind::Default, "default", decl.span),
        }
    }
}
