//! Import declaration handling.
//!
//! - Default imports: `import Header from './Header'`
//! - Named imports, optionally renamed: `import { Card as Tile } from './ui'`
//! - Namespace imports: `import * as Icons from './icons'`
//! - Side-effect imports: `import './global.css'`

use oxc_ast::ast::*;

use crate::types::{ImportKind, ImportRecord};

use super::visitor::{FactVisitor, module_export_name};

impl<'a> FactVisitor<'a> {
    pub(super) fn handle_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let source = decl.source.value.to_string();
        let line = self.get_line(decl.span);

        let Some(specifiers) = &decl.specifiers else {
            self.facts.imports.push(ImportRecord {
                kind: ImportKind::SideEffect,
                name: String::new(),
                source,
                line,
                imported: None,
            });
            return;
        };

        if specifiers.is_empty() {
            // `import {} from './x'` still loads the module
            self.facts.imports.push(ImportRecord {
                kind: ImportKind::SideEffect,
                name: String::new(),
                source,
                line,
                imported: None,
            });
            return;
        }

        for spec in specifiers {
            let record = match spec {
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportRecord {
                    kind: ImportKind::Default,
                    name: s.local.name.to_string(),
                    source: source.clone(),
                    line,
                    imported: None,
                },
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    let imported = module_export_name(&s.imported);
                    let local = s.local.name.to_string();
                    ImportRecord {
                        kind: ImportKind::Named,
                        imported: (imported != local).then_some(imported),
                        name: local,
                        source: source.clone(),
                        line,
                    }
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportRecord {
                    kind: ImportKind::Namespace,
                    name: s.local.name.to_string(),
                    source: source.clone(),
                    line,
                    imported: None,
                },
            };
            self.facts.imports.push(record);
        }
    }
}
