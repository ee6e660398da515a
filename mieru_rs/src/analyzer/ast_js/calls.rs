//! Dynamic dependency handling: `import('./module')` and `require('./module')`.
//!
//! Only literal specifiers are recorded; computed ones cannot be resolved.

use oxc_ast::ast::*;

use crate::types::{DynamicImportKind, DynamicImportRecord};

use super::visitor::FactVisitor;

impl<'a> FactVisitor<'a> {
    pub(super) fn handle_import_expression(&mut self, expr: &ImportExpression<'a>) {
        let source = match &expr.source {
            Expression::StringLiteral(s) => s.value.to_string(),
            Expression::TemplateLiteral(t) if t.expressions.is_empty() && t.quasis.len() == 1 => {
                t.quasis[0].value.raw.to_string()
            }
            _ => return,
        };
        let line = self.get_line(expr.span);
        self.facts.dynamic_imports.push(DynamicImportRecord {
            kind: DynamicImportKind::DynamicImport,
            source,
            line,
        });
    }

    pub(super) fn handle_call_expression(&mut self, call: &CallExpression<'a>) {
        let Expression::Identifier(callee) = &call.callee else {
            return;
        };
        if callee.name.as_str() != "require" || call.arguments.len() != 1 {
            return;
        }
        if let Some(Argument::StringLiteral(s)) = call.arguments.first() {
            let line = self.get_line(call.span);
            self.facts.dynamic_imports.push(DynamicImportRecord {
                kind: DynamicImportKind::Require,
                source: s.value.to_string(),
                line,
            });
        }
    }
}
