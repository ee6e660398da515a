//! JSX component usage handling.
//!
//! A tag counts as a component usage only when its name starts with an ASCII
//! uppercase letter. `<div>`, `<my-widget>` and `<svg:path>` are ignored here.

use oxc_ast::ast::*;

use crate::types::ComponentUsageRecord;

use super::visitor::FactVisitor;

/// Source-level tag name. Member tags keep their dotted form (`Menu.Item`).
pub fn jsx_element_name(name: &JSXElementName<'_>) -> Option<String> {
    match name {
        JSXElementName::Identifier(id) => Some(id.name.to_string()),
        JSXElementName::IdentifierReference(id) => Some(id.name.to_string()),
        JSXElementName::MemberExpression(member) => Some(jsx_member_name(member)),
        JSXElementName::NamespacedName(_) | JSXElementName::ThisExpression(_) => None,
    }
}

fn jsx_member_name(member: &JSXMemberExpression<'_>) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(inner) => jsx_member_name(inner),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}

/// Plain attribute names passed on an opening tag. Spreads are skipped.
pub fn jsx_attribute_names(element: &JSXOpeningElement<'_>) -> Vec<String> {
    element
        .attributes
        .iter()
        .filter_map(|item| match item {
            JSXAttributeItem::Attribute(attr) => match &attr.name {
                JSXAttributeName::Identifier(id) => Some(id.name.to_string()),
                JSXAttributeName::NamespacedName(_) => None,
            },
            JSXAttributeItem::SpreadAttribute(_) => None,
        })
        .collect()
}

pub(crate) fn is_component_tag(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

impl<'a> FactVisitor<'a> {
    pub(super) fn handle_jsx_opening_element(&mut self, element: &JSXOpeningElement<'a>) {
        let Some(name) = jsx_element_name(&element.name) else {
            return;
        };
        if !is_component_tag(&name) {
            return;
        }
        let line = self.get_line(element.span);
        self.facts.usages.push(ComponentUsageRecord {
            name,
            props: jsx_attribute_names(element),
            line,
        });
    }
}
