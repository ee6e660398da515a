//! Single File Component block splitting.
//!
//! Splits a `.vue` file into its script, template and style blocks, keeping
//! where each block starts so that facts can report whole-file line numbers.

use regex::Captures;

use crate::analyzer::regexes::{
    regex_sfc_lang, regex_sfc_scoped, regex_sfc_script, regex_sfc_setup, regex_sfc_style,
    regex_sfc_template,
};
use crate::types::{SfcBlock, SfcDescriptor};

/// Script block content plus the number of file lines before it.
pub(crate) struct SfcScript<'s> {
    pub content: &'s str,
    pub line_offset: usize,
    pub lang: Option<String>,
}

/// Template content plus the 1-based file line its first character sits on.
pub(crate) struct SfcTemplate<'s> {
    pub content: &'s str,
    pub first_line: usize,
}

pub(crate) struct SfcParts<'s> {
    pub descriptor: SfcDescriptor,
    pub scripts: Vec<SfcScript<'s>>,
    pub template: Option<SfcTemplate<'s>>,
}

pub(crate) fn line_at(content: &str, offset: usize) -> usize {
    let capped = offset.min(content.len());
    content.as_bytes()[..capped]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
        + 1
}

fn block_from(content: &str, caps: &Captures<'_>) -> SfcBlock {
    let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
    let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    SfcBlock {
        start_line: line_at(content, whole.0),
        end_line: line_at(content, whole.1),
        lang: regex_sfc_lang()
            .captures(attrs)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_ascii_lowercase()),
        setup: regex_sfc_setup().is_match(attrs),
        scoped: regex_sfc_scoped().is_match(attrs),
    }
}

pub(crate) fn split_sfc(content: &str) -> SfcParts<'_> {
    let mut descriptor = SfcDescriptor::default();
    let mut scripts = Vec::new();

    for caps in regex_sfc_script().captures_iter(content) {
        let block = block_from(content, &caps);
        if let Some(body) = caps.get(2) {
            scripts.push(SfcScript {
                content: body.as_str(),
                line_offset: line_at(content, body.start()) - 1,
                lang: block.lang.clone(),
            });
        }
        descriptor.scripts.push(block);
    }

    let template = regex_sfc_template().captures(content).and_then(|caps| {
        descriptor.template = Some(block_from(content, &caps));
        caps.get(2).map(|body| SfcTemplate {
            content: body.as_str(),
            first_line: line_at(content, body.start()),
        })
    });

    for caps in regex_sfc_style().captures_iter(content) {
        descriptor.styles.push(block_from(content, &caps));
    }

    SfcParts {
        descriptor,
        scripts,
        template,
    }
}
