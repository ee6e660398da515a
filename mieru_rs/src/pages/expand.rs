//! Page component extraction and bounded recursive expansion.
//!
//! Expansion is breadth-first: level 0 is what the page uses directly, level
//! `n + 1` is what level-`n` components use. A component file is expanded at
//! most once per [`ExpansionState`], at the shallowest level it appears, so a
//! child's depth is always its parent's depth plus one. A recursive component
//! is recorded where it recurs but its file is not expanded again.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::analyzer::ast_js::sfc::split_sfc;
use crate::analyzer::classify::{
    ComponentType, component_type, file_stem, is_component_import, is_composable_name,
    is_valid_component_name,
};
use crate::analyzer::naming::{kebab_from_pascal, pascal_from_kebab};
use crate::analyzer::regexes::regex_template_kebab;
use crate::analyzer::resolvers::resolve_relative;
use crate::types::{FileFacts, ImportKind, slash_path};

use super::{PageComponent, ProjectContext};

/// Where a file's directly used components come from.
pub trait ComponentExtractor {
    fn direct_components(&self, ctx: &ProjectContext<'_>, file: &Path) -> Vec<PageComponent>;
}

/// Resolvable component imports, with JSX usage lines folded in. Used for
/// pages found through router declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportedComponents;

/// Component-like imports, every component usage (resolved or not) and
/// kebab-case template tags. Used for convention pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateComponents;

fn import_components(ctx: &ProjectContext<'_>, facts: &FileFacts, file: &Path, resolved_only: bool) -> Vec<PageComponent> {
    let mut components = Vec::new();
    for import in &facts.imports {
        if import.kind == ImportKind::SideEffect || !is_component_import(&import.source) {
            continue;
        }
        let name = if import.name.is_empty() {
            file_stem(&import.source).to_string()
        } else {
            import.name.clone()
        };
        if is_composable_name(&name) {
            continue;
        }
        let resolved = resolve_relative(file, &import.source).filter(|p| ctx.file(p).is_some());
        if resolved_only && resolved.is_none() {
            continue;
        }
        let type_source = resolved
            .as_deref()
            .map(slash_path)
            .unwrap_or_else(|| import.source.clone());
        components.push(PageComponent::new(
            name,
            resolved,
            import.line,
            component_type(&type_source),
        ));
    }
    components
}

/// Append `line` to every entry called `name`. False when there is none.
fn add_usage_line(components: &mut [PageComponent], name: &str, line: usize) -> bool {
    let mut found = false;
    for component in components.iter_mut().filter(|c| c.name == name) {
        component.usage_lines.push(line);
        found = true;
    }
    found
}

fn kebab_template_usages(file: &Path) -> Vec<(String, usize)> {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            warn!("failed to read {}: {}", file.display(), e);
            return Vec::new();
        }
    };
    let Some(template) = split_sfc(&content).template else {
        return Vec::new();
    };
    let mut usages = Vec::new();
    for (i, line) in template.content.lines().enumerate() {
        for caps in regex_template_kebab().captures_iter(line) {
            if let Some(tag) = caps.get(1)
                && is_valid_component_name(tag.as_str())
            {
                usages.push((pascal_from_kebab(tag.as_str()), template.first_line + i));
            }
        }
    }
    usages
}

impl ComponentExtractor for ImportedComponents {
    fn direct_components(&self, ctx: &ProjectContext<'_>, file: &Path) -> Vec<PageComponent> {
        let Some(facts) = ctx.facts(file) else {
            return Vec::new();
        };
        let mut components = import_components(ctx, facts, file, true);
        for usage in &facts.usages {
            add_usage_line(&mut components, &usage.name, usage.line);
        }
        dedupe_components(components)
    }
}

impl ComponentExtractor for TemplateComponents {
    fn direct_components(&self, ctx: &ProjectContext<'_>, file: &Path) -> Vec<PageComponent> {
        let mut components = match ctx.facts(file) {
            Some(facts) => {
                let mut components = import_components(ctx, facts, file, false);
                for usage in &facts.usages {
                    if !is_valid_component_name(&usage.name) {
                        continue;
                    }
                    if !add_usage_line(&mut components, &usage.name, usage.line) {
                        components.push(PageComponent::new(
                            usage.name.clone(),
                            None,
                            usage.line,
                            ComponentType::Component,
                        ));
                    }
                }
                components
            }
            None => Vec::new(),
        };

        if file.extension().is_some_and(|e| e == "vue") {
            for (name, line) in kebab_template_usages(file) {
                if !add_usage_line(&mut components, &name, line) {
                    components.push(PageComponent::new(name, None, line, ComponentType::Component));
                }
            }
        }
        dedupe_components(components)
    }
}

/// Merge entries with the same name and import path. The first entry keeps
/// its position, depth and parent; usage lines accumulate.
pub fn dedupe_components(components: Vec<PageComponent>) -> Vec<PageComponent> {
    let mut index: HashMap<(String, Option<PathBuf>), usize> = HashMap::new();
    let mut merged: Vec<PageComponent> = Vec::new();
    for component in components {
        let key = (component.name.clone(), component.import_path.clone());
        match index.get(&key) {
            Some(&i) => merged[i].usage_lines.extend(component.usage_lines),
            None => {
                index.insert(key, merged.len());
                merged.push(component);
            }
        }
    }
    merged
}

const NAME_SUFFIXES: [&str; 8] = [
    ".vue",
    ".jsx",
    ".tsx",
    ".js",
    "/index.vue",
    "/index.jsx",
    "/index.tsx",
    "/index.js",
];

/// Find a component's file: its resolved import first, then file names built
/// from the component name, preferring files under a `components/` directory.
pub fn locate_component(ctx: &ProjectContext<'_>, component: &PageComponent) -> Option<PathBuf> {
    if let Some(path) = &component.import_path
        && ctx.file(path).is_some()
    {
        return Some(path.clone());
    }

    let mut bases = vec![component.name.clone()];
    let kebab = kebab_from_pascal(&component.name);
    if kebab != component.name {
        bases.push(kebab);
    }
    let variations: Vec<String> = bases
        .iter()
        .flat_map(|base| NAME_SUFFIXES.iter().map(move |suffix| format!("{base}{suffix}")))
        .collect();

    let ends_with = |relative: &str, tail: &str| relative == tail || relative.ends_with(&format!("/{tail}"));
    for variation in &variations {
        let under_components = format!("components/{variation}");
        if let Some(file) = ctx.files.iter().find(|f| ends_with(&f.relative_str(), &under_components)) {
            return Some(file.path.clone());
        }
    }
    for variation in &variations {
        if let Some(file) = ctx.files.iter().find(|f| ends_with(&f.relative_str(), variation)) {
            return Some(file.path.clone());
        }
    }
    None
}

/// Cache of each component file's direct components, keyed by file path.
#[derive(Debug, Default)]
pub struct ComponentArena {
    direct: HashMap<PathBuf, Vec<PageComponent>>,
}

impl ComponentArena {
    pub fn direct_components(
        &mut self,
        ctx: &ProjectContext<'_>,
        extractor: &dyn ComponentExtractor,
        file: &Path,
    ) -> &[PageComponent] {
        self.direct
            .entry(file.to_path_buf())
            .or_insert_with(|| extractor.direct_components(ctx, file))
    }

    pub fn len(&self) -> usize {
        self.direct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }
}

/// Component files already expanded, keyed by (name, file).
#[derive(Debug, Default)]
pub struct ExpansionState {
    expanded: HashSet<(String, PathBuf)>,
}

impl ExpansionState {
    pub fn is_expanded(&self, name: &str, file: &Path) -> bool {
        self.expanded.contains(&(name.to_string(), file.to_path_buf()))
    }
}

/// Expand `direct` to at most `max_depth` levels below the page.
pub fn expand_components(
    ctx: &ProjectContext<'_>,
    extractor: &dyn ComponentExtractor,
    direct: Vec<PageComponent>,
    max_depth: usize,
    arena: &mut ComponentArena,
    state: &mut ExpansionState,
) -> Vec<PageComponent> {
    let mut level: Vec<PageComponent> = direct
        .into_iter()
        .map(|mut component| {
            component.depth = Some(0);
            component.parent = None;
            component
        })
        .collect();

    let mut all = Vec::new();
    let mut depth = 0;
    loop {
        all.extend(level.iter().cloned());
        if depth >= max_depth || level.is_empty() {
            break;
        }

        let mut next = Vec::new();
        for parent in &level {
            let Some(file) = locate_component(ctx, parent) else {
                debug!("no file for component {}", parent.name);
                continue;
            };
            if !state.expanded.insert((parent.name.clone(), file.clone())) {
                debug!("{} already expanded from {}", parent.name, file.display());
                continue;
            }
            for child in arena.direct_components(ctx, extractor, &file) {
                let mut component = child.clone();
                component.depth = Some(depth + 1);
                component.parent = Some(parent.name.clone());
                next.push(component);
            }
        }
        level = next;
        depth += 1;
    }

    dedupe_components(all)
}
