//! Path-convention pages: Vue, Nuxt and projects nothing else recognized.

use std::collections::BTreeMap;
use std::time::Instant;

use globset::GlobSet;
use tracing::{debug, info, warn};

use crate::analyzer::classify::{is_dev_path, is_page_path, page_type};
use crate::detect::{FrameworkHint, ProjectFlavor};
use crate::scan::build_globset;
use crate::types::SourceFile;

use super::expand::{
    ComponentArena, ComponentExtractor, ExpansionState, TemplateComponents, expand_components,
};
use super::links::{connect_pages, extract_links};
use super::routes::{convention_route, page_name};
use super::{ExpansionTracking, PageNode, PageOptions, PageStructure, ProjectContext};

/// Page globs of a confident hint. A bad glob drops the whole hint.
fn hint_globs(hint: Option<&FrameworkHint>) -> Option<GlobSet> {
    let hint = hint.filter(|h| h.is_confident() && !h.page_patterns.is_empty())?;
    match build_globset(&hint.page_patterns) {
        Ok(set) => set,
        Err(e) => {
            warn!("ignoring page patterns from {} hint: {}", hint.name, e);
            None
        }
    }
}

/// Files treated as pages, in scan order.
pub fn page_files<'a>(ctx: &ProjectContext<'a>, hint: Option<&FrameworkHint>) -> Vec<&'a SourceFile> {
    let globs = hint_globs(hint);
    ctx.files
        .iter()
        .filter(|file| {
            let relative = file.relative_str();
            is_page_path(&relative)
                || globs
                    .as_ref()
                    .is_some_and(|set| !is_dev_path(&relative) && set.is_match(&relative))
        })
        .collect()
}

/// Resolve pages by path convention, expand their components and connect
/// them through the links found in their source.
pub fn resolve_convention_pages(
    ctx: &ProjectContext<'_>,
    flavor: ProjectFlavor,
    hint: Option<&FrameworkHint>,
    options: &PageOptions,
) -> PageStructure {
    let started = Instant::now();
    let max_depth = options.depth_for(flavor);
    let extractor = TemplateComponents;
    let mut arena = ComponentArena::default();
    let mut shared = ExpansionState::default();
    let mut pages = BTreeMap::new();

    for file in page_files(ctx, hint) {
        let relative = file.relative_str();
        let mut page = PageNode::from_file(
            file,
            page_name(&relative),
            convention_route(&relative),
            page_type(&relative),
        );

        let direct = extractor.direct_components(ctx, &file.path);
        let mut per_page = ExpansionState::default();
        let state = match options.tracking {
            ExpansionTracking::PerPage => &mut per_page,
            ExpansionTracking::Shared => &mut shared,
        };
        page.components = expand_components(ctx, &extractor, direct, max_depth, &mut arena, state);

        match std::fs::read_to_string(&file.path) {
            Ok(content) => page.links = extract_links(&content),
            Err(e) => warn!("failed to read {}: {}", file.path.display(), e),
        }

        debug!(
            "page {} -> {} ({} components, {} links)",
            relative,
            page.route,
            page.components.len(),
            page.links.len()
        );
        pages.insert(file.path.clone(), page);
    }

    let connections = connect_pages(&pages);
    let structure = PageStructure::assemble(
        flavor,
        pages,
        connections,
        started.elapsed().as_secs_f64() * 1000.0,
    );
    info!(
        "{} pages, {} components, {} links",
        structure.stats.total_pages, structure.stats.total_components, structure.stats.total_links
    );
    structure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::classify::{ConnectionKind, PageType};
    use crate::analyzer::ast_js::extract_file;
    use crate::types::FileFacts;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_project(files: &[(&str, &str)]) -> (TempDir, PathBuf, Vec<SourceFile>, Vec<FileFacts>) {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().canonicalize().expect("canonical");
        let mut scanned = Vec::new();
        for (rel, content) in files {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            std::fs::write(&path, content).expect("write");
            scanned.push(SourceFile::from_path(&root, &path).expect("stat"));
        }
        let facts = scanned.iter().map(extract_file).collect();
        (tmp, root, scanned, facts)
    }

    #[test]
    fn vue_pages_with_components_and_links() {
        let (_tmp, root, files, facts) = write_project(&[
            (
                "pages/index.vue",
                r#"<template>
  <div>
    <AppHeader />
    <nuxt-link to="/about">About</nuxt-link>
  </div>
</template>
<script>
import AppHeader from '../components/app-header.vue'
</script>
"#,
            ),
            (
                "pages/about.vue",
                "<template>\n  <div><router-link to=\"/\">Home</router-link></div>\n</template>\n",
            ),
            (
                "components/app-header.vue",
                "<template>\n  <nav><nav-logo /></nav>\n</template>\n",
            ),
            ("components/nav-logo.vue", "<template><img /></template>\n"),
        ]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        let structure = resolve_convention_pages(&ctx, ProjectFlavor::Nuxt, None, &PageOptions::default());

        let index = &structure.pages[&files[0].path];
        assert_eq!(index.route, "/");
        assert_eq!(index.name, "pages");
        assert_eq!(index.page_type, PageType::Page);
        let components: Vec<_> = index
            .components
            .iter()
            .map(|c| (c.name.as_str(), c.depth, c.parent.as_deref()))
            .collect();
        assert_eq!(
            components,
            vec![("AppHeader", Some(0), None), ("NavLogo", Some(1), Some("AppHeader"))]
        );
        assert_eq!(index.links.len(), 1);
        assert_eq!(index.links[0].text.as_deref(), Some("About"));

        assert_eq!(structure.pages[&files[1].path].route, "/about");
        assert_eq!(structure.connections.len(), 2);
        assert!(
            structure
                .connections
                .iter()
                .all(|c| c.kind == ConnectionKind::Route && c.weight == 1)
        );
        assert_eq!(structure.stats.total_pages, 2);
        assert_eq!(structure.stats.total_links, 2);
        assert_eq!(structure.stats.isolated_pages, 0);
    }

    #[test]
    fn confident_hint_adds_pages() {
        let (_tmp, root, files, facts) = write_project(&[
            ("screens2/checkout.vue", "<template><div/></template>\n"),
            ("lib/util.js", "export const x = 1;\n"),
        ]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        assert!(page_files(&ctx, None).is_empty());

        let mut hint = FrameworkHint {
            name: "Vue.js".into(),
            confidence: 30,
            page_patterns: vec!["screens2/**/*.vue".into()],
            ..FrameworkHint::default()
        };
        assert!(page_files(&ctx, Some(&hint)).is_empty());
        hint.confidence = 90;
        let pages = page_files(&ctx, Some(&hint));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].relative_str(), "screens2/checkout.vue");
    }

    #[test]
    fn shared_tracking_expands_once() {
        let page = "<template><SiteHeader /></template>\n";
        let (_tmp, root, files, facts) = write_project(&[
            ("pages/a.vue", page),
            ("pages/b.vue", page),
            ("components/site-header.vue", "<template><SiteLogo /></template>\n"),
            ("components/site-logo.vue", "<template><img /></template>\n"),
        ]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        let shared = PageOptions {
            max_depth: None,
            tracking: ExpansionTracking::Shared,
        };
        let structure = resolve_convention_pages(&ctx, ProjectFlavor::Vue, None, &shared);
        assert_eq!(structure.pages[&files[0].path].components.len(), 2);
        assert_eq!(structure.pages[&files[1].path].components.len(), 1);

        let per_page = resolve_convention_pages(&ctx, ProjectFlavor::Vue, None, &PageOptions::default());
        assert_eq!(per_page.pages[&files[1].path].components.len(), 2);
    }
}
