//! Entry-point routing for React and Next projects.
//!
//! The entry point is the first conventional file (`src/App.tsx`, ...) whose
//! text carries a routing signature. Its `<Route>` elements give the pages;
//! without any, Next-style file routing under `pages/` and `app/` does.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyzer::ast_js::{jsx_element_name, source_type_for};
use crate::analyzer::classify::{PageType, file_stem};
use crate::analyzer::regexes::routing_signatures;
use crate::detect::ProjectFlavor;
use crate::error::ResolveError;
use crate::types::{SourceFile, extension_of};

use super::expand::{
    ComponentArena, ComponentExtractor, ExpansionState, ImportedComponents, expand_components,
};
use super::routes::{file_route, is_file_routed};
use super::{ExpansionTracking, PageNode, PageOptions, PageStructure, ProjectContext};

const ENTRY_CANDIDATES: [&str; 14] = [
    "src/App.tsx",
    "src/App.jsx",
    "src/App.js",
    "src/App.ts",
    "App.tsx",
    "App.jsx",
    "App.js",
    "App.ts",
    "src/index.tsx",
    "src/index.jsx",
    "src/index.js",
    "src/main.tsx",
    "src/main.jsx",
    "src/main.js",
];

const ROUTE_COMPONENT_DIRS: [&str; 7] = [
    "src/pages",
    "src/components",
    "src/views",
    "pages",
    "components",
    "views",
    "src",
];

const ROUTE_COMPONENT_EXTENSIONS: [&str; 4] = [".tsx", ".ts", ".jsx", ".js"];

fn entry_basename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(App|index|main)\.(tsx?|jsx?)$").expect("valid regex literal"))
}

pub fn has_routing_signature(content: &str) -> bool {
    routing_signatures().iter().any(|re| re.is_match(content))
}

#[derive(Debug, Clone)]
pub struct EntryPoint {
    pub path: PathBuf,
    pub content: String,
}

/// Fixed candidates first, then scanned `App`/`index`/`main` files. A
/// candidate that exists but cannot be read is a hard failure.
pub fn find_entry_point(ctx: &ProjectContext<'_>) -> Result<Option<EntryPoint>, ResolveError> {
    for candidate in ENTRY_CANDIDATES {
        let path = ctx.root.join(candidate);
        if !path.is_file() {
            continue;
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ResolveError::UnreadableEntry {
            path: path.clone(),
            source,
        })?;
        if has_routing_signature(&content) {
            return Ok(Some(EntryPoint { path, content }));
        }
        debug!("{} has no routing signature", candidate);
    }

    for file in ctx.files.iter().filter(|f| entry_basename().is_match(&f.name)) {
        match std::fs::read_to_string(&file.path) {
            Ok(content) if has_routing_signature(&content) => {
                return Ok(Some(EntryPoint {
                    path: file.path.clone(),
                    content,
                }));
            }
            Ok(_) => {}
            Err(e) => warn!("failed to read {}: {}", file.path.display(), e),
        }
    }
    Ok(None)
}

/// One declared or file-derived route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecl {
    pub path: String,
    pub component: String,
    #[serde(default)]
    pub exact: bool,
    /// Known up front for file routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_file: Option<PathBuf>,
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn string_value(value: &JSXAttributeValue<'_>) -> Option<String> {
    match value {
        JSXAttributeValue::StringLiteral(s) => Some(s.value.to_string()),
        JSXAttributeValue::ExpressionContainer(container) => match &container.expression {
            JSXExpression::StringLiteral(s) => Some(s.value.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn element_tag(element: &JSXElement<'_>) -> Option<String> {
    jsx_element_name(&element.opening_element.name).map(|n| last_segment(&n).to_string())
}

/// `component={Home}` (v5 and earlier).
fn component_ref(value: &JSXAttributeValue<'_>) -> Option<String> {
    match value {
        JSXAttributeValue::ExpressionContainer(container) => match &container.expression {
            JSXExpression::Identifier(id) => Some(id.name.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// `element={<Home />}` or `element={Home}` (v6).
fn element_ref(value: &JSXAttributeValue<'_>) -> Option<String> {
    match value {
        JSXAttributeValue::Element(element) => element_tag(element),
        JSXAttributeValue::ExpressionContainer(container) => match &container.expression {
            JSXExpression::JSXElement(element) => element_tag(element),
            JSXExpression::Identifier(id) => Some(id.name.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn route_from_element(element: &JSXOpeningElement<'_>) -> Option<RouteDecl> {
    let mut path = None;
    let mut component = None;
    let mut exact = false;

    for item in &element.attributes {
        let JSXAttributeItem::Attribute(attr) = item else {
            continue;
        };
        let JSXAttributeName::Identifier(id) = &attr.name else {
            continue;
        };
        match id.name.as_str() {
            "path" => path = attr.value.as_ref().and_then(string_value),
            "component" => {
                if let Some(name) = attr.value.as_ref().and_then(component_ref) {
                    component = Some(name);
                }
            }
            "element" => {
                if let Some(name) = attr.value.as_ref().and_then(element_ref) {
                    component = Some(name);
                }
            }
            "exact" => exact = true,
            _ => {}
        }
    }

    match (path, component) {
        (Some(path), Some(component)) if !path.is_empty() && !component.is_empty() => Some(RouteDecl {
            path,
            component,
            exact,
            component_file: None,
        }),
        _ => None,
    }
}

#[derive(Default)]
struct RouteCollector {
    routes: Vec<RouteDecl>,
}

impl<'a> Visit<'a> for RouteCollector {
    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement<'a>) {
        let is_route = jsx_element_name(&element.name).is_some_and(|n| last_segment(&n) == "Route");
        if is_route && let Some(route) = route_from_element(element) {
            self.routes.push(route);
        }
        walk::walk_jsx_opening_element(self, element);
    }
}

/// `<Route>` declarations in document order, nested ones included. `None`
/// when the file does not parse.
pub fn collect_routes(content: &str, path: &Path) -> Option<Vec<RouteDecl>> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, content, source_type_for(&extension_of(path))).parse();
    if ret.panicked || !ret.errors.is_empty() {
        warn!(
            "failed to parse entry point {}: {} syntax error(s)",
            path.display(),
            ret.errors.len().max(1)
        );
        return None;
    }
    let mut collector = RouteCollector::default();
    collector.visit_program(&ret.program);
    Some(collector.routes)
}

/// Every file under a `pages/` or `app/` directory, in scan order.
pub fn file_routes(ctx: &ProjectContext<'_>) -> Vec<RouteDecl> {
    ctx.files
        .iter()
        .filter_map(|file| {
            let relative = file.relative_str();
            is_file_routed(&relative).then(|| RouteDecl {
                path: file_route(&relative),
                component: file_stem(&file.name).to_string(),
                exact: false,
                component_file: Some(file.path.clone()),
            })
        })
        .collect()
}

/// Conventional directories and extensions first, then any scanned file
/// whose stem is the component name.
pub fn find_component_file<'a>(ctx: &ProjectContext<'a>, component: &str) -> Option<&'a SourceFile> {
    for dir in ROUTE_COMPONENT_DIRS {
        for ext in ROUTE_COMPONENT_EXTENSIONS {
            if let Some(file) = ctx.file_at(&format!("{dir}/{component}{ext}")) {
                return Some(file);
            }
        }
    }
    ctx.files.iter().find(|f| file_stem(&f.name) == component)
}

/// Pages from router declarations, falling back to file routing. Fails only
/// when neither an entry point nor a routed file exists.
pub fn resolve_router_pages(
    ctx: &ProjectContext<'_>,
    flavor: ProjectFlavor,
    options: &PageOptions,
) -> Result<PageStructure, ResolveError> {
    let started = Instant::now();

    let routes = match find_entry_point(ctx)? {
        Some(entry) => {
            info!("entry point {}", entry.path.display());
            let declared = collect_routes(&entry.content, &entry.path).unwrap_or_default();
            if declared.is_empty() {
                debug!("no <Route> elements in entry point, using file routes");
                file_routes(ctx)
            } else {
                declared
            }
        }
        None => {
            let routes = file_routes(ctx);
            if routes.is_empty() {
                return Err(ResolveError::NoEntryPoint(ctx.root.to_path_buf()));
            }
            routes
        }
    };
    info!("{} routes", routes.len());

    let max_depth = options.depth_for(flavor);
    let extractor = ImportedComponents;
    let mut arena = ComponentArena::default();
    let mut shared = ExpansionState::default();
    let mut pages = BTreeMap::new();

    for route in &routes {
        let file = match &route.component_file {
            Some(path) => ctx.file(path),
            None => find_component_file(ctx, &route.component),
        };
        let Some(file) = file else {
            debug!("no file for route component {}", route.component);
            continue;
        };

        let mut page = PageNode::from_file(file, route.component.clone(), route.path.clone(), PageType::Page);
        let direct = extractor.direct_components(ctx, &file.path);
        let mut per_page = ExpansionState::default();
        let state = match options.tracking {
            ExpansionTracking::PerPage => &mut per_page,
            ExpansionTracking::Shared => &mut shared,
        };
        page.components = expand_components(ctx, &extractor, direct, max_depth, &mut arena, state);
        pages.insert(file.path.clone(), page);
    }

    Ok(PageStructure::assemble(
        flavor,
        pages,
        Vec::new(),
        started.elapsed().as_secs_f64() * 1000.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ast_js::extract_file;
    use crate::types::FileFacts;
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
    fn routes_from_both_router_generations() {
        let content = r#"
import { BrowserRouter, Routes, Route, Switch } from "react-router-dom";
export default function App() {
  return (
    <BrowserRouter>
      <Switch>
        <Route exact path="/" component={Home} />
        <Route path={"/cart"} component={Cart} />
      </Switch>
      <Routes>
        <Route path="/about" element={<About />}>
          <Route path="team" element={<Layout.Team />} />
        </Route>
        <Route path="/lost" element={NotFound} />
        <Route element={<Orphan />} />
      </Routes>
    </BrowserRouter>
  );
}
"#;
        let routes = collect_routes(content, Path::new("App.jsx")).expect("parses");
        let pairs: Vec<_> = routes
            .iter()
            .map(|r| (r.path.as_str(), r.component.as_str(), r.exact))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("/", "Home", true),
                ("/cart", "Cart", false),
                ("/about", "About", false),
                ("team", "Team", false),
                ("/lost", "NotFound", false),
            ]
        );
    }

    #[test]
    fn unparsable_entry_yields_none() {
        assert!(collect_routes("<Route path=", Path::new("App.jsx")).is_none());
    }

    #[test]
    fn router_page_expands_components() {
        let (_tmp, root, files, facts) = write_project(&[
            (
                "src/App.jsx",
                r#"import { BrowserRouter, Routes, Route } from "react-router-dom";
import Home from "./pages/Home";
export default function App() {
  return <BrowserRouter><Routes><Route path="/" element={<Home />} /></Routes></BrowserRouter>;
}
"#,
            ),
            (
                "src/pages/Home.jsx",
                "import Header from '../components/Header';\nexport default function Home() { return <Header />; }\n",
            ),
            (
                "src/components/Header.jsx",
                "import Logo from './Logo';\nexport default function Header() { return <Logo />; }\n",
            ),
            (
                "src/components/Logo.jsx",
                "export default function Logo() { return <img />; }\n",
            ),
        ]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        let structure = resolve_router_pages(&ctx, ProjectFlavor::React, &PageOptions::default())
            .expect("pages");

        assert_eq!(structure.pages.len(), 1);
        let home = &structure.pages[&files[1].path];
        assert_eq!(home.name, "Home");
        assert_eq!(home.route, "/");
        assert_eq!(home.page_type, PageType::Page);
        let components: Vec<_> = home
            .components
            .iter()
            .map(|c| (c.name.as_str(), c.depth, c.parent.as_deref()))
            .collect();
        assert_eq!(
            components,
            vec![("Header", Some(0), None), ("Logo", Some(1), Some("Header"))]
        );
        assert!(structure.connections.is_empty());
        assert_eq!(structure.stats.isolated_pages, 1);
    }

    #[test]
    fn file_routing_without_entry_point() {
        let (_tmp, root, files, facts) = write_project(&[
            ("pages/index.tsx", "export default function Index() { return <main />; }\n"),
            ("pages/blog/[slug].tsx", "export default function Post() { return <article />; }\n"),
        ]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        assert!(find_entry_point(&ctx).expect("readable").is_none());

        let structure = resolve_router_pages(&ctx, ProjectFlavor::Next, &PageOptions::default())
            .expect("pages");
        let routes: Vec<_> = structure.pages.values().map(|p| p.route.as_str()).collect();
        assert!(routes.contains(&"/"));
        assert!(routes.contains(&"/blog/:slug"));
    }

    #[test]
    fn no_entry_and_no_routed_files_is_an_error() {
        let (_tmp, root, files, facts) = write_project(&[("src/util.js", "export const x = 1;\n")]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        let err = resolve_router_pages(&ctx, ProjectFlavor::React, &PageOptions::default())
            .expect_err("no entry point");
        assert!(matches!(err, ResolveError::NoEntryPoint(_)));
    }

    #[test]
    fn component_file_lookup_order() {
        let (_tmp, root, files, facts) = write_project(&[
            ("src/views/Cart.jsx", "export default () => null;\n"),
            ("src/pages/Cart.tsx", "export default () => null;\n"),
            ("lib/deep/Checkout.js", "export default () => null;\n"),
        ]);
        let ctx = ProjectContext::new(&root, &files, &facts);
        let cart = find_component_file(&ctx, "Cart").expect("cart");
        assert_eq!(cart.relative_str(), "src/pages/Cart.tsx");
        let checkout = find_component_file(&ctx, "Checkout").expect("checkout");
        assert_eq!(checkout.relative_str(), "lib/deep/Checkout.js");
        assert!(find_component_file(&ctx, "Missing").is_none());
    }
}
