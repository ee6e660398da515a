//! Path and name heuristics, kept as ordered tables of (predicate, class)
//! pairs. The first matching rule wins; each table has an explicit fallback.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::regexes::regex_composable;

type Rule<T> = (fn(&str) -> bool, T);

fn classify<T: Copy>(rules: &[Rule<T>], input: &str, fallback: T) -> T {
    rules
        .iter()
        .find(|(predicate, _)| predicate(input))
        .map(|(_, class)| *class)
        .unwrap_or(fallback)
}

/// Basename without its extension, for `/`-separated paths and specifiers.
pub fn file_stem(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    }
}

// ---------------------------------------------------------------------------
// Component type tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Vue,
    React,
    Layout,
    Component,
}

fn ends_with_vue(p: &str) -> bool {
    p.ends_with(".vue")
}

fn ends_with_jsx(p: &str) -> bool {
    p.ends_with(".jsx") || p.ends_with(".tsx")
}

fn mentions_layout(p: &str) -> bool {
    let lower = p.to_ascii_lowercase();
    lower.contains("layout") || lower.contains("template")
}

const COMPONENT_TYPE_RULES: &[Rule<ComponentType>] = &[
    (ends_with_vue, ComponentType::Vue),
    (ends_with_jsx, ComponentType::React),
    (mentions_layout, ComponentType::Layout),
];

pub fn component_type(import_path: &str) -> ComponentType {
    classify(COMPONENT_TYPE_RULES, import_path, ComponentType::Component)
}

// ---------------------------------------------------------------------------
// Is an import specifier a component?
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportClass {
    Component,
    NotComponent,
}

const COMPONENT_DIRS: &[&str] = &[
    "components", "comp", "ui", "shared", "common", "widgets", "elements", "parts", "modules",
    "features", "containers", "templates", "layouts", "forms", "modals", "dialogs", "buttons",
    "cards", "headers", "footers", "navs", "menus", "sidebar", "tables", "lists", "items",
    "icons", "images",
];

const COMPONENT_WORDS: &[&str] = &[
    "header", "footer", "nav", "menu", "sidebar", "modal", "dialog", "button", "card", "form",
    "input", "select", "textarea", "checkbox", "radio", "switch", "slider", "table", "list",
    "item", "icon", "image", "video", "audio", "chart", "graph", "map", "calendar", "date",
    "time", "picker", "dropdown", "tooltip", "popover", "alert", "toast", "notification",
    "badge", "chip", "tag", "avatar", "progress", "spinner", "loader", "skeleton", "layout",
    "grid", "row", "col", "container", "wrapper", "section", "panel", "tabs", "tab",
    "accordion", "collapse", "carousel", "gallery", "lightbox", "preview", "search", "filter",
    "sort", "pagination", "breadcrumb", "stepper", "wizard", "step", "editor", "viewer",
    "player", "product", "cart", "checkout", "payment", "order", "shop", "catalog", "category",
    "review", "rating", "wishlist", "compare", "banner", "promo", "deal", "offer", "price",
    "shipping", "delivery", "track", "user", "account", "profile", "auth", "login", "register",
    "forgot", "reset", "verify", "dashboard", "admin", "seller",
];

const NON_COMPONENT_WORDS: &[&str] = &[
    "node_modules", "dist", "build", "public", "static", "assets", "img", "css", "scss", "sass",
    "less", "json", "config", "test", "spec", "mock", "fixture", "util", "helper", "service",
    "api", "store", "reducer", "action", "mutation", "middleware", "plugin", "mixin",
    "directive", "constant", "enum", "type", "interface", "model", "schema", "validation",
    "rule", "guard",
];

fn has_component_marker(s: &str) -> bool {
    s.to_ascii_lowercase().contains("component") || ends_with_vue(s) || ends_with_jsx(s)
}

fn has_capitalized_basename(s: &str) -> bool {
    file_stem(s)
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn has_non_component_word(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    NON_COMPONENT_WORDS.iter().any(|w| lower.contains(w))
}

fn in_component_dir(s: &str) -> bool {
    let lower = s.to_ascii_lowercase().replace('\\', "/");
    COMPONENT_DIRS
        .iter()
        .any(|dir| lower.contains(&format!("/{dir}/")))
}

fn has_component_word(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    COMPONENT_WORDS.iter().any(|w| lower.contains(w))
}

const IMPORT_RULES: &[Rule<ImportClass>] = &[
    (has_component_marker, ImportClass::Component),
    (has_capitalized_basename, ImportClass::Component),
    (has_non_component_word, ImportClass::NotComponent),
    (in_component_dir, ImportClass::Component),
    (has_component_word, ImportClass::Component),
];

pub fn classify_import(source: &str) -> ImportClass {
    classify(IMPORT_RULES, source, ImportClass::NotComponent)
}

pub fn is_component_import(source: &str) -> bool {
    classify_import(source) == ImportClass::Component
}

// ---------------------------------------------------------------------------
// Page files
// ---------------------------------------------------------------------------

/// Deliberately broad: directory conventions, framework file names, common
/// view names and finally any capitalized file name.
fn page_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        const EXT: &str = r"\.(vue|jsx?|tsx?)$";
        let mut patterns: Vec<String> = [
            "/pages/", "/views/", "/routes/", "/screens/", "/app/", "/layouts/", "/middleware/",
            "/plugins/", "/containers/", "/templates/", "/features/", "/modules/", "/public/",
            "/src/App\\.", "/src/index\\.", "/src/main\\.", "/src/components/pages/",
            "/src/components/views/",
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();
        for name in [
            "page", "layout", "loading", "error", "not-found", "index", "main", "App", "Home",
            "Product", "Cart", "Login", "Register", "Profile", "Dashboard", "Settings",
            "Checkout", "Search", "About", "Contact", "Admin", "Landing", "Welcome", "NotFound",
            "Error", "Loading",
        ] {
            patterns.push(format!("{name}{EXT}"));
        }
        for suffix in ["Page", "View", "Screen", "Container"] {
            patterns.push(format!("[A-Z][a-z]+{suffix}{EXT}"));
        }
        // capitalized basename only, not a capital inside a camelCase name
        patterns.push(format!("/[A-Z][a-zA-Z]*{EXT}"));
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("valid page pattern"))
            .collect()
    })
}

/// Test, story and fixture files are never pages.
pub fn is_dev_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains("__tests__")
        || lower.contains(".test.")
        || lower.contains(".spec.")
        || lower.contains(".stories.")
        || lower.contains("/fixtures/")
}

/// `relative` is the `/`-separated path from the project root.
pub fn is_page_path(relative: &str) -> bool {
    if is_dev_path(relative) {
        return false;
    }
    let rooted = format!("/{}", relative.trim_start_matches('/'));
    page_patterns().iter().any(|re| re.is_match(&rooted))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Page,
    Layout,
    Component,
}

fn mentions_layout_dir(p: &str) -> bool {
    p.contains("layout") || p.contains("Layout")
}

fn mentions_page_or_view(p: &str) -> bool {
    p.contains("page") || p.contains("view")
}

const PAGE_TYPE_RULES: &[Rule<PageType>] = &[
    (mentions_layout_dir, PageType::Layout),
    (mentions_page_or_view, PageType::Page),
];

pub fn page_type(relative: &str) -> PageType {
    classify(PAGE_TYPE_RULES, relative, PageType::Component)
}

// ---------------------------------------------------------------------------
// Template tag names
// ---------------------------------------------------------------------------

const HTML_ELEMENTS: &[&str] = &[
    "div", "span", "p", "a", "img", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "table", "tr", "td", "th", "thead", "tbody", "section", "article", "header", "footer",
    "nav", "main", "aside", "button", "input", "form", "label", "select", "option", "textarea",
];

const VUE_BUILTINS: &[&str] = &[
    "template",
    "slot",
    "transition",
    "transition-group",
    "keep-alive",
    "component",
    "teleport",
    "suspense",
];

/// Router link components are navigation, not part of the component tree.
const ROUTER_ELEMENTS: &[&str] = &["router-link", "router-view", "nuxt-link", "nuxt-child"];

pub fn is_valid_component_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let starts_upper = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    !HTML_ELEMENTS.contains(&lower.as_str())
        && !VUE_BUILTINS.contains(&lower.as_str())
        && !ROUTER_ELEMENTS.contains(&lower.as_str())
        && !lower.starts_with("v-")
        && (starts_upper || name.contains('-'))
}

/// `useCart`, `isMobile`, `getUser`... are hooks and helpers, not components.
pub fn is_composable_name(name: &str) -> bool {
    regex_composable().is_match(name)
}

// ---------------------------------------------------------------------------
// Navigation links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    RouterLink,
    Href,
    Navigation,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Route,
    Link,
    Navigation,
}

impl LinkKind {
    pub fn connection_kind(self) -> ConnectionKind {
        match self {
            LinkKind::RouterLink | LinkKind::Dynamic => ConnectionKind::Route,
            LinkKind::Href => ConnectionKind::Link,
            LinkKind::Navigation => ConnectionKind::Navigation,
        }
    }
}

fn mentions_router_link(p: &str) -> bool {
    p.contains("router-link") || p.contains("nuxt-link")
}

fn mentions_href(p: &str) -> bool {
    p.contains("href")
}

fn mentions_push_or_navigate(p: &str) -> bool {
    p.contains("push") || p.contains("navigate")
}

const LINK_KIND_RULES: &[Rule<LinkKind>] = &[
    (mentions_router_link, LinkKind::RouterLink),
    (mentions_href, LinkKind::Href),
    (mentions_push_or_navigate, LinkKind::Dynamic),
];

/// Link kind of a navigation pattern, judged from the pattern text itself.
pub fn link_kind(pattern: &str) -> LinkKind {
    classify(LINK_KIND_RULES, pattern, LinkKind::Navigation)
}

/// Call-site and tag patterns that carry a navigation target in group 1.
pub fn link_patterns() -> &'static [(Regex, LinkKind)] {
    static RE: OnceLock<Vec<(Regex, LinkKind)>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            r#"<NuxtLink[^>]+to=["']([^"']+)["']"#,
            r#"<nuxt-link[^>]+to=["']([^"']+)["']"#,
            r#"<router-link[^>]+to=["']([^"']+)["']"#,
            r#"<Link[^>]+to=["']([^"']+)["']"#,
            r#"<NavLink[^>]+to=["']([^"']+)["']"#,
            r#"<a[^>]+href=["']([^"']+)["']"#,
            r#":href="\$baseUrl\(['"`]([^'"`]+)['"`]\)""#,
            r#"href="\$baseUrl\(['"`]([^'"`]+)['"`]\)""#,
            r#"router\.push\(['"`]([^'"`]+)['"`]\)"#,
            r#"\$router\.push\(['"`]([^'"`]+)['"`]\)"#,
            r#"this\.\$router\.push\(['"`]([^'"`]+)['"`]\)"#,
            r#"navigateTo\(['"`]([^'"`]+)['"`]\)"#,
            r#"await\s+navigateTo\(['"`]([^'"`]+)['"`]\)"#,
            r#"navigate\(['"`]([^'"`]+)['"`]\)"#,
            r#"useRouter\(\)\.push\(['"`]([^'"`]+)['"`]\)"#,
            r#":to="\{[^}]*path:\s*['"`]([^'"`]+)['"`]"#,
            r#":to="[^"]*['"`]([^'"`]+)['"`]"#,
            r#":to="`([^`]*/[^`]*)`""#,
            r#":href="`([^`]*/[^`]*)`""#,
            r#"name:\s*['"`]([^'"`]+)['"`]"#,
            r#"path:\s*['"`]([^'"`]+)['"`]"#,
        ]
        .iter()
        .map(|p| {
            let re = Regex::new(&format!("(?i){p}")).expect("valid link pattern");
            (re, link_kind(p))
        })
        .collect()
    })
}

/// `http…`, `mailto:` and `tel:` targets leave the app.
pub fn is_external_target(target: &str) -> bool {
    target.starts_with("http") || target.starts_with("mailto:") || target.starts_with("tel:")
}
