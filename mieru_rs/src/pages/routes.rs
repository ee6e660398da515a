//! Route strings, page names and route matching.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::analyzer::classify::file_stem;
use crate::analyzer::regexes::{regex_dynamic_segment, regex_route_param};

use super::PageNode;

fn script_extension() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.(vue|jsx?|tsx?)$").expect("valid regex literal"))
}

fn convention_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(pages|views|routes)/").expect("valid regex literal"))
}

fn file_routing_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(src/)?(pages|app)/").expect("valid regex literal"))
}

/// Drop the extension and a trailing `index`, rewrite `[param]` to `:param`,
/// and make sure the result starts with `/`.
fn finish_route(route: &str) -> String {
    let route = script_extension().replace(route, "");
    let route = route
        .strip_suffix("/index")
        .or_else(|| (route == "index").then_some(""))
        .unwrap_or(&route[..]);
    let route = regex_dynamic_segment().replace_all(route, ":$1");
    if route.is_empty() {
        "/".to_string()
    } else if route.starts_with('/') {
        route.into_owned()
    } else {
        format!("/{route}")
    }
}

/// Route for a convention page: `pages/`, `views/` and `routes/` at the root
/// map to `/`. `pages/blog/[slug].vue` is `/blog/:slug`.
pub fn convention_route(relative: &str) -> String {
    finish_route(&convention_prefix().replace(relative, "/"))
}

/// Next.js file routing: `pages/` or `app/` (optionally under `src/`) is the
/// root. App-router `page` files name their directory.
pub fn file_route(relative: &str) -> String {
    let app_router = relative.starts_with("app/") || relative.starts_with("src/app/");
    let stripped = file_routing_prefix().replace(relative, "");
    let mut route = finish_route(&stripped);
    if app_router && let Some(parent) = route.strip_suffix("/page") {
        route = if parent.is_empty() { "/".to_string() } else { parent.to_string() };
    }
    route
}

/// True for files Next.js would route.
pub fn is_file_routed(relative: &str) -> bool {
    let rooted = format!("/{relative}");
    rooted.contains("/pages/") || rooted.contains("/app/")
}

/// Base name without extension; `index` files take their directory's name.
pub fn page_name(relative: &str) -> String {
    let stem = file_stem(relative);
    if stem != "index" {
        return stem.to_string();
    }
    relative
        .rsplit('/')
        .nth(1)
        .filter(|dir| !dir.is_empty())
        .unwrap_or("Home")
        .to_string()
}

/// `#/about/` -> `/about`, `` -> `/`.
pub fn normalize_target(target: &str) -> String {
    let target = target.strip_prefix('#').unwrap_or(target);
    let target = target.strip_suffix('/').unwrap_or(target);
    if target.is_empty() {
        "/".to_string()
    } else {
        target.to_string()
    }
}

/// `/users/:id` as an anchored regex with each parameter matching one segment.
fn dynamic_route_regex(route: &str) -> Option<Regex> {
    let mut pattern = String::from("^");
    let mut last = 0;
    for m in regex_route_param().find_iter(route) {
        pattern.push_str(&regex::escape(&route[last..m.start()]));
        pattern.push_str("[^/]+");
        last = m.end();
    }
    pattern.push_str(&regex::escape(&route[last..]));
    pattern.push_str("/?$");
    Regex::new(&pattern).ok()
}

/// Find the page a link target points at. Strategies, first hit wins: exact
/// route, trailing-slash variant, dynamic segments, then a route segment
/// equal to a page name.
pub fn find_page_by_route<'p>(pages: &'p BTreeMap<PathBuf, PageNode>, target: &str) -> Option<&'p PageNode> {
    let clean = normalize_target(target);

    if let Some(page) = pages.values().find(|p| p.route == clean) {
        return Some(page);
    }

    let with_slash = format!("{clean}/");
    if let Some(page) = pages
        .values()
        .find(|p| p.route == with_slash || format!("{}/", p.route) == clean)
    {
        return Some(page);
    }

    if let Some(page) = pages.values().find(|p| {
        dynamic_route_regex(&p.route).is_some_and(|re| re.is_match(&clean))
    }) {
        return Some(page);
    }

    pages.values().find(|p| {
        let name = p.name.to_lowercase();
        clean.split('/').filter(|s| !s.is_empty()).any(|part| part == name)
    })
}
