//! Navigation links inside page files and the page connections they imply.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::analyzer::classify::{is_external_target, link_patterns};
use crate::analyzer::offset_to_line;
use crate::analyzer::regexes::regex_link_text;

use super::routes::find_page_by_route;
use super::{PageConnection, PageLink, PageNode};

const TEXT_BEFORE: usize = 50;
const TEXT_AFTER: usize = 100;

/// First non-empty `>text<` near the link, if any.
fn link_text(content: &str, start: usize) -> Option<String> {
    let mut lo = start.saturating_sub(TEXT_BEFORE);
    while !content.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (start + TEXT_AFTER).min(content.len());
    while !content.is_char_boundary(hi) {
        hi += 1;
    }
    regex_link_text()
        .captures_iter(&content[lo..hi])
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Every internal navigation target in `content`. Several patterns can match
/// the same call (`router.push` inside `this.$router.push`); a target captured
/// at the same offset counts once.
pub fn extract_links(content: &str) -> Vec<PageLink> {
    let mut seen: HashSet<(usize, &str)> = HashSet::new();
    let mut links = Vec::new();

    for (pattern, kind) in link_patterns() {
        for caps in pattern.captures_iter(content) {
            let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = target.as_str().trim();
            if value.is_empty() || is_external_target(value) {
                continue;
            }
            if !seen.insert((target.start(), value)) {
                continue;
            }
            links.push(PageLink {
                target: value.to_string(),
                kind: *kind,
                text: link_text(content, whole.start()),
                line: offset_to_line(content, whole.start()),
            });
        }
    }
    links
}

/// One connection per (from, to) pair; weight counts the links behind it.
/// The kind is taken from the first link.
pub fn connect_pages(pages: &BTreeMap<PathBuf, PageNode>) -> Vec<PageConnection> {
    let mut index: HashMap<(PathBuf, PathBuf), usize> = HashMap::new();
    let mut connections: Vec<PageConnection> = Vec::new();

    for page in pages.values() {
        for link in &page.links {
            let Some(target) = find_page_by_route(pages, &link.target) else {
                continue;
            };
            let key = (page.path.clone(), target.path.clone());
            match index.get(&key) {
                Some(&i) => connections[i].weight += 1,
                None => {
                    index.insert(key, connections.len());
                    connections.push(PageConnection {
                        from: page.path.clone(),
                        to: target.path.clone(),
                        kind: link.kind.connection_kind(),
                        weight: 1,
                    });
                }
            }
        }
    }
    connections
}

/// Pages that appear in no connection at either end.
pub fn count_isolated_pages(pages: &BTreeMap<PathBuf, PageNode>, connections: &[PageConnection]) -> usize {
    let connected: HashSet<&Path> = connections
        .iter()
        .flat_map(|c| [c.from.as_path(), c.to.as_path()])
        .collect();
    pages
        .keys()
        .filter(|p| !connected.contains(p.as_path()))
        .count()
}
