use std::sync::OnceLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

pub(crate) fn regex_sfc_script() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<script([^>]*)>([\s\S]*?)</script>"#))
}

/// Greedy so that nested `<template v-if>` blocks stay inside the outer one.
pub(crate) fn regex_sfc_template() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<template([^>]*)>([\s\S]*)</template>"#))
}

pub(crate) fn regex_sfc_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<style([^>]*)>([\s\S]*?)</style>"#))
}

pub(crate) fn regex_sfc_lang() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\blang\s*=\s*["']([^"']+)["']"#))
}

pub(crate) fn regex_sfc_setup() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?:^|\s)setup(?:\s|=|$)"#))
}

pub(crate) fn regex_sfc_scoped() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?:^|\s)scoped(?:\s|=|$)"#))
}

/// `<CapitalizedTag` in raw template text.
pub(crate) fn regex_template_component() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<([A-Z][a-zA-Z0-9-]*)"#))
}

/// `<kebab-case-tag` in raw template text.
pub(crate) fn regex_template_kebab() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<([a-z][a-z0-9]*-[a-z0-9-]+)\b"#))
}

pub(crate) fn regex_template_prop() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(\w+)="#))
}

pub(crate) fn regex_dynamic_segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\[([^\]]+)\]"#))
}

pub(crate) fn regex_route_param() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#":\w+"#))
}

pub(crate) fn regex_link_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#">([^<]+)<"#))
}

pub(crate) fn regex_composable() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^(use|is|get|set|has|can)[A-Z]"#))
}

/// Signatures of a routing library in an entry file.
pub(crate) fn routing_signatures() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            r#"from ['"`]react-router-dom['"`]"#,
            r#"import.*Router.*from"#,
            r#"<Router"#,
            r#"<BrowserRouter"#,
            r#"<HashRouter"#,
            r#"<Routes"#,
            r#"<Route"#,
            r#"<Switch"#,
            r#"from ['"`]next/router['"`]"#,
            r#"useRouter"#,
            r#"getServerSideProps"#,
            r#"getStaticProps"#,
            r#"from ['"`]@reach/router['"`]"#,
            r#"vue-router"#,
            r#"(?i)route"#,
            r#"(?i)router"#,
            r#"(?i)navigate"#,
        ]
        .iter()
        .map(|p| regex(p))
        .collect()
    })
}
