//! Line-indexed regex pass over raw Vue template text.
//!
//! This is an approximation, not template parsing: every `<CapitalizedTag` on a
//! line is a usage, and props are the `name=` tokens of the same open tag.

use crate::analyzer::regexes::{regex_template_component, regex_template_prop};
use crate::types::ComponentUsageRecord;

/// Usages in `template`, numbered from `first_line` (the file line the
/// template text starts on).
pub(crate) fn parse_template_usages(template: &str, first_line: usize) -> Vec<ComponentUsageRecord> {
    let mut usages = Vec::new();
    for (i, line) in template.lines().enumerate() {
        for caps in regex_template_component().captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let rest = &line[whole.end()..];
            let open_tag = match rest.find('>') {
                Some(end) => &rest[..end],
                None => rest,
            };
            let mut props: Vec<String> = Vec::new();
            for prop in regex_template_prop().captures_iter(open_tag) {
                if let Some(p) = prop.get(1) {
                    let p = p.as_str().to_string();
                    if !props.contains(&p) {
                        props.push(p);
                    }
                }
            }
            usages.push(ComponentUsageRecord {
                name: name.as_str().to_string(),
                props,
                line: first_line + i,
            });
        }
    }
    usages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_tags_with_props() {
        let template = r#"
  <div class="page">
    <AppHeader :title="title" @close="onClose" />
    <UserCard v-for="u in users" :user="u"></UserCard>
    <router-link to="/about">About</router-link>
  </div>
"#;
        let usages = parse_template_usages(template, 1);
        let names: Vec<_> = usages.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["AppHeader", "UserCard"]);
        assert_eq!(usages[0].line, 3);
        assert_eq!(usages[0].props, vec!["title".to_string(), "close".to_string()]);
        assert_eq!(usages[1].props, vec!["for".to_string(), "user".to_string()]);
    }

    #[test]
    fn test_two_usages_on_one_line() {
        let usages = parse_template_usages("<Tab name=\"a\" /><Tab name=\"b\" />", 10);
        assert_eq!(usages.len(), 2);
        assert!(usages.iter().all(|u| u.line == 10 && u.name == "Tab"));
    }
}
