use std::path::Path;

use heck::{ToKebabCase, ToUpperCamelCase};

use super::classify::file_stem;

/// Split on `-` and `_`, capitalize each segment, keep the rest as written.
/// `APIClient` stays `APIClient`, `Button.styles` stays `Button.styles`.
fn capitalize_segments(stem: &str) -> String {
    stem.split(['-', '_'])
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `user-card.vue` -> `UserCard`, `nav_bar.tsx` -> `NavBar`.
pub fn component_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    capitalize_segments(&stem)
}

/// Same derivation for an unresolved module specifier (`../ui/user-card`).
pub fn component_name_from_specifier(spec: &str) -> String {
    capitalize_segments(file_stem(spec))
}

/// `base-button` -> `BaseButton`. Used for kebab-case template tags.
pub fn pascal_from_kebab(tag: &str) -> String {
    tag.to_upper_camel_case()
}

/// `BaseButton` -> `base-button`, for file-name guesses.
pub fn kebab_from_pascal(name: &str) -> String {
    name.to_kebab_case()
}
