//! Name derivation shared by the classifier, resolver and builder.

use convert_case::{Case, Casing};

/// Storage name of a declared field or edge.
pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Order-field key, e.g. `created_at` -> `CREATED_AT`.
pub fn order_key(name: &str) -> String {
    name.to_case(Case::UpperSnake)
}

pub fn pascal(name: &str) -> String {
    name.to_case(Case::UpperCamel)
}

/// Short entity name from a possibly package-qualified type name.
pub fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

/// English plural used for display names (`Category` -> `Categories`).
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        format!("{}ies", &name[..name.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        format!("{name}es")
    } else {
        format!("{name}s")
    }
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}
