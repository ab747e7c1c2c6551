//! Name inflections used for schema partial names and export file names.

use convert_case::{Case, Casing};

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "jeans",
    "money",
    "police",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("move", "moves"),
    ("ox", "oxen"),
    ("person", "people"),
    ("sex", "sexes"),
    ("tooth", "teeth"),
    ("woman", "women"),
    ("zombie", "zombies"),
];

/// Last path segment of a possibly qualified, possibly generic type name.
///
/// `crate::models::Appointment<T>` -> `Appointment`.
pub fn demodulize(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name).trim();
    base.rsplit("::").next().unwrap_or(base)
}

/// `GroupSession` -> `group_session`.
pub fn underscore(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// English plural of the last word in `name`; earlier words are kept as is.
pub fn pluralize(name: &str) -> String {
    let (prefix, word) = split_last_word(name);
    if word.is_empty() {
        return name.to_string();
    }
    format!("{prefix}{}", pluralize_word(word))
}

/// Lowercases and joins alphanumeric runs with `-`.
///
/// `"Mar 5, 2024"` -> `"mar-5-2024"`.
pub fn parameterize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

fn split_last_word(name: &str) -> (&str, &str) {
    let mut start = 0;
    let mut previous: Option<char> = None;
    for (index, ch) in name.char_indices() {
        if matches!(ch, '_' | '-' | ' ') {
            start = index + ch.len_utf8();
        } else if ch.is_uppercase() && previous.is_some_and(char::is_lowercase) {
            start = index;
        }
        previous = Some(ch);
    }
    name.split_at(start)
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if !word.is_ascii() {
        return if lower.ends_with('s') {
            word.to_string()
        } else {
            format!("{word}s")
        };
    }
    if lower == "quiz" {
        return format!("{word}zes");
    }
    for stem in ["matr", "vert", "ind"] {
        for ending in ["ix", "ex"] {
            if lower.ends_with(&format!("{stem}{ending}")) {
                return format!("{}ices", &word[..word.len() - 2]);
            }
        }
    }
    if ["x", "z", "ch", "ss", "sh"].iter().any(|end| lower.ends_with(end)) {
        return format!("{word}es");
    }
    if let Some(before) = lower.strip_suffix('y')
        && (before.ends_with("qu") || before.chars().last().is_some_and(|c| !is_vowel(c)))
    {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["alias", "status", "bus"].iter().any(|end| lower.ends_with(end)) {
        return format!("{word}es");
    }
    if lower.ends_with("sis") {
        return format!("{}ses", &word[..word.len() - 3]);
    }
    if let Some(before) = lower.strip_suffix("fe")
        && !before.ends_with('f')
        && !before.is_empty()
    {
        return format!("{}ves", &word[..word.len() - 2]);
    }
    if let Some(before) = lower.strip_suffix('f')
        && (before.ends_with('l') || before.ends_with('r'))
    {
        return format!("{}ves", &word[..word.len() - 1]);
    }
    if lower.ends_with("tum") || lower.ends_with("ium") {
        return format!("{}a", &word[..word.len() - 2]);
    }
    if lower.ends_with("buffalo") || lower.ends_with("tomato") {
        return format!("{word}es");
    }
    if lower.ends_with('s') {
        return word.to_string();
    }
    format!("{word}s")
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    } else {
        replacement.to_string()
    }
}
