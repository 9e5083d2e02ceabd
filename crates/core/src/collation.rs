//! Name ordering that ignores case and accents.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for a display name: lower-cased, canonically decomposed,
/// with combining marks dropped.
pub fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(base) => key.push_str(base),
            None => key.push(c),
        }
    }
    key
}

/// Compare two names the way the list screen orders them.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Stable sort of `items` by the collation key of their name.
pub fn sort_by_name<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| collation_key(name(item)));
}

/// Letters with no canonical decomposition that still sort as their base.
fn fold_letter(c: char) -> Option<&'static str> {
    let base = match c {
        'æ' => "ae",
        'đ' | 'ð' => "d",
        'ħ' => "h",
        'ı' => "i",
        'ł' | 'ŀ' => "l",
        'œ' => "oe",
        'ø' => "o",
        'ß' => "ss",
        'þ' => "th",
        _ => return None,
    };
    Some(base)
}
