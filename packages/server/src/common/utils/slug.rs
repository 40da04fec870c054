use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// URL handle for a product or bundle name.
///
/// Lowercases, collapses every run of non `[a-z0-9]` characters into a
/// single `-`, and trims leading/trailing dashes.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}
