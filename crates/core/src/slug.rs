//! Slug derivation and disambiguation for property listings.
//!
//! A slug is derived from the listing title and must be unique across all
//! listings. When the derived slug is already held by another record, a
//! numeric suffix (`-2`, `-3`, ...) is appended, picking the smallest free
//! one. The functions here are pure; the repository feeds them the slugs
//! currently taken in the database.

use std::collections::HashSet;

use crate::error::CoreError;

/// Maximum slug length, suffix included.
pub const SLUG_MAX_LENGTH: usize = 50;

/// Used when a title contains nothing slug-worthy (e.g. only punctuation).
pub const FALLBACK_SLUG: &str = "property";

/// Upper bound on the numeric suffix tried by [`unique_slug`].
pub const MAX_SLUG_SUFFIX: u32 = 10_000;

/// Fold a Latin letter carrying a diacritic to its ASCII base.
fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ñ' | 'Ñ' => "n",
        'ç' | 'Ç' => "c",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        _ => return None,
    };
    Some(folded)
}

/// Generate a URL-safe slug from a listing title.
///
/// Folds common diacritics to ASCII, lowercases, replaces every other
/// non-alphanumeric character with a hyphen, collapses consecutive hyphens,
/// trims leading/trailing hyphens and truncates to [`SLUG_MAX_LENGTH`].
/// Falls back to [`FALLBACK_SLUG`] when nothing is left.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = true;

    for c in title.chars() {
        let piece: Option<&str> = if c.is_ascii_alphanumeric() {
            None
        } else {
            fold_char(c)
        };

        match piece {
            Some(folded) => {
                result.push_str(folded);
                prev_hyphen = false;
            }
            None if c.is_ascii_alphanumeric() => {
                result.push(c.to_ascii_lowercase());
                prev_hyphen = false;
            }
            None => {
                if !prev_hyphen {
                    result.push('-');
                }
                prev_hyphen = true;
            }
        }
    }

    // Output is pure ASCII, so byte truncation is safe.
    result.truncate(SLUG_MAX_LENGTH);
    let trimmed = result.trim_matches('-');

    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the `n`-th candidate for `base`.
///
/// `n <= 1` yields the base itself. Otherwise `-{n}` is appended, cropping
/// the base so the whole candidate stays within [`SLUG_MAX_LENGTH`].
pub fn slug_candidate(base: &str, n: u32) -> String {
    if n <= 1 {
        return base.to_string();
    }

    let suffix = format!("-{n}");
    let keep = SLUG_MAX_LENGTH.saturating_sub(suffix.len()).min(base.len());
    let head = base.get(..keep).unwrap_or(base).trim_end_matches('-');
    format!("{head}{suffix}")
}

/// Common prefix of every candidate [`unique_slug`] can produce for `base`.
///
/// The repository uses it to fetch the taken slugs with a single
/// `LIKE 'prefix%'` scan, even when long bases get cropped to fit a suffix.
pub fn candidate_prefix(base: &str) -> &str {
    let longest_suffix = MAX_SLUG_SUFFIX.to_string().len() + 1;
    let keep = SLUG_MAX_LENGTH.saturating_sub(longest_suffix).min(base.len());
    base.get(..keep).unwrap_or(base).trim_end_matches('-')
}

/// Pick the first candidate for `base` that is not in `taken`.
///
/// `taken` must contain the slugs held by *other* records only, so a record
/// whose title did not change keeps its current slug on update.
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> Result<String, CoreError> {
    (1..=MAX_SLUG_SUFFIX)
        .map(|n| slug_candidate(base, n))
        .find(|candidate| !taken.contains(candidate))
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "No free slug for '{base}' after {MAX_SLUG_SUFFIX} candidates"
            ))
        })
}
