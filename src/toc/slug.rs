use std::ops::RangeInclusive;

use rand::Rng;

pub const FALLBACK_ID_PREFIX: &str = "heading-";
pub const FALLBACK_ID_RANGE: RangeInclusive<u32> = 1000..=9999;

/// Turns heading text into an anchor id.
///
/// Lower-cases, keeps ASCII letters and digits, turns whitespace and hyphen
/// runs into a single hyphen and trims hyphens at both ends. Text with nothing
/// left after that gets `heading-NNNN` with a random four digit suffix, so the
/// fallback is only deterministic when `rng` is.
pub fn generate_id<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        fallback_id(rng)
    } else {
        slug
    }
}

pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        }
    }

    out
}

pub fn fallback_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{FALLBACK_ID_PREFIX}{}", rng.random_range(FALLBACK_ID_RANGE))
}

/// Normalizes an author-supplied id; blank or whitespace-bearing ids are unusable.
pub fn explicit_id(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    Some(trimmed.to_string())
}
