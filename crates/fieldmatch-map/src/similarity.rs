//! Normalized edit-distance similarity between field names.

use rapidfuzz::distance::levenshtein;

/// Similarity in `[0, 1]` based on Levenshtein distance:
/// `1 - distance(s, t) / max(len(s), len(t))`, lengths counted in chars.
///
/// Two empty strings are identical (1.0); an empty string shares nothing with
/// a non-empty one (0.0).
pub fn similarity(s: &str, t: &str) -> f32 {
    let s_len = s.chars().count();
    let t_len = t.chars().count();
    match (s_len, t_len) {
        (0, 0) => return 1.0,
        (0, _) | (_, 0) => return 0.0,
        _ => {}
    }
    let distance = levenshtein::distance(s.chars(), t.chars());
    let longest = s_len.max(t_len);
    1.0 - distance as f32 / longest as f32
}
