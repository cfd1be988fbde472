//! Name casing for path segments.
//!
//! Paths on the wire are snake_case (`/math/get_stats`) while services and
//! methods are registered in PascalCase (`Math.GetStats`).

/// Convert a snake_case segment to PascalCase.
///
/// Each `_`-separated word gets its first character upper-cased; the rest of
/// the word is kept as written, so `get_HTTP_status` becomes `GetHTTPStatus`.
/// Empty words (leading, trailing or doubled underscores) are dropped.
pub fn snake_to_pascal(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for word in segment.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
