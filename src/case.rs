//! Field identifier to flag name conversion.

/// Convert a mixed or Pascal case identifier into lowercase, hyphen separated
/// "lisp-case".
///
/// A hyphen is inserted before an uppercase character that is followed by a
/// non-uppercase one, unless it is the first character. A run of capitals
/// (an acronym) therefore stays joined until its last letter, which starts the
/// next word: `HTTPServer` becomes `http-server`. Underscores become hyphens so
/// snake_case identifiers map the same way, and no two hyphens are emitted in a
/// row.
///
/// ```
/// assert_eq!(flagvar::lisp_case("LispCase"), "lisp-case");
/// assert_eq!(flagvar::lisp_case("max_connections"), "max-connections");
/// ```
pub fn lisp_case(s: &str) -> String {
    let mut chars = s.chars();
    let Some(mut current) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(s.len() + 4);
    let mut first = true;
    for next in chars {
        if !first && current.is_uppercase() && !next.is_uppercase() && !out.ends_with('-') {
            out.push('-');
        }
        push_lower(&mut out, current);
        current = next;
        first = false;
    }
    push_lower(&mut out, current);
    out
}

fn push_lower(out: &mut String, c: char) {
    if c == '_' || c == '-' {
        if !out.ends_with('-') {
            out.push('-');
        }
        return;
    }
    out.extend(c.to_lowercase());
}
