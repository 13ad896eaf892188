// Single-item matching for Lua patterns
// Handles `.`, %a, %c, %d, %g, %l, %p, %s, %u, %w, %x (uppercase inverts),
// escaped literals and [set] items. Everything works on single bytes with
// C-locale classification.

use crate::lua_vm::PatternError;

/// Check if byte `c` belongs to class letter `cl`.
/// Uppercase class letters invert the class; any other byte matches itself.
#[inline]
pub fn match_class(c: u8, cl: u8) -> bool {
    let res = match cl.to_ascii_lowercase() {
        b'a' => c.is_ascii_alphabetic(),
        b'c' => c.is_ascii_control(),
        b'd' => c.is_ascii_digit(),
        b'g' => c.is_ascii_graphic(),
        b'l' => c.is_ascii_lowercase(),
        b'p' => c.is_ascii_punctuation(),
        // C isspace also accepts \v
        b's' => c.is_ascii_whitespace() || c == 0x0b,
        b'u' => c.is_ascii_uppercase(),
        b'w' => c.is_ascii_alphanumeric(),
        b'x' => c.is_ascii_hexdigit(),
        _ => return cl == c,
    };
    if cl.is_ascii_uppercase() { !res } else { res }
}

/// Index just past the single pattern item starting at `pat[p]`
/// (does not include a trailing quantifier).
pub fn class_end(pat: &[u8], p: usize) -> Result<usize, PatternError> {
    match pat[p] {
        b'%' => {
            if p + 1 >= pat.len() {
                return Err(PatternError::EndsWithPercent);
            }
            Ok(p + 2)
        }
        b'[' => {
            let mut i = p + 1;
            if pat.get(i) == Some(&b'^') {
                i += 1;
            }
            // The first byte of the set is always a member, even ']'
            loop {
                if i >= pat.len() {
                    return Err(PatternError::MissingBracket);
                }
                let c = pat[i];
                i += 1;
                if c == b'%' {
                    if i >= pat.len() {
                        return Err(PatternError::MissingBracket);
                    }
                    i += 1;
                }
                if pat.get(i) == Some(&b']') {
                    return Ok(i + 1);
                }
            }
        }
        _ => Ok(p + 1),
    }
}

/// Match `c` against the set `pat[p..=ec]`, where `pat[p]` is `[` and
/// `pat[ec]` is the closing `]`.
pub fn match_bracket_class(c: u8, pat: &[u8], p: usize, ec: usize) -> bool {
    let mut i = p + 1;
    let mut found = true;
    if pat[i] == b'^' {
        found = false;
        i += 1;
    }
    while i < ec {
        if pat[i] == b'%' {
            i += 1;
            if match_class(c, pat[i]) {
                return found;
            }
            i += 1;
        } else if pat[i + 1] == b'-' && i + 2 < ec {
            if pat[i] <= c && c <= pat[i + 2] {
                return found;
            }
            i += 3;
        } else {
            if pat[i] == c {
                return found;
            }
            i += 1;
        }
    }
    !found
}

/// Match one byte against the item `pat[p..ep]`.
#[inline]
pub fn single_match(c: u8, pat: &[u8], p: usize, ep: usize) -> bool {
    match pat[p] {
        b'.' => true,
        b'%' => match_class(c, pat[p + 1]),
        b'[' => match_bracket_class(c, pat, p, ep - 1),
        literal => literal == c,
    }
}
