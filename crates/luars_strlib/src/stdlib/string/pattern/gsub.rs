use super::engine::{CaptureValue, Match, PatternMatcher};
use crate::lua_vm::{LuaResult, PatternError};

/// Global substitution driver.
///
/// Scans `src` from the start, calling `replace` for each match (at most
/// `max_n` of them) to append the replacement to the output. Unmatched bytes
/// and the tail are copied verbatim. An anchored pattern is tried once, at
/// offset 0. Returns the new text and the number of substitutions.
pub fn gsub<F>(
    src: &[u8],
    pat: &[u8],
    max_n: usize,
    max_depth: usize,
    mut replace: F,
) -> LuaResult<(Vec<u8>, usize)>
where
    F: FnMut(&Match, &mut Vec<u8>) -> LuaResult<()>,
{
    let mut matcher = PatternMatcher::new(src, pat, max_depth);
    let anchored = matcher.is_anchored();
    let mut out = Vec::with_capacity(src.len());
    let mut pos = 0usize;
    let mut count = 0usize;

    while count < max_n {
        let found = matcher.match_at(pos)?;
        if let Some(m) = &found {
            count += 1;
            replace(m, &mut out)?;
        }
        match found {
            Some(m) if m.end > pos => pos = m.end,
            // empty match or no match: keep one byte and move on
            _ if pos < src.len() => {
                out.push(src[pos]);
                pos += 1;
            }
            _ => break,
        }
        if anchored {
            break;
        }
    }
    out.extend_from_slice(&src[pos..]);

    tracing::trace!(count, "gsub finished");
    Ok((out, count))
}

/// Expand a replacement template for match `m`:
/// `%0` is the whole match, `%1`..`%9` the captures, `%%` a literal `%`.
pub fn expand_template(
    template: &[u8],
    m: &Match,
    src: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), PatternError> {
    let mut i = 0;
    while i < template.len() {
        // copy the literal run up to the next '%'
        let run = template[i..]
            .iter()
            .position(|&b| b == b'%')
            .unwrap_or(template.len() - i);
        out.extend_from_slice(&template[i..i + run]);
        i += run;
        if i >= template.len() {
            break;
        }

        i += 1;
        match template.get(i) {
            Some(b'%') => out.push(b'%'),
            Some(b'0') => out.extend_from_slice(m.text(src)),
            Some(&d) if d.is_ascii_digit() => match m.capture(src, (d - b'1') as usize)? {
                CaptureValue::Bytes(bytes) => out.extend_from_slice(bytes),
                CaptureValue::Position(p) => {
                    let mut buf = itoa::Buffer::new();
                    out.extend_from_slice(buf.format(p).as_bytes());
                }
            },
            _ => return Err(PatternError::InvalidReplacement),
        }
        i += 1;
    }
    Ok(())
}
