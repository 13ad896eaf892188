// Lua pattern matching, byte-oriented with no parse phase
//
// 1. The pattern is interpreted directly during matching
// 2. Fixed-size capture array (32 slots), rolled back by index
// 3. Recursion bounded by an explicit depth counter, not the native stack
// 4. gmatch state is an owned iterator object; gsub drives the matcher itself

mod class;
mod engine;
mod gmatch;
mod gsub;

pub use class::{match_class, single_match};
pub use engine::{Capture, CaptureKind, CaptureSet, CaptureValue, Match, PatternMatcher};
pub use gmatch::GMatch;
pub use gsub::{expand_template, gsub};

use crate::lua_vm::PatternError;
use crate::lua_vm::lua_limits::PATTERN_SPECIALS;

/// True when the pattern has no magic bytes and can be searched as plain text.
#[inline]
pub fn is_plain_pattern(pat: &[u8]) -> bool {
    !pat.iter().any(|c| PATTERN_SPECIALS.contains(c))
}

/// Plain substring search starting at byte offset `init`.
/// Returns the byte span of the first occurrence.
pub fn find_plain(text: &[u8], needle: &[u8], init: usize) -> Option<(usize, usize)> {
    if init > text.len() {
        return None;
    }
    let haystack = &text[init..];
    let pos = if needle.is_empty() {
        Some(0)
    } else {
        haystack.windows(needle.len()).position(|w| w == needle)
    };
    pos.map(|p| (init + p, init + p + needle.len()))
}

/// Find the first match of `pat` in `text` at or after byte offset `init`.
pub fn find(
    text: &[u8],
    pat: &[u8],
    init: usize,
    max_depth: usize,
) -> Result<Option<Match>, PatternError> {
    if init > text.len() {
        return Ok(None);
    }
    PatternMatcher::new(text, pat, max_depth).find_from(init)
}
