use std::rc::Rc;

use super::engine::{Match, PatternMatcher};
use crate::lua_value::LuaString;
use crate::lua_vm::PatternError;

/// Owned global-match iterator.
///
/// Holds its own copy of the source and pattern plus the cursor, so several
/// iterations over different sources never interfere. Once exhausted (or
/// after reporting an error) it stays exhausted.
#[derive(Debug, Clone)]
pub struct GMatch {
    src: LuaString,
    pat: LuaString,
    cursor: usize,
    anchored: bool,
    exhausted: bool,
    max_depth: usize,
}

impl GMatch {
    pub fn new(src: &[u8], pat: &[u8], max_depth: usize) -> Self {
        Self::from_shared(Rc::from(src), Rc::from(pat), 0, max_depth)
    }

    /// Build over shared strings, starting at byte offset `init`.
    pub fn from_shared(src: LuaString, pat: LuaString, init: usize, max_depth: usize) -> Self {
        let anchored = pat.first() == Some(&b'^');
        let exhausted = init > src.len();
        Self {
            src,
            pat,
            cursor: init,
            anchored,
            exhausted,
            max_depth,
        }
    }

    /// Source the yielded match offsets refer to.
    pub fn source(&self) -> &[u8] {
        &self.src
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Advance to the next match.
    ///
    /// After a match the cursor moves to its end, or one byte further when
    /// the match was empty, so zero-length matches cannot loop forever.
    pub fn next_match(&mut self) -> Result<Option<Match>, PatternError> {
        if self.exhausted {
            return Ok(None);
        }
        let mut matcher = PatternMatcher::new(&self.src, &self.pat, self.max_depth);
        while self.cursor <= self.src.len() {
            match matcher.match_at(self.cursor) {
                Ok(Some(m)) => {
                    self.cursor = if m.is_empty() { m.end + 1 } else { m.end };
                    if self.anchored {
                        self.exhausted = true;
                    }
                    return Ok(Some(m));
                }
                Ok(None) if self.anchored => break,
                Ok(None) => self.cursor += 1,
                Err(e) => {
                    self.exhausted = true;
                    return Err(e);
                }
            }
        }
        self.exhausted = true;
        tracing::trace!(len = self.src.len(), "gmatch exhausted");
        Ok(None)
    }
}

impl Iterator for GMatch {
    type Item = Result<Match, PatternError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_match().transpose()
    }
}
