// Core pattern matching engine: direct interpretation, no compiled form
//
// - PatternMatcher holds source, pattern, the CaptureSet and a depth counter
// - do_match recursively walks the pattern with backtracking
// - Captures live in a fixed array; rollback is by index, never by cloning

use super::class::{class_end, match_bracket_class, single_match};
use crate::lua_vm::PatternError;
use crate::lua_vm::lua_limits::LUA_MAXCAPTURES;

/// State of one capture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Capture closed with this many bytes
    Closed(usize),
    /// `(` seen, matching `)` not reached yet
    Unfinished,
    /// `()`, records only the offset
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    /// Byte offset into the source
    pub start: usize,
    pub kind: CaptureKind,
}

/// Captures recorded during one matching attempt, in `(` order.
#[derive(Debug, Clone, Copy)]
pub struct CaptureSet {
    slots: [Capture; LUA_MAXCAPTURES],
    level: usize,
}

impl CaptureSet {
    pub fn new() -> Self {
        Self {
            slots: [Capture {
                start: 0,
                kind: CaptureKind::Unfinished,
            }; LUA_MAXCAPTURES],
            level: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Capture> {
        self.slots[..self.level].get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capture> {
        self.slots[..self.level].iter()
    }

    fn clear(&mut self) {
        self.level = 0;
    }

    fn push(&mut self, capture: Capture) -> Result<(), PatternError> {
        if self.level >= LUA_MAXCAPTURES {
            return Err(PatternError::TooManyCaptures);
        }
        self.slots[self.level] = capture;
        self.level += 1;
        Ok(())
    }

    fn truncate(&mut self, level: usize) {
        self.level = level.min(self.level);
    }

    /// Index of the most recently opened capture that is still unfinished.
    fn last_unfinished(&self) -> Option<usize> {
        self.iter()
            .rposition(|cap| cap.kind == CaptureKind::Unfinished)
    }

    fn set_kind(&mut self, index: usize, kind: CaptureKind) {
        self.slots[index].kind = kind;
    }

    fn has_unfinished(&self) -> bool {
        self.last_unfinished().is_some()
    }
}

impl Default for CaptureSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a CaptureSet {
    type Item = &'a Capture;
    type IntoIter = std::slice::Iter<'a, Capture>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A capture resolved against its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureValue<'s> {
    Bytes(&'s [u8]),
    /// 1-based position recorded by `()`
    Position(usize),
}

/// One successful match: byte span `start..end` plus its captures.
#[derive(Debug, Clone, Copy)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub captures: CaptureSet,
}

impl Match {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whole matched text.
    pub fn text<'s>(&self, src: &'s [u8]) -> &'s [u8] {
        &src[self.start..self.end]
    }

    /// Capture `index` (0-based). With no explicit captures, index 0 stands
    /// for the whole match.
    pub fn capture<'s>(
        &self,
        src: &'s [u8],
        index: usize,
    ) -> Result<CaptureValue<'s>, PatternError> {
        let Some(cap) = self.captures.get(index) else {
            if index == 0 && self.captures.is_empty() {
                return Ok(CaptureValue::Bytes(self.text(src)));
            }
            return Err(PatternError::InvalidCaptureIndex(index + 1));
        };
        match cap.kind {
            CaptureKind::Closed(len) => Ok(CaptureValue::Bytes(&src[cap.start..cap.start + len])),
            CaptureKind::Position => Ok(CaptureValue::Position(cap.start + 1)),
            CaptureKind::Unfinished => Err(PatternError::UnfinishedCapture),
        }
    }

    /// All captures, or the whole match when the pattern has none.
    pub fn capture_values<'s>(
        &self,
        src: &'s [u8],
    ) -> Result<Vec<CaptureValue<'s>>, PatternError> {
        let n = self.captures.len().max(1);
        (0..n).map(|i| self.capture(src, i)).collect()
    }
}

/// Walk the pattern once for paren balance and capture count, so these
/// errors do not depend on how far matching gets into the source.
fn check_captures(pat: &[u8], mut p: usize) -> Result<(), PatternError> {
    let mut open = 0usize;
    let mut count = 0usize;
    while p < pat.len() {
        match pat[p] {
            b'(' => {
                open += 1;
                count += 1;
                if count > LUA_MAXCAPTURES {
                    return Err(PatternError::TooManyCaptures);
                }
                p += 1;
            }
            b')' => {
                open = open.checked_sub(1).ok_or(PatternError::InvalidPatternCapture)?;
                p += 1;
            }
            // `%bxy` takes two raw bytes; `%f` is followed by a set
            b'%' => match pat.get(p + 1) {
                Some(b'b') => p += 4,
                Some(b'f') => p += 2,
                _ => p = class_end(pat, p)?,
            },
            b'[' => p = class_end(pat, p)?,
            _ => p += 1,
        }
    }
    if open > 0 {
        return Err(PatternError::UnfinishedCapture);
    }
    Ok(())
}

/// Recursive backtracking matcher over one source/pattern pair.
pub struct PatternMatcher<'a> {
    src: &'a [u8],
    pat: &'a [u8],
    /// Pattern index of the first item (1 when anchored with `^`)
    pat_start: usize,
    captures: CaptureSet,
    depth: usize,
    max_depth: usize,
    /// Set once `check_captures` has passed
    checked: bool,
}

type Step = Result<Option<usize>, PatternError>;

impl<'a> PatternMatcher<'a> {
    pub fn new(src: &'a [u8], pat: &'a [u8], max_depth: usize) -> Self {
        let anchored = pat.first() == Some(&b'^');
        Self {
            src,
            pat,
            pat_start: usize::from(anchored),
            captures: CaptureSet::new(),
            depth: 0,
            max_depth,
            checked: false,
        }
    }

    /// Whether the pattern starts with `^`.
    #[inline]
    pub fn is_anchored(&self) -> bool {
        self.pat_start == 1
    }

    #[inline]
    pub fn source(&self) -> &'a [u8] {
        self.src
    }

    /// Try to match the pattern starting exactly at byte offset `start`.
    /// Captures are reset for every attempt.
    pub fn match_at(&mut self, start: usize) -> Result<Option<Match>, PatternError> {
        if !self.checked {
            check_captures(self.pat, self.pat_start)?;
            self.checked = true;
        }
        self.captures.clear();
        self.depth = 0;
        let Some(end) = self.do_match(start, self.pat_start)? else {
            return Ok(None);
        };
        if self.captures.has_unfinished() {
            return Err(PatternError::UnfinishedCapture);
        }
        Ok(Some(Match {
            start,
            end,
            captures: self.captures,
        }))
    }

    /// Scan forward from `init` (a single attempt when anchored) up to and
    /// including the end of the source.
    pub fn find_from(&mut self, init: usize) -> Result<Option<Match>, PatternError> {
        let mut s = init;
        loop {
            if let Some(m) = self.match_at(s)? {
                return Ok(Some(m));
            }
            s += 1;
            if self.is_anchored() || s > self.src.len() {
                return Ok(None);
            }
        }
    }

    fn do_match(&mut self, s: usize, p: usize) -> Step {
        if self.depth >= self.max_depth {
            tracing::debug!(max_depth = self.max_depth, "pattern recursion limit reached");
            return Err(PatternError::TooComplex);
        }
        self.depth += 1;
        let result = self.match_items(s, p);
        self.depth -= 1;
        result
    }

    /// Sequential items are consumed in a loop; only choice points recurse.
    fn match_items(&mut self, mut s: usize, mut p: usize) -> Step {
        loop {
            if p == self.pat.len() {
                return Ok(Some(s));
            }
            match self.pat[p] {
                b'(' => {
                    return if self.pat.get(p + 1) == Some(&b')') {
                        self.start_capture(s, p + 2, CaptureKind::Position)
                    } else {
                        self.start_capture(s, p + 1, CaptureKind::Unfinished)
                    };
                }
                b')' => return self.end_capture(s, p + 1),
                b'$' if p + 1 == self.pat.len() => {
                    return Ok((s == self.src.len()).then_some(s));
                }
                b'%' => match self.pat.get(p + 1) {
                    Some(b'b') => match self.match_balance(s, p + 2)? {
                        Some(next) => {
                            s = next;
                            p += 4;
                            continue;
                        }
                        None => return Ok(None),
                    },
                    Some(b'f') => {
                        p += 2;
                        if self.pat.get(p) != Some(&b'[') {
                            return Err(PatternError::MissingFrontierBracket);
                        }
                        let ep = class_end(self.pat, p)?;
                        let prev = if s == 0 { 0 } else { self.src[s - 1] };
                        let cur = self.src.get(s).copied().unwrap_or(0);
                        if !match_bracket_class(prev, self.pat, p, ep - 1)
                            && match_bracket_class(cur, self.pat, p, ep - 1)
                        {
                            p = ep;
                            continue;
                        }
                        return Ok(None);
                    }
                    Some(d) if d.is_ascii_digit() => match self.match_back_reference(s, *d)? {
                        Some(next) => {
                            s = next;
                            p += 2;
                            continue;
                        }
                        None => return Ok(None),
                    },
                    _ => {}
                },
                _ => {}
            }

            // Single item, optionally followed by a quantifier
            let ep = class_end(self.pat, p)?;
            let quantifier = self.pat.get(ep).copied();
            if !self.single_match_at(s, p, ep) {
                if matches!(quantifier, Some(b'*' | b'?' | b'-')) {
                    // zero repetitions are acceptable
                    p = ep + 1;
                    continue;
                }
                return Ok(None);
            }
            match quantifier {
                Some(b'?') => {
                    if let Some(end) = self.do_match(s + 1, ep + 1)? {
                        return Ok(Some(end));
                    }
                    p = ep + 1;
                }
                Some(b'+') => return self.max_expand(s + 1, p, ep),
                Some(b'*') => return self.max_expand(s, p, ep),
                Some(b'-') => return self.min_expand(s, p, ep),
                _ => {
                    s += 1;
                    p = ep;
                }
            }
        }
    }

    #[inline]
    fn single_match_at(&self, s: usize, p: usize, ep: usize) -> bool {
        match self.src.get(s) {
            Some(&c) => single_match(c, self.pat, p, ep),
            None => false,
        }
    }

    /// Greedy `*` / `+`: take as many as possible, then give back one at a time.
    fn max_expand(&mut self, s: usize, p: usize, ep: usize) -> Step {
        let mut count = 0;
        while self.single_match_at(s + count, p, ep) {
            count += 1;
        }
        loop {
            if let Some(end) = self.do_match(s + count, ep + 1)? {
                return Ok(Some(end));
            }
            if count == 0 {
                return Ok(None);
            }
            count -= 1;
        }
    }

    /// Lazy `-`: try the rest first, expand by one item only on failure.
    fn min_expand(&mut self, mut s: usize, p: usize, ep: usize) -> Step {
        loop {
            if let Some(end) = self.do_match(s, ep + 1)? {
                return Ok(Some(end));
            }
            if self.single_match_at(s, p, ep) {
                s += 1;
            } else {
                return Ok(None);
            }
        }
    }

    fn start_capture(&mut self, s: usize, p: usize, kind: CaptureKind) -> Step {
        let level = self.captures.len();
        self.captures.push(Capture { start: s, kind })?;
        let result = self.do_match(s, p)?;
        if result.is_none() {
            self.captures.truncate(level);
        }
        Ok(result)
    }

    fn end_capture(&mut self, s: usize, p: usize) -> Step {
        let Some(index) = self.captures.last_unfinished() else {
            return Err(PatternError::InvalidPatternCapture);
        };
        let start = self.captures.slots[index].start;
        self.captures.set_kind(index, CaptureKind::Closed(s - start));
        let result = self.do_match(s, p)?;
        if result.is_none() {
            self.captures.set_kind(index, CaptureKind::Unfinished);
        }
        Ok(result)
    }

    /// `%bxy` with `p` pointing at `x`.
    fn match_balance(&self, s: usize, p: usize) -> Step {
        if p + 1 >= self.pat.len() {
            return Err(PatternError::MissingBalanceArgs);
        }
        let (open, close) = (self.pat[p], self.pat[p + 1]);
        if self.src.get(s) != Some(&open) {
            return Ok(None);
        }
        let mut depth = 1usize;
        for (i, &c) in self.src.iter().enumerate().skip(s + 1) {
            if c == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(i + 1));
                }
            } else if c == open {
                depth += 1;
            }
        }
        Ok(None)
    }

    /// `%1`..`%9`: the text of a closed capture must repeat at `s`.
    fn match_back_reference(&self, s: usize, digit: u8) -> Step {
        let n = (digit - b'0') as usize;
        let cap = match n.checked_sub(1).and_then(|i| self.captures.get(i)) {
            Some(cap) if cap.kind != CaptureKind::Unfinished => *cap,
            _ => return Err(PatternError::InvalidCaptureIndex(n)),
        };
        let CaptureKind::Closed(len) = cap.kind else {
            // a position capture has no text to repeat
            return Ok(None);
        };
        let captured = &self.src[cap.start..cap.start + len];
        Ok(self.src[s..].starts_with(captured).then_some(s + len))
    }
}
