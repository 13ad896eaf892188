// String library
// Implements: byte, char, find, format, gmatch, gsub, len, lower, match,
// rep, reverse, sub, upper
pub mod format_spec;
pub mod pattern;
pub mod printf;
pub mod string_format;

use std::cell::RefCell;
use std::rc::Rc;

use crate::lib_registry::LibraryModule;
use crate::lua_value::{LuaFunction, LuaValue};
use crate::lua_vm::{ArgumentError, LuaError, LuaResult, LuaState};
use crate::stdlib::auxlib::{arg_typeerror, check_integer, check_string, opt_integer};
use pattern::{CaptureValue, GMatch, Match};

pub fn create_string_lib() -> LibraryModule {
    crate::lib_module!("string", {
        "byte" => string_byte,
        "char" => string_char,
        "find" => string_find,
        "format" => string_format::string_format,
        "gmatch" => string_gmatch,
        "gsub" => string_gsub,
        "len" => string_len,
        "lower" => string_lower,
        "match" => string_match,
        "rep" => string_rep,
        "reverse" => string_reverse,
        "sub" => string_sub,
        "upper" => string_upper,
    })
}

/// Translate a 1-based, possibly negative, position into a 1-based offset.
///
/// Negative positions count back from the end; one reaching past the start
/// becomes 0. Non-negative positions pass through unchanged.
#[inline]
pub fn relative_position(pos: i64, len: usize) -> usize {
    if pos >= 0 {
        pos as usize
    } else if pos.unsigned_abs() as usize > len {
        0
    } else {
        len - pos.unsigned_abs() as usize + 1
    }
}

fn capture_to_value(cap: CaptureValue<'_>) -> LuaValue {
    match cap {
        CaptureValue::Bytes(bytes) => LuaValue::string(bytes),
        CaptureValue::Position(p) => LuaValue::integer(p as i64),
    }
}

/// Push the captures of `m`; with `whole_if_none`, a pattern without
/// captures yields the whole match instead.
fn push_captures(l: &mut LuaState, src: &[u8], m: &Match, whole_if_none: bool) -> LuaResult<usize> {
    let n = if whole_if_none {
        m.captures.len().max(1)
    } else {
        m.captures.len()
    };
    for i in 0..n {
        let value = capture_to_value(m.capture(src, i)?);
        l.push_value(value)?;
    }
    Ok(n)
}

/// string.byte(s [, i [, j]]) - Return byte values
fn string_byte(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "byte")?;
    let i = opt_integer(l, 2, "byte", 1)?;
    let j = opt_integer(l, 3, "byte", i)?;

    let start = relative_position(i, s.len()).max(1);
    let end = relative_position(j, s.len()).min(s.len());
    if start > end {
        return Ok(0);
    }
    for &b in &s[start - 1..end] {
        l.push_value(LuaValue::integer(b as i64))?;
    }
    Ok(end - start + 1)
}

/// string.char(...) - Build a string from byte values
fn string_char(l: &mut LuaState) -> LuaResult<usize> {
    let n = l.arg_count();
    let mut bytes = Vec::with_capacity(n);
    for narg in 1..=n {
        let c = check_integer(l, narg, "char")?;
        let byte = u8::try_from(c)
            .map_err(|_| LuaError::argerror(narg, "char", "value out of range"))?;
        bytes.push(byte);
    }
    l.push_value(LuaValue::string(bytes))?;
    Ok(1)
}

/// string.len(s)
fn string_len(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "len")?;
    l.push_value(LuaValue::integer(s.len() as i64))?;
    Ok(1)
}

/// string.lower(s) - ASCII only, other bytes are kept
fn string_lower(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "lower")?;
    l.push_value(LuaValue::string(s.to_ascii_lowercase()))?;
    Ok(1)
}

/// string.upper(s) - ASCII only, other bytes are kept
fn string_upper(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "upper")?;
    l.push_value(LuaValue::string(s.to_ascii_uppercase()))?;
    Ok(1)
}

/// string.rep(s, n [, sep]) - Repeat string
fn string_rep(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "rep")?;
    let n = check_integer(l, 2, "rep")?;
    let sep = match l.get_arg(3) {
        None | Some(LuaValue::Nil) => Rc::from(&b""[..]),
        Some(_) => check_string(l, 3, "rep")?,
    };

    if n <= 0 {
        l.push_value(LuaValue::string(b""))?;
        return Ok(1);
    }

    let total = (s.len() as i64)
        .checked_mul(n)
        .and_then(|t| t.checked_add((sep.len() as i64).checked_mul(n - 1)?));
    let limit = l.safe_option().max_string_size;
    let total = match total {
        Some(t) if t <= limit => t as usize,
        _ => return Err(ArgumentError::StringTooLarge.into()),
    };

    let mut result = Vec::with_capacity(total);
    for i in 0..n {
        if i > 0 {
            result.extend_from_slice(&sep);
        }
        result.extend_from_slice(&s);
    }
    l.push_value(LuaValue::string(result))?;
    Ok(1)
}

/// string.reverse(s) - Byte-wise reverse
fn string_reverse(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "reverse")?;
    let mut reversed = s.to_vec();
    reversed.reverse();
    l.push_value(LuaValue::string(reversed))?;
    Ok(1)
}

/// string.sub(s, i [, j]) - Extract substring
fn string_sub(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "sub")?;
    let i = check_integer(l, 2, "sub")?;
    let j = opt_integer(l, 3, "sub", -1)?;

    let start = relative_position(i, s.len()).max(1);
    let end = relative_position(j, s.len()).min(s.len());
    let result = if start <= end { &s[start - 1..end] } else { &[][..] };
    l.push_value(LuaValue::string(result))?;
    Ok(1)
}

/// string.find(s, pattern [, init [, plain]])
fn string_find(l: &mut LuaState) -> LuaResult<usize> {
    str_find_aux(l, true)
}

/// string.match(s, pattern [, init])
fn string_match(l: &mut LuaState) -> LuaResult<usize> {
    str_find_aux(l, false)
}

fn str_find_aux(l: &mut LuaState, find: bool) -> LuaResult<usize> {
    let func = if find { "find" } else { "match" };
    let s = check_string(l, 1, func)?;
    let p = check_string(l, 2, func)?;
    let init = relative_position(opt_integer(l, 3, func, 1)?, s.len()).max(1);

    if init > s.len() + 1 {
        l.push_value(LuaValue::nil())?;
        return Ok(1);
    }
    let start = init - 1;

    let plain = find && l.get_arg(4).is_some_and(|v| v.is_truthy());
    if find && (plain || pattern::is_plain_pattern(&p)) {
        return match pattern::find_plain(&s, &p, start) {
            Some((b, e)) => {
                l.push_value(LuaValue::integer(b as i64 + 1))?;
                l.push_value(LuaValue::integer(e as i64))?;
                Ok(2)
            }
            None => {
                l.push_value(LuaValue::nil())?;
                Ok(1)
            }
        };
    }

    let max_depth = l.safe_option().max_pattern_depth;
    match pattern::find(&s, &p, start, max_depth)? {
        Some(m) if find => {
            l.push_value(LuaValue::integer(m.start as i64 + 1))?;
            l.push_value(LuaValue::integer(m.end as i64))?;
            Ok(2 + push_captures(l, &s, &m, false)?)
        }
        Some(m) => push_captures(l, &s, &m, true),
        None => {
            l.push_value(LuaValue::nil())?;
            Ok(1)
        }
    }
}

/// string.gmatch(s, pattern) - Iterator over successive matches
fn string_gmatch(l: &mut LuaState) -> LuaResult<usize> {
    let s = check_string(l, 1, "gmatch")?;
    let p = check_string(l, 2, "gmatch")?;
    let max_depth = l.safe_option().max_pattern_depth;

    let state = Rc::new(RefCell::new(GMatch::from_shared(s, p, 0, max_depth)));
    let iter = LuaFunction::closure(move |l| gmatch_step(l, &state));
    l.push_value(LuaValue::Function(iter))?;
    Ok(1)
}

/// One call of the gmatch iterator: the next match's captures, or nothing.
fn gmatch_step(l: &mut LuaState, state: &RefCell<GMatch>) -> LuaResult<usize> {
    let mut gmatch = state.borrow_mut();
    match gmatch.next_match()? {
        Some(m) => push_captures(l, gmatch.source(), &m, true),
        None => Ok(0),
    }
}

/// string.gsub(s, pattern, repl [, n]) - Global substitution
///
/// `repl` may be a template string (numbers are converted), a table indexed
/// by the first capture, or a function called with the captures.
fn string_gsub(l: &mut LuaState) -> LuaResult<usize> {
    let src = check_string(l, 1, "gsub")?;
    let p = check_string(l, 2, "gsub")?;
    let repl = l.get_arg(3);
    let max_n = opt_integer(l, 4, "gsub", src.len() as i64 + 1)?;
    let max_n = usize::try_from(max_n).unwrap_or(0);
    let Some(repl) = repl else {
        return Err(arg_typeerror(3, "gsub", "string/function/table", None));
    };
    let max_depth = l.safe_option().max_pattern_depth;

    let (result, count) = match &repl {
        LuaValue::String(_) | LuaValue::Integer(_) | LuaValue::Number(_) => {
            let template = repl.to_lua_string();
            pattern::gsub(&src, &p, max_n, max_depth, |m, out| {
                Ok(pattern::expand_template(&template, m, &src, out)?)
            })?
        }
        LuaValue::Table(table) => pattern::gsub(&src, &p, max_n, max_depth, |m, out| {
            let key = capture_to_value(m.capture(&src, 0)?);
            add_value(out, m, &src, table.get(&key))
        })?,
        LuaValue::Function(func) => pattern::gsub(&src, &p, max_n, max_depth, |m, out| {
            let args = m
                .capture_values(&src)?
                .into_iter()
                .map(capture_to_value)
                .collect();
            let value = l.call(func, args)?.into_iter().next().unwrap_or_default();
            add_value(out, m, &src, value)
        })?,
        other => return Err(arg_typeerror(3, "gsub", "string/function/table", Some(other))),
    };

    l.push_value(LuaValue::string(result))?;
    l.push_value(LuaValue::integer(count as i64))?;
    Ok(2)
}

/// Append a table or function replacement result: nil/false keeps the
/// original match, strings and numbers are inserted as text.
fn add_value(out: &mut Vec<u8>, m: &Match, src: &[u8], value: LuaValue) -> LuaResult<()> {
    match value {
        LuaValue::Nil | LuaValue::Boolean(false) => out.extend_from_slice(m.text(src)),
        LuaValue::String(s) => out.extend_from_slice(&s),
        v @ (LuaValue::Integer(_) | LuaValue::Number(_)) => v.write_lua_string(out),
        other => {
            return Err(ArgumentError::InvalidReplacementValue(other.type_name()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::relative_position;

    #[test]
    fn test_relative_position() {
        assert_eq!(relative_position(3, 10), 3);
        assert_eq!(relative_position(0, 10), 0);
        assert_eq!(relative_position(-1, 10), 10);
        assert_eq!(relative_position(-10, 10), 1);
        assert_eq!(relative_position(-11, 10), 0);
        assert_eq!(relative_position(15, 10), 15);
        assert_eq!(relative_position(-1, 0), 0);
    }

    #[test]
    fn test_relative_position_bounds() {
        for len in 0..6usize {
            for pos in -(len as i64)..=len as i64 + 1 {
                let r = relative_position(pos, len);
                assert!(r <= len + 1);
                if pos < 0 {
                    assert_eq!(r as i64, len as i64 + pos + 1);
                }
            }
        }
    }
}
