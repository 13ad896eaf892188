//! Conversions between Rust values and `LuaValue`, and Lua's coercion rules.
//!
//! - `From<T> for LuaValue` for the Rust types hosts commonly pass in
//! - number coercion (`to_number` / `to_integer`) accepting numeric strings
//! - `tostring` rendering used by `%s`, gsub replacement values and `rep`

use std::rc::Rc;

use crate::lua_value::{LuaFunction, LuaTable, LuaValue};
use crate::stdlib::string::printf::lua_float_to_string;

/// Exact float → integer conversion; fails for fractions, NaN and values
/// outside the `i64` range.
#[inline]
pub fn float_to_integer(f: f64) -> Option<i64> {
    // -2^63 is representable, 2^63 is not
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < -(i64::MIN as f64) {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a numeric string the way the Lua lexer does: surrounding whitespace
/// allowed, decimal or hexadecimal integers, decimal floats.
/// Returns an `Integer` or `Number` value.
pub fn str_to_number(bytes: &[u8]) -> Option<LuaValue> {
    let s = std::str::from_utf8(bytes).ok()?;
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    if s.is_empty() {
        return None;
    }

    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        // hex integers wrap around on overflow
        let value = hex.bytes().fold(0i64, |acc, b| {
            let d = (b as char).to_digit(16).unwrap_or(0) as i64;
            acc.wrapping_mul(16).wrapping_add(d)
        });
        return Some(LuaValue::Integer(if negative {
            value.wrapping_neg()
        } else {
            value
        }));
    }

    // Rust accepts "inf"/"nan" spellings that Lua does not
    if digits.is_empty()
        || !digits
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }

    if let Ok(i) = s.parse::<i64>() {
        return Some(LuaValue::Integer(i));
    }
    s.parse::<f64>().ok().map(LuaValue::Number)
}

impl LuaValue {
    /// Numeric value with string coercion (`luaL_checknumber`).
    pub fn to_number(&self) -> Option<f64> {
        match self {
            LuaValue::Integer(i) => Some(*i as f64),
            LuaValue::Number(n) => Some(*n),
            LuaValue::String(s) => str_to_number(s).and_then(|v| v.as_number()),
            _ => None,
        }
    }

    /// Integer value with float and string coercion (`luaL_checkinteger`).
    /// Floats must have an exact integer representation.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            LuaValue::Integer(i) => Some(*i),
            LuaValue::Number(n) => float_to_integer(*n),
            LuaValue::String(s) => match str_to_number(s)? {
                LuaValue::Integer(i) => Some(i),
                LuaValue::Number(n) => float_to_integer(n),
                _ => None,
            },
            _ => None,
        }
    }

    /// Append the `tostring` rendering of this value to `buf`.
    pub fn write_lua_string(&self, buf: &mut Vec<u8>) {
        match self {
            LuaValue::Nil => buf.extend_from_slice(b"nil"),
            LuaValue::Boolean(true) => buf.extend_from_slice(b"true"),
            LuaValue::Boolean(false) => buf.extend_from_slice(b"false"),
            LuaValue::Integer(i) => {
                let mut itoa_buf = itoa::Buffer::new();
                buf.extend_from_slice(itoa_buf.format(*i).as_bytes());
            }
            LuaValue::Number(n) => buf.extend_from_slice(lua_float_to_string(*n).as_bytes()),
            LuaValue::String(s) => buf.extend_from_slice(s),
            LuaValue::Table(t) => buf.extend_from_slice(format!("{t:?}").as_bytes()),
            LuaValue::Function(f) => buf.extend_from_slice(format!("{f:?}").as_bytes()),
        }
    }

    /// `tostring` rendering as an owned byte string.
    pub fn to_lua_string(&self) -> Vec<u8> {
        match self {
            LuaValue::String(s) => s.to_vec(),
            other => {
                let mut buf = Vec::new();
                other.write_lua_string(&mut buf);
                buf
            }
        }
    }
}

// ==================== Rust → LuaValue ====================

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        LuaValue::Boolean(b)
    }
}

impl From<i64> for LuaValue {
    fn from(i: i64) -> Self {
        LuaValue::Integer(i)
    }
}

impl From<i32> for LuaValue {
    fn from(i: i32) -> Self {
        LuaValue::Integer(i as i64)
    }
}

impl From<f64> for LuaValue {
    fn from(n: f64) -> Self {
        LuaValue::Number(n)
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        LuaValue::String(Rc::from(s.as_bytes()))
    }
}

impl From<String> for LuaValue {
    fn from(s: String) -> Self {
        LuaValue::String(Rc::from(s.into_bytes()))
    }
}

impl From<&[u8]> for LuaValue {
    fn from(b: &[u8]) -> Self {
        LuaValue::String(Rc::from(b))
    }
}

impl From<Vec<u8>> for LuaValue {
    fn from(b: Vec<u8>) -> Self {
        LuaValue::String(Rc::from(b))
    }
}

impl From<LuaTable> for LuaValue {
    fn from(t: LuaTable) -> Self {
        LuaValue::Table(t)
    }
}

impl From<LuaFunction> for LuaValue {
    fn from(f: LuaFunction) -> Self {
        LuaValue::Function(f)
    }
}

impl<T: Into<LuaValue>> From<Option<T>> for LuaValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(LuaValue::Nil, Into::into)
    }
}
