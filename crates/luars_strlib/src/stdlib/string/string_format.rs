use std::io::Write as IoWrite;

use super::format_spec::{FormatSpec, parse_format_spec};
use super::printf::{format_float, format_integer, pad_into};
use crate::lua_value::LuaValue;
use crate::lua_value::lua_convert::{float_to_integer, str_to_number};
use crate::lua_vm::lua_limits::MAX_ITEM_LONG_STRING;
use crate::lua_vm::{ArgumentError, LuaError, LuaResult, LuaState};
use crate::stdlib::auxlib::{arg_typeerror, check_string, value_to_integer};

const FUNC: &str = "format";

/// string.format(formatstring, ...)
pub fn string_format(l: &mut LuaState) -> LuaResult<usize> {
    let fmt = check_string(l, 1, FUNC)?;
    let args = l.get_args();
    let result = format(&fmt, args.get(1..).unwrap_or_default())?;
    l.push_value(LuaValue::string(result))?;
    Ok(1)
}

/// Interpret `fmt` against `args`.
///
/// `args[0]` is reported as argument #2 in errors, matching the host call
/// where the format string itself is argument #1.
pub fn format(fmt: &[u8], args: &[LuaValue]) -> LuaResult<Vec<u8>> {
    let mut out = Vec::with_capacity(fmt.len() + fmt.len() / 2);
    let mut next_arg = 0;
    let mut i = 0;

    while i < fmt.len() {
        let run = fmt[i..]
            .iter()
            .position(|&b| b == b'%')
            .unwrap_or(fmt.len() - i);
        out.extend_from_slice(&fmt[i..i + run]);
        i += run;
        if i >= fmt.len() {
            break;
        }

        i += 1;
        if fmt.get(i) == Some(&b'%') {
            out.push(b'%');
            i += 1;
            continue;
        }

        let narg = next_arg + 2;
        let arg = args
            .get(next_arg)
            .ok_or_else(|| LuaError::argerror(narg, FUNC, "no value"))?;
        next_arg += 1;

        let (spec, next) = parse_format_spec(fmt, i)?;
        format_directive(&mut out, &spec, &fmt[i..next], arg, narg)?;
        i = next;
    }

    Ok(out)
}

fn format_directive(
    out: &mut Vec<u8>,
    spec: &FormatSpec,
    directive: &[u8],
    arg: &LuaValue,
    narg: usize,
) -> LuaResult<()> {
    match spec.conversion {
        b'c' => {
            let code = value_to_integer(Some(arg), narg, FUNC)?;
            pad_into(out, b"", &[code as u8], spec, false);
        }
        b'd' | b'i' => {
            let n = signed_arg(arg, narg)?;
            format_integer(out, spec, n < 0, n.unsigned_abs());
        }
        b'u' | b'o' | b'x' | b'X' => {
            let n = unsigned_arg(arg, narg)?;
            format_integer(out, spec, false, n);
        }
        b'e' | b'E' | b'f' | b'g' | b'G' => {
            let n = arg
                .to_number()
                .ok_or_else(|| arg_typeerror(narg, FUNC, "number", Some(arg)))?;
            format_float(out, spec, n);
        }
        b'q' => match arg {
            LuaValue::String(s) => add_quoted(out, s),
            LuaValue::Integer(_) | LuaValue::Number(_) => add_quoted(out, &arg.to_lua_string()),
            _ => return Err(arg_typeerror(narg, FUNC, "string", Some(arg))),
        },
        b's' => {
            let s = arg.to_lua_string();
            match spec.precision {
                None if s.len() >= MAX_ITEM_LONG_STRING => out.extend_from_slice(&s),
                None => pad_into(out, b"", &s, spec, false),
                Some(p) => pad_into(out, b"", &s[..p.min(s.len())], spec, false),
            }
        }
        _ => {
            return Err(ArgumentError::InvalidOption(
                String::from_utf8_lossy(directive).into_owned(),
            )
            .into());
        }
    }
    Ok(())
}

/// Numeric view of a format argument, with string coercion.
fn numeric_arg(arg: &LuaValue, narg: usize) -> LuaResult<LuaValue> {
    let n = match arg {
        LuaValue::Integer(_) | LuaValue::Number(_) => Some(arg.clone()),
        LuaValue::String(s) => str_to_number(s),
        _ => None,
    };
    n.ok_or_else(|| arg_typeerror(narg, FUNC, "number", Some(arg)))
}

fn signed_arg(arg: &LuaValue, narg: usize) -> LuaResult<i64> {
    let n = numeric_arg(arg, narg)?;
    n.as_integer()
        .or_else(|| n.as_number().and_then(float_to_integer))
        .ok_or_else(|| LuaError::argerror(narg, FUNC, "not a number in proper range"))
}

fn unsigned_arg(arg: &LuaValue, narg: usize) -> LuaResult<u64> {
    // 2^64, the first float past u64::MAX
    const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;
    let n = match numeric_arg(arg, narg)? {
        LuaValue::Integer(i) => u64::try_from(i).ok(),
        LuaValue::Number(f) if f >= 0.0 && f.fract() == 0.0 && f < U64_LIMIT => Some(f as u64),
        _ => None,
    };
    n.ok_or_else(|| LuaError::argerror(narg, FUNC, "not a non-negative number in proper range"))
}

/// `%q`: a double-quoted string that reads back as the same bytes.
fn add_quoted(out: &mut Vec<u8>, s: &[u8]) {
    out.push(b'"');
    for (idx, &b) in s.iter().enumerate() {
        match b {
            b'"' | b'\\' | b'\n' => {
                out.push(b'\\');
                out.push(b);
            }
            _ if b.is_ascii_control() => {
                // a following digit would be read as part of the escape
                if s.get(idx + 1).is_some_and(u8::is_ascii_digit) {
                    let _ = write!(out, "\\{b:03}");
                } else {
                    let _ = write!(out, "\\{b}");
                }
            }
            _ => out.push(b),
        }
    }
    out.push(b'"');
}
