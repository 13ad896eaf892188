// C printf numeric rendering for string.format
//
// Rust's formatting machinery differs from C in a few places:
// - `{:e}` prints `1.5e2`, C prints `1.5e+02`
// - there is no `%g`; it is rebuilt from `%e` and `%f`
// - infinities and NaN print as `inf` / `nan` (upper-cased for E and G)

use std::fmt::Write;

use super::format_spec::{FormatFlags, FormatSpec};
use crate::lua_vm::lua_limits::{DEFAULT_FLOAT_PRECISION, LUAI_NUMFFORMAT_DIGITS};

/// Append `prefix` and `body` to `out`, padded to the directive's width.
///
/// With `zero_pad` the zeros go between the prefix (sign, `0x`) and the body.
pub fn pad_into(out: &mut Vec<u8>, prefix: &[u8], body: &[u8], spec: &FormatSpec, zero_pad: bool) {
    let fill = spec.width.saturating_sub(prefix.len() + body.len());
    if spec.flags.contains(FormatFlags::LEFT) {
        out.extend_from_slice(prefix);
        out.extend_from_slice(body);
        out.resize(out.len() + fill, b' ');
    } else if zero_pad {
        out.extend_from_slice(prefix);
        out.resize(out.len() + fill, b'0');
        out.extend_from_slice(body);
    } else {
        out.resize(out.len() + fill, b' ');
        out.extend_from_slice(prefix);
        out.extend_from_slice(body);
    }
}

fn sign_prefix(negative: bool, flags: FormatFlags) -> &'static [u8] {
    if negative {
        b"-"
    } else if flags.contains(FormatFlags::PLUS) {
        b"+"
    } else if flags.contains(FormatFlags::SPACE) {
        b" "
    } else {
        b""
    }
}

/// Render an integer directive (`d i u o x X`) given sign and magnitude.
pub fn format_integer(out: &mut Vec<u8>, spec: &FormatSpec, negative: bool, magnitude: u64) {
    let conv = spec.conversion;
    let mut digits = match conv {
        b'o' => format!("{magnitude:o}").into_bytes(),
        b'x' => format!("{magnitude:x}").into_bytes(),
        b'X' => format!("{magnitude:X}").into_bytes(),
        _ => itoa::Buffer::new().format(magnitude).as_bytes().to_vec(),
    };

    if let Some(precision) = spec.precision {
        if precision == 0 && magnitude == 0 {
            digits.clear();
        }
        if digits.len() < precision {
            let mut padded = vec![b'0'; precision - digits.len()];
            padded.append(&mut digits);
            digits = padded;
        }
    }

    let mut prefix = Vec::with_capacity(3);
    if matches!(conv, b'd' | b'i') {
        prefix.extend_from_slice(sign_prefix(negative, spec.flags));
    }
    if spec.flags.contains(FormatFlags::ALT) {
        match conv {
            b'o' if digits.first() != Some(&b'0') => digits.insert(0, b'0'),
            b'x' if magnitude != 0 => prefix.extend_from_slice(b"0x"),
            b'X' if magnitude != 0 => prefix.extend_from_slice(b"0X"),
            _ => {}
        }
    }

    let zero_pad = spec.flags.contains(FormatFlags::ZERO)
        && !spec.flags.contains(FormatFlags::LEFT)
        && spec.precision.is_none();
    pad_into(out, &prefix, &digits, spec, zero_pad);
}

/// Render a float directive (`e E f g G`).
pub fn format_float(out: &mut Vec<u8>, spec: &FormatSpec, value: f64) {
    let conv = spec.conversion;
    let upper = conv.is_ascii_uppercase();
    let alt = spec.flags.contains(FormatFlags::ALT);
    let abs = value.abs();

    let body = if abs.is_nan() {
        (if upper { "NAN" } else { "nan" }).to_string()
    } else if abs.is_infinite() {
        (if upper { "INF" } else { "inf" }).to_string()
    } else {
        let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
        match conv.to_ascii_lowercase() {
            b'e' => exponential(abs, precision, alt, upper),
            b'g' => general(abs, precision, alt, upper),
            _ => fixed(abs, precision, alt),
        }
    };

    let prefix = sign_prefix(value.is_sign_negative(), spec.flags);
    let zero_pad = spec.flags.contains(FormatFlags::ZERO)
        && !spec.flags.contains(FormatFlags::LEFT)
        && abs.is_finite();
    pad_into(out, prefix, body.as_bytes(), spec, zero_pad);
}

/// `%.Nf` of a non-negative finite value.
fn fixed(abs: f64, precision: usize, alt: bool) -> String {
    let mut s = format!("{abs:.precision$}");
    if alt && precision == 0 {
        s.push('.');
    }
    s
}

/// `%.Ne` of a non-negative finite value, with a C-style exponent.
fn exponential(abs: f64, precision: usize, alt: bool, upper: bool) -> String {
    let raw = format!("{abs:.precision$e}");
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    let mut s = String::with_capacity(mantissa.len() + 5);
    s.push_str(mantissa);
    if alt && precision == 0 {
        s.push('.');
    }
    s.push(if upper { 'E' } else { 'e' });
    s.push(if exp < 0 { '-' } else { '+' });
    let _ = write!(s, "{:02}", exp.unsigned_abs());
    s
}

/// `%.Ng` of a non-negative finite value.
fn general(abs: f64, precision: usize, alt: bool, upper: bool) -> String {
    let p = precision.max(1);
    // exponent after rounding to p significant digits
    let x = if abs == 0.0 {
        0
    } else {
        let raw = format!("{abs:.prec$e}", prec = p - 1);
        raw.split_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0)
    };

    let s = if x >= -4 && x < p as i32 {
        fixed(abs, (p as i32 - 1 - x) as usize, alt)
    } else {
        exponential(abs, p - 1, alt, upper)
    };
    if alt { s } else { strip_trailing_zeros(s) }
}

fn strip_trailing_zeros(s: String) -> String {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => s.split_at(idx),
        None => (s.as_str(), ""),
    };
    if !mantissa.contains('.') {
        return s;
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    let mut result = String::with_capacity(trimmed.len() + exponent.len());
    result.push_str(trimmed);
    result.push_str(exponent);
    result
}

/// Float to string conversion used by `tostring` and `%s`.
///
/// `%.14g`, with `.0` appended when the result would read back as an integer.
pub fn lua_float_to_string(f: f64) -> String {
    if f.is_nan() {
        return if f.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut s = general(f.abs(), LUAI_NUMFFORMAT_DIGITS, false, false);
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.push_str(".0");
    }
    if f.is_sign_negative() {
        s.insert(0, '-');
    }
    s
}
