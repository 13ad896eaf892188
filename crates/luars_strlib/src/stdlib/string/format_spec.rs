// Parser for a single `%[flags][width][.precision]conv` directive

use bitflags::bitflags;

use crate::lua_vm::ArgumentError;
use crate::lua_vm::lua_limits::{FORMAT_FLAGS, MAX_FORMAT_DIGITS};

bitflags! {
    /// printf flags accepted in a directive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FormatFlags: u8 {
        /// `-` left-justify
        const LEFT = 1 << 0;
        /// `+` always print a sign
        const PLUS = 1 << 1;
        /// ` ` space in place of a plus sign
        const SPACE = 1 << 2;
        /// `#` alternate form
        const ALT = 1 << 3;
        /// `0` pad with zeros
        const ZERO = 1 << 4;
    }
}

impl FormatFlags {
    fn from_byte(b: u8) -> Self {
        match b {
            b'-' => FormatFlags::LEFT,
            b'+' => FormatFlags::PLUS,
            b' ' => FormatFlags::SPACE,
            b'#' => FormatFlags::ALT,
            b'0' => FormatFlags::ZERO,
            _ => FormatFlags::empty(),
        }
    }
}

/// One parsed conversion directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    /// Minimum field width; 0 when absent
    pub width: usize,
    /// `None` when no `.` was given; `.` alone means precision 0
    pub precision: Option<usize>,
    pub conversion: u8,
}

/// Parse the directive whose body starts at `fmt[pos]` (just past the `%`).
///
/// Returns the directive and the index just past its conversion byte.
pub fn parse_format_spec(fmt: &[u8], pos: usize) -> Result<(FormatSpec, usize), ArgumentError> {
    let rest = &fmt[pos.min(fmt.len())..];

    let mut i = 0;
    let mut flags = FormatFlags::empty();
    while i < rest.len() && FORMAT_FLAGS.contains(&rest[i]) {
        flags |= FormatFlags::from_byte(rest[i]);
        i += 1;
    }
    if i > FORMAT_FLAGS.len() {
        return Err(ArgumentError::RepeatedFlags);
    }

    let (width, next) = scan_digits(rest, i);
    i = next;

    let mut precision = None;
    if rest.get(i) == Some(&b'.') {
        let (digits, next) = scan_digits(rest, i + 1);
        precision = Some(digits);
        i = next;
    }

    if rest.get(i).is_some_and(u8::is_ascii_digit) {
        return Err(ArgumentError::WidthOrPrecisionTooLong);
    }

    let Some(&conversion) = rest.get(i) else {
        return Err(ArgumentError::InvalidOption(
            String::from_utf8_lossy(rest).into_owned(),
        ));
    };

    Ok((
        FormatSpec {
            flags,
            width,
            precision,
            conversion,
        },
        pos + i + 1,
    ))
}

/// Read at most `MAX_FORMAT_DIGITS` decimal digits starting at `start`.
fn scan_digits(bytes: &[u8], start: usize) -> (usize, usize) {
    let mut value = 0;
    let mut i = start;
    while i < bytes.len() && i - start < MAX_FORMAT_DIGITS && bytes[i].is_ascii_digit() {
        value = value * 10 + (bytes[i] - b'0') as usize;
        i += 1;
    }
    (value, i)
}
