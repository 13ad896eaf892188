//! Centralized string library limits and configuration constants.
//!
//! Mirrors the limits of the reference Lua interpreter.
//! All magic numbers that control matching and formatting are collected here
//! for easy tuning and configuration.

// ===== Calls =====

/// Default maximum nesting of host calls (e.g. gsub replacement functions
/// that call back into the string library).
pub const MAX_CALL_DEPTH: usize = 200;

// ===== Strings =====

/// Largest string the library will build (`rep`, `gsub` results).
pub const MAX_STRING_SIZE: i64 = 0x7FFF_FFFF;

// ===== Pattern Matching =====

/// Maximum number of captures in a pattern.
/// Matches Lua's LUA_MAXCAPTURES.
pub const LUA_MAXCAPTURES: usize = 32;

/// Maximum recursion depth of the pattern matcher.
/// Matches Lua's MAXCCALLS.
pub const MAXCCALLS_PATTERN: usize = 200;

/// Bytes that make a pattern "special"; a pattern without any of them can be
/// searched for as a plain substring.
pub const PATTERN_SPECIALS: &[u8] = b"^$*+?.([%-";

// ===== Format =====

/// Valid flag bytes of a format directive.
pub const FORMAT_FLAGS: &[u8] = b"-+ #0";

/// Maximum number of digits in a width or precision.
pub const MAX_FORMAT_DIGITS: usize = 2;

/// `%s` arguments at least this long with no precision are copied verbatim.
pub const MAX_ITEM_LONG_STRING: usize = 100;

/// Default precision for `%e`, `%f` and `%g`.
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Significant digits used when converting floats to strings (`%.14g`).
pub const LUAI_NUMFFORMAT_DIGITS: usize = 14;
