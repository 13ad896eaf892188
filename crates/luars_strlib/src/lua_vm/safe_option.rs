use crate::lua_vm::lua_limits::{MAX_CALL_DEPTH, MAX_STRING_SIZE, MAXCCALLS_PATTERN};

/// Runtime limits applied to every call made through a `LuaState`.
#[derive(Debug, Clone)]
pub struct SafeOption {
    /// Recursion ceiling of the pattern matcher. Exceeding it raises
    /// "pattern too complex" instead of growing the native stack.
    pub max_pattern_depth: usize,
    /// Maximum nesting of host calls (gsub replacement functions, gmatch
    /// iterators invoked from within other calls).
    pub max_call_depth: usize,
    /// Largest string the library will build.
    pub max_string_size: i64,
}

impl Default for SafeOption {
    fn default() -> Self {
        Self {
            max_pattern_depth: MAXCCALLS_PATTERN,
            max_call_depth: MAX_CALL_DEPTH,
            max_string_size: MAX_STRING_SIZE,
        }
    }
}
