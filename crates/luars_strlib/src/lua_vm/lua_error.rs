use smol_str::SmolStr;

/// Errors raised by the string library.
///
/// Every error aborts the current call and travels back to the host through
/// `LuaResult`; `LuaState::pcall` turns it into a `(false, message)` pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LuaError {
    /// Malformed pattern or replacement string
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// Bad argument or malformed format directive
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// Error raised by a host callable, or host call depth exhausted
    #[error("{0}")]
    Runtime(String),
}

/// Pattern syntax and matching errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("malformed pattern (ends with '%')")]
    EndsWithPercent,
    #[error("malformed pattern (missing ']')")]
    MissingBracket,
    #[error("malformed pattern (missing arguments to '%b')")]
    MissingBalanceArgs,
    #[error("missing '[' after '%f' in pattern")]
    MissingFrontierBracket,
    #[error("invalid capture index %{0}")]
    InvalidCaptureIndex(usize),
    #[error("invalid pattern capture")]
    InvalidPatternCapture,
    #[error("unfinished capture")]
    UnfinishedCapture,
    #[error("too many captures")]
    TooManyCaptures,
    #[error("pattern too complex")]
    TooComplex,
    #[error("invalid use of '%' in replacement string")]
    InvalidReplacement,
}

/// Argument checking and format directive errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("bad argument #{narg} to '{func}' ({msg})")]
    BadArgument {
        narg: usize,
        func: SmolStr,
        msg: String,
    },
    #[error("invalid format (repeated flags)")]
    RepeatedFlags,
    #[error("invalid format (width or precision too long)")]
    WidthOrPrecisionTooLong,
    #[error("invalid option '%{0}' to 'format'")]
    InvalidOption(String),
    #[error("invalid replacement value (a {0})")]
    InvalidReplacementValue(&'static str),
    #[error("resulting string too large")]
    StringTooLarge,
}

impl ArgumentError {
    pub fn bad_argument(narg: usize, func: &str, msg: impl Into<String>) -> Self {
        ArgumentError::BadArgument {
            narg,
            func: SmolStr::new(func),
            msg: msg.into(),
        }
    }
}

impl LuaError {
    /// Shorthand for `bad argument #narg to 'func' (msg)`.
    pub fn argerror(narg: usize, func: &str, msg: impl Into<String>) -> Self {
        LuaError::Argument(ArgumentError::bad_argument(narg, func, msg))
    }

    pub fn is_pattern_error(&self) -> bool {
        matches!(self, LuaError::Pattern(_))
    }

    pub fn is_argument_error(&self) -> bool {
        matches!(self, LuaError::Argument(_))
    }
}
