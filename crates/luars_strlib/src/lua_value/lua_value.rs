use std::fmt;
use std::rc::Rc;

use crate::lua_value::LuaTable;
use crate::lua_vm::{LuaResult, LuaState};

/// Lua strings are immutable byte sequences, not UTF-8 text.
pub type LuaString = Rc<[u8]>;

/// Native function signature: reads arguments from the current frame,
/// pushes results and returns how many it pushed.
pub type CFunction = fn(&mut LuaState) -> LuaResult<usize>;

/// Boxed Rust closure with the same calling convention as `CFunction`.
pub type RustClosure = Rc<dyn Fn(&mut LuaState) -> LuaResult<usize>>;

/// A callable host value.
#[derive(Clone)]
pub enum LuaFunction {
    C(CFunction),
    Closure(RustClosure),
}

impl LuaFunction {
    pub fn closure(f: impl Fn(&mut LuaState) -> LuaResult<usize> + 'static) -> Self {
        LuaFunction::Closure(Rc::new(f))
    }

    /// Identity of the function, used for equality and `tostring`.
    pub fn as_ptr(&self) -> *const () {
        match self {
            LuaFunction::C(f) => *f as *const (),
            LuaFunction::Closure(rc) => Rc::as_ptr(rc) as *const (),
        }
    }
}

impl PartialEq for LuaFunction {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl fmt::Debug for LuaFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function: {:p}", self.as_ptr())
    }
}

/// A host value as seen by the string library.
#[derive(Clone, Default)]
pub enum LuaValue {
    #[default]
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(LuaString),
    Table(LuaTable),
    Function(LuaFunction),
}

impl LuaValue {
    #[inline]
    pub fn nil() -> Self {
        LuaValue::Nil
    }

    #[inline]
    pub fn boolean(b: bool) -> Self {
        LuaValue::Boolean(b)
    }

    #[inline]
    pub fn integer(i: i64) -> Self {
        LuaValue::Integer(i)
    }

    #[inline]
    pub fn number(n: f64) -> Self {
        LuaValue::Number(n)
    }

    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        LuaValue::String(Rc::from(bytes.as_ref()))
    }

    pub fn cfunction(f: CFunction) -> Self {
        LuaValue::Function(LuaFunction::C(f))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LuaValue::Nil => "nil",
            LuaValue::Boolean(_) => "boolean",
            LuaValue::Integer(_) | LuaValue::Number(_) => "number",
            LuaValue::String(_) => "string",
            LuaValue::Table(_) => "table",
            LuaValue::Function(_) => "function",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    /// Everything except `nil` and `false` is true.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LuaValue::Nil | LuaValue::Boolean(false))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            LuaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Strict integer view (no float or string conversion).
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LuaValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view without string coercion.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LuaValue::Integer(i) => Some(*i as f64),
            LuaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&LuaTable> {
        match self {
            LuaValue::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&LuaFunction> {
        match self {
            LuaValue::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LuaValue::Nil, LuaValue::Nil) => true,
            (LuaValue::Boolean(a), LuaValue::Boolean(b)) => a == b,
            (LuaValue::Integer(a), LuaValue::Integer(b)) => a == b,
            (LuaValue::Number(a), LuaValue::Number(b)) => a == b,
            (LuaValue::Integer(i), LuaValue::Number(n))
            | (LuaValue::Number(n), LuaValue::Integer(i)) => (*i as f64) == *n,
            (LuaValue::String(a), LuaValue::String(b)) => a == b,
            (LuaValue::Table(a), LuaValue::Table(b)) => a.ptr_eq(b),
            (LuaValue::Function(a), LuaValue::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for LuaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaValue::Nil => write!(f, "nil"),
            LuaValue::Boolean(b) => write!(f, "{b}"),
            LuaValue::Integer(i) => write!(f, "{i}"),
            LuaValue::Number(n) => write!(f, "{n:?}"),
            LuaValue::String(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            LuaValue::Table(t) => write!(f, "{t:?}"),
            LuaValue::Function(func) => write!(f, "{func:?}"),
        }
    }
}
