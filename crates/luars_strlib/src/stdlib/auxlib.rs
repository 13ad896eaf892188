// Argument checking helpers shared by library functions (luaL_check* family)

use std::rc::Rc;

use crate::lua_value::{LuaString, LuaValue};
use crate::lua_vm::{LuaError, LuaResult, LuaState};

/// Type name used in "X expected, got Y" messages; absent arguments read
/// as "no value".
pub fn arg_type_name(arg: Option<&LuaValue>) -> &'static str {
    arg.map_or("no value", LuaValue::type_name)
}

/// `bad argument #narg to 'func' (<expected> expected, got <type>)`
pub fn arg_typeerror(narg: usize, func: &str, expected: &str, arg: Option<&LuaValue>) -> LuaError {
    LuaError::argerror(
        narg,
        func,
        format!("{} expected, got {}", expected, arg_type_name(arg)),
    )
}

/// String argument; numbers are converted with `tostring`.
pub fn check_string(l: &LuaState, narg: usize, func: &str) -> LuaResult<LuaString> {
    let arg = l.get_arg(narg);
    match &arg {
        Some(LuaValue::String(s)) => Ok(s.clone()),
        Some(v @ (LuaValue::Integer(_) | LuaValue::Number(_))) => Ok(Rc::from(v.to_lua_string())),
        _ => Err(arg_typeerror(narg, func, "string", arg.as_ref())),
    }
}

/// Integer argument; floats and numeric strings must convert exactly.
pub fn check_integer(l: &LuaState, narg: usize, func: &str) -> LuaResult<i64> {
    let arg = l.get_arg(narg);
    value_to_integer(arg.as_ref(), narg, func)
}

/// Optional integer argument: `default` when absent or nil.
pub fn opt_integer(l: &LuaState, narg: usize, func: &str, default: i64) -> LuaResult<i64> {
    match l.get_arg(narg) {
        None | Some(LuaValue::Nil) => Ok(default),
        Some(v) => value_to_integer(Some(&v), narg, func),
    }
}

/// Mirrors luaL_checkinteger: a number without an integer representation is
/// reported differently from a value that is not a number at all.
pub(crate) fn value_to_integer(arg: Option<&LuaValue>, narg: usize, func: &str) -> LuaResult<i64> {
    let Some(v) = arg else {
        return Err(arg_typeerror(narg, func, "number", None));
    };
    if let Some(i) = v.to_integer() {
        return Ok(i);
    }
    if v.to_number().is_some() {
        return Err(LuaError::argerror(
            narg,
            func,
            "number has no integer representation",
        ));
    }
    Err(arg_typeerror(narg, func, "number", Some(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua_value::LuaFunction;

    /// Run `f` inside a call frame holding `args`.
    fn with_args<T: 'static>(
        args: Vec<LuaValue>,
        f: impl Fn(&LuaState) -> LuaResult<T> + 'static,
    ) -> LuaResult<T> {
        let slot = Rc::new(std::cell::RefCell::new(None));
        let out = slot.clone();
        let func = LuaFunction::closure(move |l| {
            *out.borrow_mut() = Some(f(l));
            Ok(0)
        });
        let mut state = LuaState::default();
        state.call(&func, args)?;
        let result = slot.borrow_mut().take();
        result.unwrap()
    }

    #[test]
    fn test_check_string_coerces_numbers() {
        let s = with_args(vec![LuaValue::integer(42)], |l| check_string(l, 1, "f")).unwrap();
        assert_eq!(&*s, b"42");
        let s = with_args(vec![LuaValue::number(1.5)], |l| check_string(l, 1, "f")).unwrap();
        assert_eq!(&*s, b"1.5");
    }

    #[test]
    fn test_check_string_type_error() {
        let err = with_args(vec![LuaValue::boolean(true)], |l| check_string(l, 1, "len"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad argument #1 to 'len' (string expected, got boolean)"
        );
        let err = with_args(vec![], |l| check_string(l, 1, "len")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad argument #1 to 'len' (string expected, got no value)"
        );
    }

    #[test]
    fn test_integer_arguments() {
        let integer = |v: LuaValue| with_args(vec![v], |l| check_integer(l, 1, "f"));
        assert_eq!(integer(LuaValue::number(3.0)).unwrap(), 3);
        assert_eq!(integer(LuaValue::string("7")).unwrap(), 7);
        let opt = with_args(vec![LuaValue::nil()], |l| opt_integer(l, 1, "f", 9));
        assert_eq!(opt.unwrap(), 9);

        let err = with_args(vec![LuaValue::number(3.5)], |l| check_integer(l, 1, "f")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad argument #1 to 'f' (number has no integer representation)"
        );
        let err = with_args(vec![LuaValue::string("x")], |l| check_integer(l, 2, "f")).unwrap_err();
        assert!(err.to_string().contains("number expected, got no value"));
    }
}
