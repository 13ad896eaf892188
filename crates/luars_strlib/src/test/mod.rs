pub mod test_gsub;
pub mod test_string;

use crate::*;

/// Call `string.<name>` through the standard registry.
pub(crate) fn call(name: &str, args: Vec<LuaValue>) -> LuaResult<Vec<LuaValue>> {
    let mut state = LuaState::new(SafeOption::default());
    call_in(&mut state, name, args)
}

pub(crate) fn call_in(
    state: &mut LuaState,
    name: &str,
    args: Vec<LuaValue>,
) -> LuaResult<Vec<LuaValue>> {
    let registry = create_standard_registry();
    let func = registry
        .get_function("string", name)
        .unwrap_or_else(|| panic!("string.{name} is not registered"));
    state.call(&func, args)
}

/// Text of a string result.
pub(crate) fn text(value: &LuaValue) -> String {
    let bytes = value
        .as_bytes()
        .unwrap_or_else(|| panic!("expected a string, got {value:?}"));
    String::from_utf8_lossy(bytes).into_owned()
}

/// Error message of a failing call.
pub(crate) fn error_of(result: LuaResult<Vec<LuaValue>>) -> String {
    match result {
        Ok(values) => panic!("expected an error, got {values:?}"),
        Err(e) => e.to_string(),
    }
}
