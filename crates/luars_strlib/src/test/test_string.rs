// Tests for the byte helpers and library registration
use super::{call, error_of, text};
use crate::*;

fn one(name: &str, args: Vec<LuaValue>) -> String {
    let r = call(name, args).unwrap();
    text(&r[0])
}

#[test]
fn test_string_len() {
    assert_eq!(call("len", vec!["hello".into()]).unwrap(), vec![LuaValue::integer(5)]);
    assert_eq!(call("len", vec!["".into()]).unwrap(), vec![LuaValue::integer(0)]);
    assert_eq!(call("len", vec![123.into()]).unwrap(), vec![LuaValue::integer(3)]);
    assert_eq!(
        error_of(call("len", vec![true.into()])),
        "bad argument #1 to 'len' (string expected, got boolean)"
    );
}

#[test]
fn test_string_sub() {
    assert_eq!(one("sub", vec!["hello".into(), 2.into(), 4.into()]), "ell");
    assert_eq!(one("sub", vec!["hello".into(), 2.into()]), "ello");
    assert_eq!(one("sub", vec!["hello".into(), (-2).into()]), "lo");
    assert_eq!(one("sub", vec!["hello".into(), 0.into()]), "hello");
    assert_eq!(one("sub", vec!["hello".into(), 10.into()]), "");
    assert_eq!(one("sub", vec!["hello".into(), (-100).into(), 2.into()]), "he");
    assert_eq!(one("sub", vec!["hello".into(), 3.into(), 2.into()]), "");
    assert_eq!(
        error_of(call("sub", vec!["hello".into()])),
        "bad argument #2 to 'sub' (number expected, got no value)"
    );
}

#[test]
fn test_string_upper_lower() {
    assert_eq!(one("upper", vec!["hello".into()]), "HELLO");
    assert_eq!(one("lower", vec!["WORLD".into()]), "world");
    // bytes outside ASCII are left alone
    let r = call("upper", vec![LuaValue::string(b"a\xe9b")]).unwrap();
    assert_eq!(r[0].as_bytes(), Some(&b"A\xe9B"[..]));
}

#[test]
fn test_string_rep() {
    assert_eq!(one("rep", vec!["ab".into(), 3.into()]), "ababab");
    assert_eq!(one("rep", vec!["x".into(), 0.into()]), "");
    assert_eq!(one("rep", vec!["x".into(), (-1).into()]), "");
    assert_eq!(one("rep", vec!["ab".into(), 3.into(), ",".into()]), "ab,ab,ab");
    assert_eq!(
        error_of(call("rep", vec!["x".into(), LuaValue::integer(1 << 40)])),
        "resulting string too large"
    );
    assert_eq!(
        error_of(call("rep", vec!["x".into()])),
        "bad argument #2 to 'rep' (number expected, got no value)"
    );
}

#[test]
fn test_string_reverse() {
    assert_eq!(one("reverse", vec!["abc".into()]), "cba");
    assert_eq!(one("reverse", vec!["".into()]), "");
}

#[test]
fn test_string_byte_char() {
    assert_eq!(
        call("byte", vec!["ABC".into()]).unwrap(),
        vec![LuaValue::integer(65)]
    );
    assert_eq!(
        call("byte", vec!["ABC".into(), 1.into(), (-1).into()]).unwrap(),
        [65, 66, 67].map(LuaValue::integer).to_vec()
    );
    assert!(call("byte", vec!["ABC".into(), 10.into()]).unwrap().is_empty());
    assert!(call("byte", vec!["".into()]).unwrap().is_empty());

    assert_eq!(one("char", vec![72.into(), 105.into()]), "Hi");
    assert_eq!(one("char", vec![]), "");
    assert_eq!(
        error_of(call("char", vec![65.into(), 256.into()])),
        "bad argument #2 to 'char' (value out of range)"
    );
}

#[test]
fn test_registry() {
    let registry = create_standard_registry();
    let module = registry.get_module("string").unwrap();
    assert_eq!(module.name, "string");
    assert_eq!(module.entries.len(), 13);
    assert!(registry.get_function("string", "gsub").is_some());
    assert!(registry.get_function("string", "dump").is_none());
    assert!(registry.get_function("os", "time").is_none());

    let table = registry.load_module("string").unwrap().unwrap();
    assert!(matches!(table.get(&"find".into()), LuaValue::Function(_)));
    assert!(table.get(&"nope".into()).is_nil());
    assert!(registry.load_module("nope").unwrap().is_none());

    let mut empty = LibraryRegistry::new();
    assert!(empty.get_module("string").is_none());
    empty.open(Stdlib::String);
    assert!(empty.get_module("string").is_some());
}

#[test]
fn test_custom_module() {
    fn answer(l: &mut LuaState) -> LuaResult<usize> {
        l.push_value(LuaValue::integer(42))?;
        Ok(1)
    }

    let mut registry = LibraryRegistry::new();
    registry.register(lib_registry::LibraryModule::new("extra").with_function("answer", answer));
    let func = LuaValue::from(registry.get_function("extra", "answer").unwrap());
    let mut state = LuaState::default();
    assert_eq!(
        state.call_value(&func, vec![]).unwrap(),
        vec![LuaValue::integer(42)]
    );
}

#[test]
fn test_pcall() {
    let registry = create_standard_registry();
    let find = LuaValue::from(registry.get_function("string", "find").unwrap());
    let mut state = LuaState::default();

    let (ok, values) = state.pcall(&find, vec!["abc".into(), "[".into()]);
    assert!(!ok);
    assert_eq!(text(&values[0]), "malformed pattern (missing ']')");

    let (ok, values) = state.pcall(&find, vec!["abc".into(), "c".into()]);
    assert!(ok);
    assert_eq!(values, vec![LuaValue::integer(3), LuaValue::integer(3)]);

    let (ok, values) = state.pcall(&LuaValue::nil(), vec![]);
    assert!(!ok);
    assert_eq!(text(&values[0]), "attempt to call a nil value");
}
