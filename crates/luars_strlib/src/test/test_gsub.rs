// Tests for string.gsub
use super::{call, call_in, error_of, text};
use crate::stdlib::string::pattern;
use crate::*;

fn gsub(args: Vec<LuaValue>) -> (String, i64) {
    let r = call("gsub", args).unwrap();
    assert_eq!(r.len(), 2);
    let count = r[1].as_integer().unwrap_or_else(|| panic!("count is {:?}", r[1]));
    (text(&r[0]), count)
}

fn pair(s: &str, n: i64) -> (String, i64) {
    (s.to_string(), n)
}

#[test]
fn test_gsub_template() {
    assert_eq!(
        gsub(vec!["hello world".into(), "o".into(), "0".into()]),
        pair("hell0 w0rld", 2)
    );
    assert_eq!(
        gsub(vec!["hello world".into(), "(%w+)".into(), "<%1>".into()]),
        pair("<hello> <world>", 2)
    );
    assert_eq!(
        gsub(vec!["abc".into(), "%w".into(), "%0%0".into()]),
        pair("aabbcc", 3)
    );
    assert_eq!(
        gsub(vec!["abc".into(), "b".into(), "%%".into()]),
        pair("a%c", 1)
    );
    // %1 without captures is the whole match
    assert_eq!(
        gsub(vec!["abc".into(), "b".into(), "[%1]".into()]),
        pair("a[b]c", 1)
    );
    // position captures render as integers
    assert_eq!(
        gsub(vec!["abc".into(), "()b".into(), "%1".into()]),
        pair("a2c", 1)
    );
    // numbers are used as their string form
    assert_eq!(
        gsub(vec!["abc".into(), "b".into(), 5.into()]),
        pair("a5c", 1)
    );
}

#[test]
fn test_gsub_max_count() {
    assert_eq!(
        gsub(vec!["hello".into(), "l".into(), "L".into(), 1.into()]),
        pair("heLlo", 1)
    );
    // "l+" is greedy, so its single match covers both l's
    assert_eq!(
        gsub(vec!["hello".into(), "l+".into(), "L".into(), 1.into()]),
        pair("heLo", 1)
    );
    assert_eq!(
        gsub(vec!["aaa".into(), "a".into(), "b".into(), 0.into()]),
        pair("aaa", 0)
    );
    assert_eq!(
        gsub(vec!["aaa".into(), "a".into(), "b".into(), (-1).into()]),
        pair("aaa", 0)
    );
}

#[test]
fn test_gsub_empty_matches() {
    assert_eq!(
        gsub(vec!["abc".into(), "".into(), "-".into()]),
        pair("-a-b-c-", 4)
    );
    assert_eq!(
        gsub(vec!["hello world".into(), "x*".into(), "-".into()]),
        pair("-h-e-l-l-o- -w-o-r-l-d-", 12)
    );
    assert_eq!(gsub(vec!["".into(), "".into(), "x".into()]), pair("x", 1));
}

#[test]
fn test_gsub_anchored() {
    assert_eq!(
        gsub(vec!["hello world".into(), "^h".into(), "H".into()]),
        pair("Hello world", 1)
    );
    assert_eq!(
        gsub(vec!["hello".into(), "^l".into(), "L".into()]),
        pair("hello", 0)
    );
    assert_eq!(
        gsub(vec!["aaa".into(), "^a".into(), "b".into()]),
        pair("baa", 1)
    );
}

#[test]
fn test_gsub_table() {
    let vars = LuaTable::new();
    vars.set("name".into(), "bob".into()).unwrap();
    vars.set("age".into(), 3.into()).unwrap();
    assert_eq!(
        gsub(vec![
            "$name is $age".into(),
            "%$(%w+)".into(),
            vars.clone().into()
        ]),
        pair("bob is 3", 2)
    );

    // missing keys keep the original text but still count
    assert_eq!(
        gsub(vec!["$name $x".into(), "%$(%w+)".into(), vars.into()]),
        pair("bob $x", 2)
    );

    // a table value that is not a string or number
    let bad = LuaTable::new();
    bad.set("k".into(), LuaTable::new().into()).unwrap();
    let err = error_of(call("gsub", vec!["k".into(), "%w".into(), bad.into()]));
    assert_eq!(err, "invalid replacement value (a table)");
}

#[test]
fn test_gsub_function() {
    let shout = LuaFunction::closure(|l| {
        let s = l.get_arg(1).and_then(|v| v.as_bytes().map(<[u8]>::to_ascii_uppercase));
        let mut out = s.unwrap_or_default();
        out.push(b'!');
        l.push_value(LuaValue::string(out))?;
        Ok(1)
    });
    assert_eq!(
        gsub(vec!["abc".into(), "%w".into(), shout.into()]),
        pair("A!B!C!", 3)
    );

    // nil and false keep the match; captures are passed as arguments
    let pick = LuaFunction::closure(|l| {
        let value = match l.get_arg(1).and_then(|v| v.as_bytes().map(<[u8]>::to_vec)) {
            Some(k) if k == b"x" => LuaValue::nil(),
            Some(k) if k == b"y" => LuaValue::boolean(false),
            _ => LuaValue::integer(l.arg_count() as i64),
        };
        l.push_value(value)?;
        Ok(1)
    });
    assert_eq!(
        gsub(vec!["x y (a)(b)".into(), "(%w)".into(), pick.into()]),
        pair("x y (1)(1)", 4)
    );

    // a position capture arrives as an integer
    let double = LuaFunction::closure(|l| {
        let p = l.get_arg(1).and_then(|v| v.as_integer()).unwrap_or(0);
        l.push_value(LuaValue::integer(p * 10))?;
        Ok(1)
    });
    assert_eq!(
        gsub(vec!["abc".into(), "()b".into(), double.into()]),
        pair("a20c", 1)
    );

    // returning nothing behaves like nil
    let silent = LuaFunction::closure(|_| Ok(0));
    assert_eq!(
        gsub(vec!["abc".into(), "b".into(), silent.into()]),
        pair("abc", 1)
    );
}

#[test]
fn test_gsub_function_errors() {
    let truthy = LuaFunction::closure(|l| {
        l.push_value(LuaValue::boolean(true))?;
        Ok(1)
    });
    let err = error_of(call("gsub", vec!["abc".into(), "b".into(), truthy.into()]));
    assert_eq!(err, "invalid replacement value (a boolean)");

    let failing = LuaFunction::closure(|_| Err(LuaError::Runtime("boom".to_string())));
    let err = error_of(call("gsub", vec!["abc".into(), "b".into(), failing.into()]));
    assert_eq!(err, "boom");

    // the replacement function runs one call level deeper
    let mut state = LuaState::new(SafeOption {
        max_call_depth: 1,
        ..SafeOption::default()
    });
    let noop = LuaFunction::closure(|_| Ok(0));
    let err = call_in(&mut state, "gsub", vec!["abc".into(), "b".into(), noop.into()]);
    assert_eq!(error_of(err), "stack overflow");
    assert_eq!(state.call_depth(), 0);
}

#[test]
fn test_gsub_errors() {
    let err = |repl: LuaValue| error_of(call("gsub", vec!["abc".into(), "(b)".into(), repl]));
    assert_eq!(err("%2".into()), "invalid capture index %2");
    assert_eq!(err("%x".into()), "invalid use of '%' in replacement string");
    assert_eq!(err("50%".into()), "invalid use of '%' in replacement string");
    assert_eq!(
        err(true.into()),
        "bad argument #3 to 'gsub' (string/function/table expected, got boolean)"
    );
    assert_eq!(
        err(LuaValue::nil()),
        "bad argument #3 to 'gsub' (string/function/table expected, got nil)"
    );
    assert_eq!(
        error_of(call("gsub", vec!["abc".into(), "b".into()])),
        "bad argument #3 to 'gsub' (string/function/table expected, got no value)"
    );

    // a replacement error only surfaces once something matches
    assert_eq!(
        gsub(vec!["abc".into(), "z".into(), "%9".into()]),
        pair("abc", 0)
    );
}

#[test]
fn test_gsub_driver() {
    let (out, n) = pattern::gsub(b"a-b-c", b"-", usize::MAX, 200, |m, out| {
        out.extend_from_slice(b"+");
        assert_eq!(m.end - m.start, 1);
        Ok(())
    })
    .unwrap();
    assert_eq!((out.as_slice(), n), (&b"a+b+c"[..], 2));

    let src = b"key=val";
    let mut out = Vec::new();
    let m = pattern::find(src, b"(%w+)=(%w+)", 0, 200).unwrap().unwrap();
    pattern::expand_template(b"%2=%1 (%0)", &m, src, &mut out).unwrap();
    assert_eq!(out, b"val=key (key=val)");
}
