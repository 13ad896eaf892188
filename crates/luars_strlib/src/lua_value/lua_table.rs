// Minimal Lua table: a shared hash map from keys to values.
// Used as the lookup source of gsub table replacements.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::lua_value::lua_convert::float_to_integer;
use crate::lua_value::{LuaString, LuaValue};
use crate::lua_vm::{LuaError, LuaResult};

/// Hashable form of a table key. Floats with an exact integer value are
/// stored as integers, so `t[1]` and `t[1.0]` address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    Boolean(bool),
    Integer(i64),
    Number(u64),
    String(LuaString),
    Ref(usize),
}

impl TableKey {
    /// Returns `None` for keys that can never be present (nil, NaN).
    pub fn from_value(value: &LuaValue) -> Option<TableKey> {
        match value {
            LuaValue::Nil => None,
            LuaValue::Boolean(b) => Some(TableKey::Boolean(*b)),
            LuaValue::Integer(i) => Some(TableKey::Integer(*i)),
            LuaValue::Number(n) if n.is_nan() => None,
            LuaValue::Number(n) => Some(match float_to_integer(*n) {
                Some(i) => TableKey::Integer(i),
                None => TableKey::Number(n.to_bits()),
            }),
            LuaValue::String(s) => Some(TableKey::String(s.clone())),
            LuaValue::Table(t) => Some(TableKey::Ref(t.as_ptr() as usize)),
            LuaValue::Function(f) => Some(TableKey::Ref(f.as_ptr() as usize)),
        }
    }
}

#[derive(Clone, Default)]
pub struct LuaTable {
    entries: Rc<RefCell<AHashMap<TableKey, LuaValue>>>,
}

impl LuaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Rc::new(RefCell::new(AHashMap::with_capacity(capacity))),
        }
    }

    /// Raw lookup; missing keys read as nil.
    pub fn get(&self, key: &LuaValue) -> LuaValue {
        match TableKey::from_value(key) {
            Some(k) => self.entries.borrow().get(&k).cloned().unwrap_or_default(),
            None => LuaValue::Nil,
        }
    }

    /// Raw assignment; assigning nil removes the entry.
    pub fn set(&self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        let Some(k) = TableKey::from_value(&key) else {
            let what = if key.is_nil() { "nil" } else { "NaN" };
            return Err(LuaError::Runtime(format!("table index is {what}")));
        };
        let mut entries = self.entries.borrow_mut();
        if value.is_nil() {
            entries.remove(&k);
        } else {
            entries.insert(k, value);
        }
        Ok(())
    }

    /// Border of the array part: the largest `n` such that `t[1..=n]` are all non-nil.
    pub fn len(&self) -> usize {
        let entries = self.entries.borrow();
        let mut n = 0;
        while entries.contains_key(&TableKey::Integer(n as i64 + 1)) {
            n += 1;
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &LuaTable) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.entries) as *const ()
    }
}

impl fmt::Debug for LuaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table: {:p}", self.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_keys_normalise() {
        let t = LuaTable::new();
        t.set(LuaValue::Number(1.0), "one".into()).unwrap();
        assert_eq!(t.get(&LuaValue::Integer(1)), "one".into());
        t.set(LuaValue::Number(1.5), "half".into()).unwrap();
        assert_eq!(t.get(&LuaValue::Number(1.5)), "half".into());
        assert!(t.get(&LuaValue::Integer(2)).is_nil());
    }

    #[test]
    fn test_border_and_removal() {
        let t = LuaTable::new();
        assert!(t.is_empty());
        for i in 1..=3 {
            t.set(LuaValue::Integer(i), LuaValue::Boolean(true)).unwrap();
        }
        assert_eq!(t.len(), 3);
        t.set(LuaValue::Integer(2), LuaValue::Nil).unwrap();
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_invalid_keys() {
        let t = LuaTable::new();
        assert_eq!(
            t.set(LuaValue::Nil, 1.into()).unwrap_err().to_string(),
            "table index is nil"
        );
        assert_eq!(
            t.set(LuaValue::Number(f64::NAN), 1.into()).unwrap_err().to_string(),
            "table index is NaN"
        );
        assert!(t.get(&LuaValue::Nil).is_nil());
    }

    #[test]
    fn test_reference_keys() {
        let t = LuaTable::new();
        let inner = LuaTable::new();
        t.set(inner.clone().into(), "found".into()).unwrap();
        assert_eq!(t.get(&inner.into()), "found".into());
        assert!(t.get(&LuaTable::new().into()).is_nil());
    }
}
