use crate::lua_value::{LuaFunction, LuaValue};
use crate::lua_vm::{LuaError, LuaResult, SafeOption};

/// Arguments and results of one active call.
#[derive(Default)]
struct CallFrame {
    args: Vec<LuaValue>,
    results: Vec<LuaValue>,
}

/// Calling convention shared by every library function: arguments are read
/// by 1-based index from the current frame, results are pushed onto it, and
/// the function reports how many values it pushed.
pub struct LuaState {
    safe_option: SafeOption,
    frames: Vec<CallFrame>,
}

impl LuaState {
    pub fn new(safe_option: SafeOption) -> Self {
        Self {
            safe_option,
            frames: Vec::new(),
        }
    }

    pub fn safe_option(&self) -> &SafeOption {
        &self.safe_option
    }

    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    // ===== Function Argument Access =====

    /// Get a specific argument (1-based index, Lua convention).
    /// Returns None if the argument was not passed.
    pub fn get_arg(&self, index: usize) -> Option<LuaValue> {
        if index == 0 {
            return None;
        }
        self.frames.last()?.args.get(index - 1).cloned()
    }

    /// Get all arguments of the current call
    pub fn get_args(&self) -> Vec<LuaValue> {
        self.frames
            .last()
            .map(|frame| frame.args.clone())
            .unwrap_or_default()
    }

    /// Number of arguments passed to the current call
    pub fn arg_count(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.args.len())
    }

    pub fn push_value(&mut self, value: LuaValue) -> LuaResult<()> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.results.push(value);
                Ok(())
            }
            None => Err(LuaError::Runtime("no active call frame".to_string())),
        }
    }

    // ===== Calls =====

    /// Call `func` with `args` in a fresh frame and collect its results.
    pub fn call(&mut self, func: &LuaFunction, args: Vec<LuaValue>) -> LuaResult<Vec<LuaValue>> {
        if self.frames.len() >= self.safe_option.max_call_depth {
            return Err(LuaError::Runtime("stack overflow".to_string()));
        }

        self.frames.push(CallFrame {
            args,
            results: Vec::new(),
        });
        let outcome = match func {
            LuaFunction::C(f) => f(self),
            LuaFunction::Closure(f) => f(self),
        };
        // The frame is popped on both paths so an error leaves the state usable
        let frame = self.frames.pop().unwrap_or_default();
        let nresults = outcome?;

        let mut results = frame.results;
        let first = results.len().saturating_sub(nresults);
        Ok(results.split_off(first))
    }

    /// Call any value; non-functions raise the usual "attempt to call" error.
    pub fn call_value(&mut self, func: &LuaValue, args: Vec<LuaValue>) -> LuaResult<Vec<LuaValue>> {
        match func {
            LuaValue::Function(f) => self.call(f, args),
            other => Err(LuaError::Runtime(format!(
                "attempt to call a {} value",
                other.type_name()
            ))),
        }
    }

    /// Protected call: errors become `(false, [message])`.
    pub fn pcall(&mut self, func: &LuaValue, args: Vec<LuaValue>) -> (bool, Vec<LuaValue>) {
        match self.call_value(func, args) {
            Ok(results) => (true, results),
            Err(e) => (false, vec![LuaValue::from(e.to_string())]),
        }
    }
}

impl Default for LuaState {
    fn default() -> Self {
        Self::new(SafeOption::default())
    }
}
