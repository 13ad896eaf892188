// Host-side runtime pieces the string library needs: errors, limits,
// options and the call convention
mod lua_error;
pub mod lua_limits;
mod lua_state;
mod safe_option;

pub use lua_error::{ArgumentError, LuaError, PatternError};
pub use lua_state::LuaState;
pub use safe_option::SafeOption;

pub type LuaResult<T> = Result<T, LuaError>;
