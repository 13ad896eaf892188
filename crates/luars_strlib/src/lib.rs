// Lua string library core
// Pattern matching (find, match, gmatch, gsub) and string.format over byte
// strings, with a minimal host value model and calling convention

#[cfg(test)]
mod test;

pub mod lib_registry;
pub mod lua_value;
pub mod lua_vm;
pub mod stdlib;

pub use lib_registry::{LibraryRegistry, create_standard_registry};
pub use lua_value::{LuaFunction, LuaTable, LuaValue};
pub use lua_vm::{ArgumentError, LuaError, LuaResult, LuaState, PatternError, SafeOption};
pub use stdlib::Stdlib;
pub use stdlib::string::pattern::{GMatch, Match, PatternMatcher};
pub use stdlib::string::relative_position;
pub use stdlib::string::string_format::format;
