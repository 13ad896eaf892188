// Host value model seen by the string library
pub mod lua_convert;
mod lua_table;
mod lua_value;

pub use lua_table::{LuaTable, TableKey};
pub use lua_value::{CFunction, LuaFunction, LuaString, LuaValue, RustClosure};
