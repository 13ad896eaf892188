// Lua standard library subset: the string library and its argument helpers

pub mod auxlib;
pub mod string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stdlib {
    String,

    All,
}
