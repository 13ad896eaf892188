// Library registration system
// Groups Rust functions into named Lua libraries that a host can look up or
// load as tables

use crate::lua_value::{CFunction, LuaFunction, LuaTable, LuaValue};
use crate::lua_vm::LuaResult;
use crate::stdlib::{self, Stdlib};

/// Entry in a library module
pub enum LibraryEntry {
    Function(CFunction),
}

/// A library module containing multiple functions
pub struct LibraryModule {
    pub name: &'static str,
    pub entries: Vec<(&'static str, LibraryEntry)>,
}

impl LibraryModule {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Add a function to this library
    pub fn with_function(mut self, name: &'static str, func: CFunction) -> Self {
        self.entries.push((name, LibraryEntry::Function(func)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&LibraryEntry> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, entry)| entry)
    }
}

/// Builder for creating library modules
#[macro_export]
macro_rules! lib_module {
    ($name:expr, {
        $($item_name:expr => $item:expr),* $(,)?
    }) => {{
        let mut module = $crate::lib_registry::LibraryModule::new($name);
        $(
            module.entries.push(($item_name, $crate::lib_registry::LibraryEntry::Function($item)));
        )*
        module
    }};
}

/// Registry of the available libraries
pub struct LibraryRegistry {
    modules: Vec<LibraryModule>, // Use Vec to preserve insertion order
}

impl LibraryRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a library module
    pub fn register(&mut self, module: LibraryModule) {
        tracing::debug!(module = module.name, entries = module.entries.len(), "register library");
        self.modules.push(module);
    }

    /// Register one of the bundled libraries (or all of them)
    pub fn open(&mut self, lib: Stdlib) {
        match lib {
            Stdlib::String | Stdlib::All => self.register(stdlib::string::create_string_lib()),
        }
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&LibraryModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Look up `module.name` as a callable value
    pub fn get_function(&self, module: &str, name: &str) -> Option<LuaFunction> {
        match self.get_module(module)?.get(name)? {
            LibraryEntry::Function(func) => Some(LuaFunction::C(*func)),
        }
    }

    /// Build the library table for a module, the way a host exposes it as a
    /// global
    pub fn load_module(&self, name: &str) -> LuaResult<Option<LuaTable>> {
        let Some(module) = self.get_module(name) else {
            return Ok(None);
        };
        let table = LuaTable::with_capacity(module.entries.len());
        for (entry_name, entry) in &module.entries {
            let value = match entry {
                LibraryEntry::Function(func) => LuaValue::cfunction(*func),
            };
            table.set(LuaValue::string(entry_name), value)?;
        }
        Ok(Some(table))
    }
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with every bundled library
pub fn create_standard_registry() -> LibraryRegistry {
    let mut registry = LibraryRegistry::new();
    registry.open(Stdlib::All);
    registry
}
