//! An in-memory [`SymbolSource`] backed by a name-to-address map.

use std::collections::HashMap;
use std::ffi::c_void;

use crate::ffi::{LibraryError, SymbolSource};

/// Fake symbol source for exercising the binder without loading anything.
///
/// Addresses are supplied by the test, usually by casting a local
/// `extern "C"` function to `*mut c_void`.
#[derive(Debug, Default)]
pub struct FakeLibrary {
    name: String,
    symbols: HashMap<String, *mut c_void>,
}

impl FakeLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        FakeLibrary {
            name: name.into(),
            symbols: HashMap::new(),
        }
    }

    /// Register a symbol at the given address.
    pub fn with_symbol(mut self, symbol: &str, address: *mut c_void) -> Self {
        self.symbols.insert(symbol.to_string(), address);
        self
    }

    /// Remove a symbol, simulating an older library that lacks it.
    pub fn without_symbol(mut self, symbol: &str) -> Self {
        self.symbols.remove(symbol);
        self
    }
}

impl SymbolSource for FakeLibrary {
    fn symbol_address(&self, symbol: &str) -> Result<*mut c_void, LibraryError> {
        self.symbols
            .get(symbol)
            .copied()
            .ok_or_else(|| LibraryError::Symbol {
                library: self.name.clone(),
                symbol: symbol.to_string(),
                message: "symbol not present in fake library".to_string(),
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn marker() {}

    #[test]
    fn test_resolves_registered_symbols() {
        let lib = FakeLibrary::new("fake").with_symbol("marker", marker as *mut c_void);
        assert_eq!(lib.symbol_address("marker").unwrap(), marker as *mut c_void);
    }

    #[test]
    fn test_missing_symbols_name_the_library() {
        let lib = FakeLibrary::new("fake");
        let err = lib.symbol_address("absent").unwrap_err();
        assert!(err.to_string().contains("fake"));
        assert!(err.to_string().contains("absent"));
    }
}
