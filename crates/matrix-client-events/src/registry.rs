// Copyright 2024 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A runtime registry of constructors keyed by a wire type string.

use std::{collections::BTreeMap, fmt, sync::RwLock};

use crate::RegistryError;

/// Mapping from a wire type string to a constructor.
///
/// Bindings are never overwritten: a type string has to be unregistered
/// before it can be bound to another constructor.
pub struct TypeRegistry<C> {
    handlers: RwLock<BTreeMap<String, C>>,
}

impl<C: Clone> TypeRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { handlers: RwLock::new(BTreeMap::new()) }
    }

    /// Bind `type_string` to `constructor`.
    ///
    /// Fails with [`RegistryError::AlreadyExists`] if the type string is
    /// already bound, the existing binding stays in place.
    pub fn register(
        &self,
        type_string: impl Into<String>,
        constructor: C,
    ) -> Result<(), RegistryError> {
        let type_string = type_string.into();
        let mut handlers = self.handlers.write().unwrap();

        if handlers.contains_key(&type_string) {
            return Err(RegistryError::AlreadyExists(type_string));
        }

        handlers.insert(type_string, constructor);
        Ok(())
    }

    /// Remove the binding of `type_string`, if there is one.
    pub fn unregister(&self, type_string: &str) {
        self.handlers.write().unwrap().remove(type_string);
    }

    /// Get the constructor bound to `type_string`.
    pub fn lookup(&self, type_string: &str) -> Result<C, RegistryError> {
        self.handlers
            .read()
            .unwrap()
            .get(type_string)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(type_string.to_owned()))
    }

    /// Is `type_string` bound to a constructor?
    pub fn contains(&self, type_string: &str) -> bool {
        self.handlers.read().unwrap().contains_key(type_string)
    }

    /// All bound type strings, in lexicographic order.
    pub fn types(&self) -> Vec<String> {
        self.handlers.read().unwrap().keys().cloned().collect()
    }
}

impl<C: Clone> Default for TypeRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TypeRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap();
        f.debug_set().entries(handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn register_twice() {
        let registry = TypeRegistry::new();
        registry.register("m.foo", 1).unwrap();

        assert_matches!(
            registry.register("m.foo", 2),
            Err(RegistryError::AlreadyExists(t)) if t == "m.foo"
        );
        assert_eq!(registry.lookup("m.foo"), Ok(1));
    }

    #[test]
    fn unregister_then_register_again() {
        let registry = TypeRegistry::new();
        registry.register("m.foo", 1).unwrap();
        registry.unregister("m.foo");
        // Unregistering something that isn't there does nothing.
        registry.unregister("m.foo");

        assert_eq!(registry.lookup("m.foo"), Err(RegistryError::NotFound("m.foo".to_owned())));
        registry.register("m.foo", 2).unwrap();
        assert_eq!(registry.lookup("m.foo"), Ok(2));
    }

    #[test]
    fn types_are_sorted() {
        let registry = TypeRegistry::new();
        registry.register("m.b", ()).unwrap();
        registry.register("m.a", ()).unwrap();

        assert_eq!(registry.types(), ["m.a", "m.b"]);
        assert!(registry.contains("m.a"));
        assert!(!registry.contains("m.c"));
    }
}
