//! Ordered map for header declarations.
//!
//! PLY elements and properties are positional: their declaration order defines
//! payload order and column numbers. [`KeyMap`] (currently backed by
//! [`indexmap::IndexMap`]) keeps that order while allowing lookup by name.

use indexmap::IndexMap;
use super::{ ElementDef, PropertyDef };

/// Declarations by name, in declaration order.
pub type KeyMap<V> = IndexMap<String, V>;

/// A declaration that is stored under its own name.
pub trait Named {
    /// The name used as map key.
    fn name(&self) -> &str;
}

impl Named for ElementDef {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for PropertyDef {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Inserts declarations keyed by their name.
///
/// Redeclaring a name replaces the earlier definition but keeps its position.
pub trait Addable<V: Named> {
    /// Stores `value` under its name.
    fn add(&mut self, value: V);
}

impl<V: Named> Addable<V> for KeyMap<V> {
    fn add(&mut self, value: V) {
        self.insert(value.name().to_owned(), value);
    }
}
