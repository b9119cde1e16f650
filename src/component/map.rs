//! Per-entity component state.
//!
//! Each entity exclusively owns one `ComponentMap`: the ordered list of
//! attached component names, their values, and a cached signature that
//! is recomputed on every mutation, so it is never stale between calls.

use std::collections::HashMap;

use crate::component::registry::ComponentRegistry;
use crate::component::value::ComponentValue;
use crate::signature::Signature;

#[derive(Debug, Default)]
pub struct ComponentMap {
    /// Attached names in insertion order, no duplicates.
    names: Vec<String>,
    values: HashMap<String, ComponentValue>,
    signature: Signature,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached signature. Equals `registry.signature_of(names)` at all
    /// times after any mutating call has returned.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Attached component names, in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&ComponentValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attaches a component. Returns false (keeping the existing value)
    /// if the name is already attached; the caller surfaces the soft
    /// condition. When the kind carries a factory, the stored value is
    /// `factory(value)`; otherwise `value` verbatim. Names the registry
    /// does not know are stored too, they simply contribute no
    /// signature bit.
    pub(crate) fn attach(
        &mut self,
        registry: &ComponentRegistry,
        name: &str,
        value: ComponentValue,
    ) -> bool {
        if self.values.contains_key(name) {
            return false;
        }
        let stored = match registry.kind(name).and_then(|kind| kind.factory.clone()) {
            Some(factory) => factory(value),
            None => {
                if !registry.is_registered(name) {
                    log::debug!("attaching unregistered component \"{}\" (no signature bit)", name);
                }
                value
            }
        };
        self.names.push(name.to_string());
        self.values.insert(name.to_string(), stored);
        self.recompute(registry);
        true
    }

    /// Detaches a component. Returns false if the name is not attached.
    pub(crate) fn detach(&mut self, registry: &ComponentRegistry, name: &str) -> bool {
        if self.values.remove(name).is_none() {
            return false;
        }
        self.names.retain(|n| n != name);
        self.recompute(registry);
        true
    }

    fn recompute(&mut self, registry: &ComponentRegistry) {
        self.signature = registry.signature_of(self.names.iter().map(String::as_str));
    }
}
