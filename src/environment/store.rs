//! Shared variable store for a test run
//!
//! The store carries values from one test step to the next: a setup step
//! records `last_event_id`, a later request reads it through a `{{last_event_id}}`
//! placeholder. Every clone of an [`EnvironmentStore`] is a handle onto the same
//! bindings, so the store is passed explicitly to whoever needs it.

use super::models::{Binding, MissingVariablePolicy};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide key/value state for one test run
///
/// Reads and writes are individually atomic. Ordering between steps is the
/// caller's contract: a value is visible to every `get` issued after the `set`
/// returns.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentStore {
    bindings: Arc<RwLock<HashMap<String, Binding>>>,
    policy: MissingVariablePolicy,
}

impl EnvironmentStore {
    /// Creates an empty store using the default missing-variable policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given missing-variable policy
    pub fn with_policy(policy: MissingVariablePolicy) -> Self {
        Self {
            bindings: Arc::default(),
            policy,
        }
    }

    /// Creates a store seeded with the given variables
    pub fn from_variables<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (name, value) in variables {
            store.set(name, value);
        }
        store
    }

    /// The policy every substitution against this store follows
    pub fn policy(&self) -> MissingVariablePolicy {
        self.policy
    }

    /// Gets the last value written for `name`
    ///
    /// Returns None if the variable was never set or is bound to null.
    /// An empty string is returned as `Some("")`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.read()
            .get(name)
            .and_then(|binding| binding.as_str().map(str::to_string))
    }

    /// Gets the raw binding for `name`, distinguishing null from absent
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.read().get(name).cloned()
    }

    /// Checks if `name` has ever been set (including to null)
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Sets a variable, overwriting any earlier value
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name.into(), Binding::Value(value.into()));
    }

    /// Binds a variable to an explicit null
    pub fn set_null(&self, name: impl Into<String>) {
        self.insert(name.into(), Binding::Null);
    }

    /// Sets a variable from a JSON value
    ///
    /// Strings are stored without their quotes, null becomes a null binding,
    /// and every other value is stored as its compact JSON text.
    pub fn set_json(&self, name: impl Into<String>, value: &JsonValue) {
        let binding = match value {
            JsonValue::Null => Binding::Null,
            JsonValue::String(s) => Binding::Value(s.clone()),
            other => Binding::Value(other.to_string()),
        };
        self.insert(name.into(), binding);
    }

    /// Returns the number of bound variables
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Checks if no variable has been set yet
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Lists all bound variable names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns a sorted copy of every binding
    pub fn snapshot(&self) -> BTreeMap<String, Binding> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn insert(&self, name: String, binding: Binding) {
        log::debug!("environment: set '{}'", name);
        self.write().insert(name, binding);
    }

    // A panic while holding the lock cannot leave a half-written map behind,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Binding>> {
        self.bindings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Binding>> {
        self.bindings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
