use std::collections::{BTreeMap, HashMap};

/// Read access to the request-scoped session, as far as cookie policies need it.
///
/// Only boolean flags are exposed: a key that is missing, or that holds
/// something other than a boolean, yields `None`.
pub trait SessionStore {
    /// Returns the boolean stored under `key`, if any.
    fn flag(&self, key: &str) -> Option<bool>;
}

impl SessionStore for HashMap<String, bool> {
    fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).copied()
    }
}

impl SessionStore for BTreeMap<String, bool> {
    fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).copied()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn flag(&self, key: &str) -> Option<bool> {
        (**self).flag(key)
    }
}
