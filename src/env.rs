// ABOUTME: Lexically chained scopes mapping symbol names to values

use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One scope frame. The parent pointer is fixed at construction, so lock
/// acquisition walks strictly rootward and can never cycle. Each frame
/// guards its own map because the REPL's reader and evaluator flows share
/// the global scope.
#[derive(Debug)]
pub struct Environment {
    parent: Option<Arc<Environment>>,
    bindings: RwLock<HashMap<String, Value>>,
}

impl Environment {
    /// The root scope with no parent.
    pub fn global() -> Arc<Self> {
        Arc::new(Environment {
            parent: None,
            bindings: RwLock::new(HashMap::new()),
        })
    }

    /// A child scope chained to this one.
    pub fn sub(self: &Arc<Self>) -> Arc<Self> {
        Arc::new(Environment {
            parent: Some(self.clone()),
            bindings: RwLock::new(HashMap::new()),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.bindings.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.bindings.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Walks the scope chain; the innermost binding wins.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.read().get(name) {
                return Some(value.clone());
            }
            match &scope.parent {
                Some(parent) => scope = parent,
                None => return None,
            }
        }
    }

    /// Defines or overwrites in this scope only. True when a new binding
    /// was created.
    pub fn set(&self, name: impl Into<String>, value: Value) -> bool {
        self.write().insert(name.into(), value).is_none()
    }

    /// Rebinds in the scope that owns the binding; false when the name is
    /// unbound in the whole chain. Frames are locked one at a time.
    pub fn update(&self, name: &str, value: Value) -> bool {
        let mut scope = self;
        loop {
            {
                let mut map = scope.write();
                if map.contains_key(name) {
                    map.insert(name.to_string(), value);
                    return true;
                }
            }
            match &scope.parent {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }

    /// Removes from this scope only; parents are untouched.
    pub fn del(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }
}
