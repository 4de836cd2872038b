//! # Reactive Stores
//!
//! Observable values backing node properties, page geometry and selection.
//!
//! ## Semantics
//!
//! - Listeners run synchronously, inline with the write that triggered them
//! - Writing a value equal to the current one notifies nobody
//! - `subscribe` calls the listener once immediately, `listen` only on change
//! - Listeners only see values, never the document, so they cannot start a
//!   structural mutation from inside a notification

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Handle returned by `subscribe`/`listen`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Listeners<F: ?Sized> {
    entries: Vec<(SubscriptionId, Box<F>)>,
    next_id: u64,
}

impl<F: ?Sized> Listeners<F> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    fn add(&mut self, listener: Box<F>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<F>> {
        self.entries.iter_mut().map(|(_, listener)| listener)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A single observable value
pub struct Atom<T> {
    value: T,
    listeners: Listeners<dyn FnMut(&T)>,
}

impl<T: PartialEq> Atom<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify listeners if it changed
    pub fn set(&mut self, value: T) {
        if self.value == value {
            return;
        }
        self.value = value;
        self.notify();
    }

    /// Listen for changes, calling the listener with the current value first
    pub fn subscribe(&mut self, mut listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        listener(&self.value);
        self.listen(listener)
    }

    /// Listen for changes only
    pub fn listen(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let value = &self.value;
        for listener in self.listeners.iter_mut() {
            listener(value);
        }
    }
}

impl<T: PartialEq + Default> Default for Atom<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Atom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Keyed property store of a node.
///
/// Listeners receive the changed key and its new value (`None` when the key
/// was removed).
pub struct PropStore {
    values: BTreeMap<String, Value>,
    listeners: Listeners<dyn FnMut(&str, Option<&Value>)>,
}

impl PropStore {
    pub fn new() -> Self {
        Self::from_values(BTreeMap::new())
    }

    pub fn from_values(values: BTreeMap<String, Value>) -> Self {
        Self {
            values,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if self.values.get(&key) == Some(&value) {
            return;
        }
        self.values.insert(key.clone(), value);
        self.notify(&key);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.notify(key);
        }
        removed
    }

    /// Set `key` to `value`, or remove it when `value` is `None`
    pub fn assign(&mut self, key: &str, value: Option<Value>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove(key);
            }
        }
    }

    /// Call `listener` once per current key, then on every change
    pub fn subscribe(
        &mut self,
        mut listener: impl FnMut(&str, Option<&Value>) + 'static,
    ) -> SubscriptionId {
        for (key, value) in &self.values {
            listener(key.as_str(), Some(value));
        }
        self.listen(listener)
    }

    /// Call `listener` on every change, starting with the next one
    pub fn listen(
        &mut self,
        listener: impl FnMut(&str, Option<&Value>) + 'static,
    ) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn notify(&mut self, key: &str) {
        let value = self.values.get(key);
        for listener in self.listeners.iter_mut() {
            listener(key, value);
        }
    }
}

impl Default for PropStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropStore")
            .field("values", &self.values)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_atom_subscribe_fires_immediately_and_on_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut atom = Atom::new(1);

        let sink = seen.clone();
        atom.subscribe(move |value| sink.borrow_mut().push(*value));
        atom.set(2);
        atom.set(2);
        atom.set(3);

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_atom_listen_skips_initial_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut atom = Atom::new("a".to_string());

        let sink = seen.clone();
        let id = atom.listen(move |value: &String| sink.borrow_mut().push(value.clone()));
        atom.set("b".to_string());

        assert!(atom.unsubscribe(id));
        atom.set("c".to_string());

        assert_eq!(*seen.borrow(), vec!["b".to_string()]);
        assert_eq!(atom.listener_count(), 0);
    }

    #[test]
    fn test_prop_store_notifies_changed_key() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = PropStore::new();

        let sink = seen.clone();
        store.listen(move |key, value| {
            sink.borrow_mut().push((key.to_string(), value.cloned()));
        });

        store.set("color", json!("red"));
        store.set("color", json!("red"));
        store.remove("color");
        store.remove("color");

        assert_eq!(
            *seen.borrow(),
            vec![
                ("color".to_string(), Some(json!("red"))),
                ("color".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_prop_store_subscribe_replays_current_keys() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = PropStore::new();
        store.set("gap", json!(4));
        store.set("color", json!("red"));

        let sink = seen.clone();
        store.subscribe(move |key, value| {
            sink.borrow_mut().push((key.to_string(), value.cloned()));
        });
        store.set("gap", json!(8));

        assert_eq!(
            *seen.borrow(),
            vec![
                ("color".to_string(), Some(json!("red"))),
                ("gap".to_string(), Some(json!(4))),
                ("gap".to_string(), Some(json!(8))),
            ]
        );
    }

    #[test]
    fn test_prop_store_assign_none_removes_key() {
        let mut store = PropStore::new();
        store.assign("size", Some(json!(12)));
        assert_eq!(store.get("size"), Some(&json!(12)));

        store.assign("size", None);
        assert!(!store.contains_key("size"));
        assert!(store.is_empty());
    }
}
