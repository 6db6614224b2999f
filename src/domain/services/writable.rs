#[cfg(test)]
#[path = "writable_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::watch;

/// A value with subscribers. Every mutation is visible to `get` and to all
/// receivers as soon as the call returns.
pub struct Writable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Writable<T> {
        return Writable {
            tx: Arc::clone(&self.tx),
        };
    }
}

impl<T: Clone> Writable<T> {
    pub fn new(value: T) -> Writable<T> {
        let (tx, _rx) = watch::channel(value);
        return Writable { tx: Arc::new(tx) };
    }

    pub fn get(&self) -> T {
        return self.tx.borrow().clone();
    }

    /// Reads the current value without cloning it.
    pub fn with<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
        return f(&self.tx.borrow());
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        self.tx.send_modify(f);
    }

    /// Like `update`, but subscribers are only notified when `f` returns true.
    pub fn update_if<F: FnOnce(&mut T) -> bool>(&self, f: F) -> bool {
        return self.tx.send_if_modified(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        return self.tx.subscribe();
    }
}
