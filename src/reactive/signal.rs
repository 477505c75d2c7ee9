use std::cell::RefCell;
use std::rc::Rc;

use super::runtime::{SignalId, notify_write, try_with_runtime, with_runtime};

struct SignalInner<T> {
    id: SignalId,
    value: RefCell<T>,
}

impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        let id = self.id;
        try_with_runtime(|rt| rt.release_signal(id));
    }
}

/// A reactive value.
///
/// Signals are the core primitive of the reactive system. Reading a signal
/// inside an effect subscribes that effect; writing a different value re-runs
/// every subscribed effect synchronously, in creation order.
///
/// Signals are single-threaded: the runtime lives in a thread-local and
/// clones share the same underlying value.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = with_runtime(|rt| rt.allocate_signal());
        Self {
            inner: Rc::new(SignalInner {
                id,
                value: RefCell::new(value),
            }),
        }
    }

    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (
            ReadSignal {
                inner: self.inner.clone(),
            },
            WriteSignal { inner: self.inner },
        )
    }

    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: self.inner.clone(),
        }
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        track(self.inner.id);
        f(&self.inner.value.borrow())
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.borrow())
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        track(self.inner.id);
        self.inner.value.borrow().clone()
    }

    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: PartialEq> Signal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        set_inner(&self.inner, value);
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        update_inner(&self.inner, f);
    }
}

/// Read-only handle to a signal.
pub struct ReadSignal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> ReadSignal<T> {
    pub fn get(&self) -> T {
        track(self.inner.id);
        self.inner.value.borrow().clone()
    }

    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T> ReadSignal<T> {
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        track(self.inner.id);
        f(&self.inner.value.borrow())
    }
}

/// Write-only handle to a signal.
pub struct WriteSignal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: PartialEq> WriteSignal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        set_inner(&self.inner, value);
    }
}

impl<T: PartialEq + Clone> WriteSignal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        update_inner(&self.inner, f);
    }
}

fn track(id: SignalId) {
    try_with_runtime(|rt| rt.track_read(id));
}

fn set_inner<T: PartialEq>(inner: &SignalInner<T>, value: T) {
    let changed = {
        let mut guard = inner.value.borrow_mut();
        if *guard != value {
            *guard = value;
            true
        } else {
            false
        }
    };
    if changed {
        notify_write(inner.id);
    }
}

fn update_inner<T: PartialEq + Clone, F: FnOnce(&mut T)>(inner: &SignalInner<T>, f: F) {
    let changed = {
        let mut guard = inner.value.borrow_mut();
        let old_value = guard.clone();
        f(&mut *guard);
        *guard != old_value
    };
    if changed {
        notify_write(inner.id);
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
