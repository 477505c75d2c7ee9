use std::rc::Rc;

use super::effect::{Effect, create_effect};
use super::signal::{ReadSignal, create_signal};

/// Eager computed value that recomputes immediately when dependencies change.
///
/// Downstream subscribers are only notified when the computed result differs
/// (`PartialEq`), so a memo in front of an expensive sink filters out no-op
/// updates.
///
/// # Example
///
/// ```ignore
/// let scroll = create_signal(0.0_f32);
/// let doubled = create_memo({
///     let scroll = scroll.clone();
///     move || scroll.get() * 2.0
/// });
/// ```
pub struct Memo<T> {
    value: ReadSignal<T>,
    _effect: Rc<Effect>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _effect: self._effect.clone(),
        }
    }
}

impl<T: Clone> Memo<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn get_untracked(&self) -> T {
        self.value.get_untracked()
    }
}

/// Create an eagerly-evaluated memo that recomputes when dependencies change.
pub fn create_memo<T, F>(f: F) -> Memo<T>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    let (read, write) = create_signal(super::untrack(&f)).split();
    // The effect re-establishes dependencies on every run; `set` skips
    // notification when the value is unchanged.
    let effect = create_effect(move || write.set(f()));
    Memo {
        value: read,
        _effect: Rc::new(effect),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::reactive::create_signal;

    #[test]
    fn test_memo_tracks_dependencies() {
        let offset = create_signal(10.0_f32);
        let o = offset.clone();
        let doubled = create_memo(move || o.get() * 2.0);
        assert_eq!(doubled.get(), 20.0);

        offset.set(12.5);
        assert_eq!(doubled.get(), 25.0);
    }

    #[test]
    fn test_memo_skips_unchanged_results() {
        let offset = create_signal(3);
        let o = offset.clone();
        let parity = create_memo(move || o.get() % 2);

        let notified = Rc::new(RefCell::new(0));
        let (p, n) = (parity.clone(), notified.clone());
        let _sink = crate::reactive::create_effect(move || {
            p.get();
            *n.borrow_mut() += 1;
        });

        offset.set(5);
        offset.set(6);
        assert_eq!(*notified.borrow(), 2);
    }
}
