//! Reactive ownership for scoped cleanup.
//!
//! A mounted component runs its setup inside [`with_owner`]. Effects created
//! in that scope and callbacks registered with [`on_cleanup`] belong to the
//! owner; [`dispose_owner`] releases all of them at once.
//!
//! # Example
//!
//! ```ignore
//! let (subscription, owner_id) = with_owner(|| {
//!     let scroll = create_signal(0.0_f32);
//!     on_cleanup(|| log::debug!("scope released"));
//!     create_effect(move || log::trace!("scroll {}", scroll.get()))
//! });
//!
//! dispose_owner(owner_id);
//! ```

use std::cell::RefCell;

use super::runtime::{EffectId, dispose_effect};

/// Unique identifier for an owner in the owner arena.
pub type OwnerId = usize;

struct Owner {
    effects: Vec<EffectId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

impl Owner {
    fn new() -> Self {
        Self {
            effects: Vec::new(),
            cleanups: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Default)]
struct OwnerArena {
    owners: Vec<Option<Owner>>,
}

impl OwnerArena {
    fn allocate(&mut self, parent: Option<OwnerId>) -> OwnerId {
        let id = self.owners.len();
        self.owners.push(Some(Owner::new()));

        if let Some(parent_id) = parent
            && let Some(parent_owner) = self.get_mut(parent_id)
        {
            parent_owner.children.push(id);
        }

        id
    }

    fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(id).and_then(|o| o.as_mut())
    }

    fn take(&mut self, id: OwnerId) -> Option<Owner> {
        self.owners.get_mut(id).and_then(|o| o.take())
    }
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<OwnerArena> = RefCell::new(OwnerArena::default());
}

/// Execute a closure within a new owner scope nested under the current one.
///
/// Returns the closure's result and the new owner's id.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let parent = current_owner();
    let owner_id = OWNERS.with(|owners| owners.borrow_mut().allocate(parent));

    let prev_owner = CURRENT_OWNER.with(|current| current.replace(Some(owner_id)));
    let _restore = RestoreOwner(prev_owner);
    let result = f();

    (result, owner_id)
}

/// Puts the enclosing owner back when a scope exits, including by unwinding.
struct RestoreOwner(Option<OwnerId>);

impl Drop for RestoreOwner {
    fn drop(&mut self) {
        let prev = self.0;
        let _ = CURRENT_OWNER.try_with(|current| *current.borrow_mut() = prev);
    }
}

/// Get the current owner ID, if any.
pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Whether the owner still exists (not yet disposed).
pub fn is_owner_alive(id: OwnerId) -> bool {
    OWNERS.with(|owners| matches!(owners.borrow().owners.get(id), Some(Some(_))))
}

/// Dispose an owner and everything it owns.
///
/// Children are disposed first (depth-first), then cleanup callbacks run in
/// reverse registration order, then owned effects are stopped. Disposing an
/// owner twice is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let Some(owner) = OWNERS.with(|owners| owners.borrow_mut().take(id)) else {
        return;
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }

    for effect_id in owner.effects {
        dispose_effect(effect_id);
    }
}

/// Register a cleanup callback to run when the current owner is disposed.
///
/// Outside an owner scope the callback is dropped without running.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.cleanups.push(Box::new(f));
            }
        });
    }
}

/// Register an effect with the current owner.
pub(crate) fn register_effect(id: EffectId) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.effects.push(id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::reactive::{create_effect, create_signal};

    #[test]
    fn test_current_owner_outside_scope() {
        assert!(current_owner().is_none());
    }

    #[test]
    fn test_panicking_scope_restores_outer_owner() {
        let ((), outer_id) = with_owner(|| {
            let outer = current_owner();
            let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                with_owner(|| panic!("setup failed"));
            }));
            assert!(caught.is_err());
            assert_eq!(current_owner(), outer);
        });

        assert!(current_owner().is_none());
        dispose_owner(outer_id);
    }

    #[test]
    fn test_nested_owners_dispose_children_first() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        let (_, outer_id) = with_owner(|| {
            let outer = o.clone();
            on_cleanup(move || outer.borrow_mut().push("outer"));

            let inner = o.clone();
            with_owner(|| on_cleanup(move || inner.borrow_mut().push("inner")));
        });

        dispose_owner(outer_id);
        assert_eq!(*order.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_on_cleanup_reverse_order() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        let (_, owner_id) = with_owner(|| {
            for name in ["first", "second", "third"] {
                let o = o.clone();
                on_cleanup(move || o.borrow_mut().push(name));
            }
        });

        dispose_owner(owner_id);
        assert_eq!(*order.borrow(), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_dispose_stops_owned_effects() {
        let signal = create_signal(0);
        let runs = Rc::new(RefCell::new(0));

        let (s, r) = (signal.clone(), runs.clone());
        let (effect, owner_id) = with_owner(|| {
            create_effect(move || {
                s.get();
                *r.borrow_mut() += 1;
            })
        });

        dispose_owner(owner_id);
        assert!(!effect.is_alive());
        assert!(!is_owner_alive(owner_id));

        signal.set(1);
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn test_dispose_owner_twice_is_safe() {
        let (_, owner_id) = with_owner(|| {});
        dispose_owner(owner_id);
        dispose_owner(owner_id);
    }
}
