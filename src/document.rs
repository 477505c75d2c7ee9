//! The host page: a scrollable viewport over a layout tree.
//!
//! Everything that changes under a mounted section is published as a signal:
//! the scroll offset, the viewport height and orientation, and two change
//! counters for the layout tree (structure and reflow). Layout mutations go
//! through [`Document::mutate_layout`] so the counters stay honest.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::reactive::{Effect, ReadSignal, Signal, batch, create_effect, create_signal};
use crate::tree::LayoutTree;

/// Screen orientation as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// The visible window onto the document.
#[derive(Clone)]
pub struct Viewport {
    scroll_y: Signal<f32>,
    inner_height: Signal<f32>,
    inner_width: Signal<f32>,
    orientation: Signal<Orientation>,
}

impl Viewport {
    pub fn new(inner_width: f32, inner_height: f32) -> Self {
        Self {
            scroll_y: create_signal(0.0),
            inner_height: create_signal(inner_height),
            inner_width: create_signal(inner_width),
            orientation: create_signal(orientation_for(inner_width, inner_height)),
        }
    }

    /// Current vertical scroll offset in pixels.
    pub fn scroll_y(&self) -> ReadSignal<f32> {
        self.scroll_y.read_only()
    }

    pub fn inner_height(&self) -> ReadSignal<f32> {
        self.inner_height.read_only()
    }

    pub fn inner_width(&self) -> ReadSignal<f32> {
        self.inner_width.read_only()
    }

    pub fn orientation(&self) -> ReadSignal<Orientation> {
        self.orientation.read_only()
    }

    /// Deliver a scroll event. Negative offsets (overscroll) are kept as-is.
    pub fn scroll_to(&self, offset: f32) {
        self.scroll_y.set(offset);
    }

    /// Deliver a resize event. Orientation follows the aspect ratio.
    pub fn resize(&self, inner_width: f32, inner_height: f32) {
        batch(|| {
            self.inner_width.set(inner_width);
            self.inner_height.set(inner_height);
            self.orientation
                .set(orientation_for(inner_width, inner_height));
        });
    }

    /// Subscribe to scroll offset changes. The callback runs once with the
    /// current offset and then on every change until the subscription is
    /// dropped or unsubscribed.
    pub fn subscribe_scroll(&self, mut f: impl FnMut(f32) + 'static) -> Subscription {
        let scroll_y = self.scroll_y.clone();
        Subscription::new(create_effect(move || f(scroll_y.get())))
    }
}

fn orientation_for(width: f32, height: f32) -> Orientation {
    if width > height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

/// Handle to a push-based subscription. Dropping it unsubscribes.
pub struct Subscription {
    effect: Effect,
}

impl Subscription {
    pub(crate) fn new(effect: Effect) -> Self {
        Self { effect }
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_alive()
    }

    pub fn unsubscribe(self) {
        self.effect.dispose();
    }
}

/// A scrollable page: viewport plus layout tree.
#[derive(Clone)]
pub struct Document {
    viewport: Viewport,
    layout: Rc<RefCell<LayoutTree>>,
    structure_version: Signal<u64>,
    reflow_version: Signal<u64>,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layout: Rc::new(RefCell::new(LayoutTree::new())),
            structure_version: create_signal(0),
            reflow_version: create_signal(0),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Borrow the layout tree for reading.
    pub fn layout(&self) -> Ref<'_, LayoutTree> {
        self.layout.borrow()
    }

    /// Bumps whenever a node is attached to or detached from the tree.
    pub fn structure_version(&self) -> ReadSignal<u64> {
        self.structure_version.read_only()
    }

    /// Bumps whenever any offset or height may have changed.
    pub fn reflow_version(&self) -> ReadSignal<u64> {
        self.reflow_version.read_only()
    }

    /// Mutate the layout tree and publish the change.
    ///
    /// Structure changes are detected by comparing the attached node set
    /// before and after `f`; every mutation counts as a reflow.
    pub fn mutate_layout<R>(&self, f: impl FnOnce(&mut LayoutTree) -> R) -> R {
        let (result, structure_changed) = {
            let mut tree = self.layout.borrow_mut();
            let before = attached_fingerprint(&tree);
            let result = f(&mut tree);
            (result, attached_fingerprint(&tree) != before)
        };

        batch(|| {
            if structure_changed {
                self.structure_version.update(|v| *v += 1);
            }
            self.reflow_version.update(|v| *v += 1);
        });

        result
    }
}

/// Attached node ids in depth-first order.
fn attached_fingerprint(tree: &LayoutTree) -> Vec<u64> {
    let mut ids = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        ids.push(id.as_u64());
        stack.extend(tree.children(id).iter().rev().copied());
    }
    ids
}
