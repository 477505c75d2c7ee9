//! Layout change reactor: keeps scroll bounds current as the page moves.
//!
//! The reactor re-runs the geometry probe whenever one of its triggers fires
//! and publishes the result on a signal. It never touches the renderer.

use bitflags::bitflags;

use crate::document::Document;
use crate::geometry::probe;
use crate::progress::ScrollBounds;
use crate::reactive::{Effect, ReadSignal, Signal, create_effect, create_signal};
use crate::tree::NodeId;

bitflags! {
    /// Events that cause the section to be re-measured.
    ///
    /// The reactor always measures once when it starts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LayoutTriggers: u8 {
        /// Viewport height changed.
        const RESIZE      = 0b0001;
        /// Viewport orientation changed.
        const ORIENTATION = 0b0010;
        /// A node was attached to or detached from the document.
        const ATTACH      = 0b0100;
        /// Any offset or height in the document changed.
        const REFLOW      = 0b1000;
    }
}

impl Default for LayoutTriggers {
    fn default() -> Self {
        Self::RESIZE | Self::ORIENTATION | Self::ATTACH
    }
}

/// What the reactor measures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureTarget {
    pub section: NodeId,
    pub logical_height: f32,
    pub start_margin: f32,
}

pub struct LayoutReactor {
    bounds: Signal<Option<ScrollBounds>>,
    remeasure: Signal<u64>,
    effect: Effect,
}

impl LayoutReactor {
    /// Measure `target` now and again on every trigger in `triggers`.
    pub fn start(document: &Document, target: MeasureTarget, triggers: LayoutTriggers) -> Self {
        let bounds = create_signal(None);
        let remeasure = create_signal(0u64);

        let doc = document.clone();
        let publish = bounds.clone();
        let manual = remeasure.clone();
        let effect = create_effect(move || {
            manual.get();

            let viewport = doc.viewport();
            let viewport_height = if triggers.contains(LayoutTriggers::RESIZE) {
                viewport.inner_height().get()
            } else {
                viewport.inner_height().get_untracked()
            };
            if triggers.contains(LayoutTriggers::ORIENTATION) {
                viewport.orientation().get();
            }
            if triggers.contains(LayoutTriggers::ATTACH) {
                doc.structure_version().get();
            }
            if triggers.contains(LayoutTriggers::REFLOW) {
                doc.reflow_version().get();
            }

            let geometry = probe(
                &doc.layout(),
                target.section,
                target.logical_height,
                viewport_height,
            );
            let next = geometry.map(|g| ScrollBounds::from_geometry(g, target.start_margin));
            match next {
                Some(b) => log::debug!(
                    "section {:?} scrubs between {} and {}",
                    target.section,
                    b.range_start,
                    b.range_end
                ),
                None => log::debug!("section {:?} is not attached yet", target.section),
            }
            publish.set(next);
        });

        Self {
            bounds,
            remeasure,
            effect,
        }
    }

    /// Latest scroll bounds; `None` while the section is detached.
    pub fn bounds(&self) -> ReadSignal<Option<ScrollBounds>> {
        self.bounds.read_only()
    }

    /// Stop reacting. The last published bounds stay readable.
    pub fn stop(&self) {
        self.effect.dispose();
    }

    /// Force a measurement outside the configured triggers.
    pub fn remeasure(&self) {
        self.remeasure.update(|n| *n += 1);
    }
}
