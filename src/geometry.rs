//! Geometry probe: where a section sits in the document and how far its
//! animation scrubs.
//!
//! All functions are pure reads of the layout state at call time. Results
//! must not be cached across resizes or reflows; the reactor re-runs them.

use crate::tree::{LayoutTree, NodeId};

/// Measured geometry of a bound section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionGeometry {
    /// Distance from the top of the document to the section's top edge.
    pub top_offset: f32,
    /// Scroll distance over which the mapping is active.
    pub scroll_extent: f32,
}

/// Absolute top offset of `node`: the sum of `offset_top` along its
/// ancestor chain.
///
/// Returns `None` if the node does not exist or is not attached to the
/// document; callers must not act on such a measurement.
pub fn top_offset(tree: &LayoutTree, node: NodeId) -> Option<f32> {
    if !tree.is_attached(node) {
        return None;
    }

    let mut top = 0.0;
    let mut current = Some(node);
    while let Some(id) = current {
        top += tree.offset_top(id)?;
        current = tree.parent(id);
    }
    Some(top)
}

/// The part of the section's logical height that exceeds one screen.
///
/// The sticky container already covers one viewport of scrolling, so only
/// the remainder drives the animation. A viewport taller than the section
/// (possible after a resize) yields 0.
pub fn scroll_extent(logical_height: f32, viewport_height: f32) -> f32 {
    let extent = logical_height - viewport_height;
    if extent < 0.0 {
        log::warn!(
            "viewport height {}px exceeds section height {}px, scroll extent clamped to 0",
            viewport_height,
            logical_height
        );
        return 0.0;
    }
    extent
}

/// Measure a section. `None` while the node is detached.
pub fn probe(
    tree: &LayoutTree,
    node: NodeId,
    logical_height: f32,
    viewport_height: f32,
) -> Option<SectionGeometry> {
    let top_offset = top_offset(tree, node)?;
    Some(SectionGeometry {
        top_offset,
        scroll_extent: scroll_extent(logical_height, viewport_height),
    })
}
