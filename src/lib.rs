//! Scroll-driven scrubbing of pre-rendered vector animations.
//!
//! A [`ScrollSection`](section::ScrollSection) binds the vertical scroll
//! offset of a [`Document`](document::Document) to the playback frame of an
//! animation renderer. While the user scrolls through the section, the
//! renderer is jumped frame by frame with no playback of its own.
//!
//! The pieces, leaf first:
//!
//! - [`geometry`]: where the section sits in the document and how far it
//!   scrubs.
//! - [`progress`]: clamped linear map from scroll offset to frame.
//! - [`binding`]: lifecycle of the one renderer instance per mount.
//! - [`reactor`]: re-measures on resize, orientation and attach.
//! - [`section`]: the public component tying them together.

pub mod binding;
pub mod document;
pub mod error;
pub mod geometry;
pub mod progress;
pub mod reactive;
pub mod reactor;
pub mod renderer;
pub mod section;
pub mod style;
pub mod tree;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::document::{Document, Orientation, Subscription, Viewport};
    pub use crate::error::{Error, Result};
    pub use crate::progress::{FrameRange, ProgressMapper, ScrollBounds};
    pub use crate::reactive::{
        Effect, Memo, ReadSignal, Signal, batch, create_effect, create_memo, create_signal,
    };
    pub use crate::reactor::LayoutTriggers;
    pub use crate::renderer::{
        AnimationInstance, AnimationRenderer, AnimationSource, LoadConfig, RenderKind,
        RendererError,
    };
    pub use crate::section::{MountedSection, ScrollSection, scroll_section};
    pub use crate::style::{HorizontalAlignment, MainAxisAlignment, StyleMap};
    pub use crate::tree::{LayoutTree, NodeId};
}
