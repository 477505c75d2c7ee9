//! The public scroll section component.
//!
//! A [`ScrollSection`] is configured with a builder, validated, and mounted
//! into a [`Document`]. Mounting creates the section node (as tall as the
//! logical height) with a sticky, viewport-tall container inside it, starts
//! the layout reactor, and binds one renderer instance whose frame follows
//! the scroll offset.
//!
//! # Example
//!
//! ```ignore
//! let mut section = scroll_section(2400.0)
//!     .frames([0.0, 100.0])
//!     .animation("animations/intro.json")
//!     .animation_position(HorizontalAlignment::Left)
//!     .mount(&document, parent, &mut renderer)?;
//!
//! document.viewport().scroll_to(1300.0);
//! section.unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::binding::RendererBinding;
use crate::document::{Document, Viewport};
use crate::error::{Error, Result};
use crate::progress::{FrameRange, ProgressMapper, ScrollBounds};
use crate::reactive::{
    Effect, Memo, OwnerId, create_effect, create_memo, dispose_owner, is_owner_alive, on_cleanup,
    with_owner,
};
use crate::reactor::{LayoutReactor, LayoutTriggers, MeasureTarget};
use crate::renderer::{AnimationRenderer, AnimationSource, LoadConfig, RenderKind};
use crate::style::{HorizontalAlignment, StyleMap, container_style, section_style};
use crate::tree::NodeId;

/// Configuration of a scroll-scrubbed animation section.
#[derive(Debug, Clone)]
pub struct ScrollSection {
    height: f32,
    frames: Option<FrameRange>,
    animation: Option<AnimationSource>,
    animation_position: HorizontalAlignment,
    start_margin: f32,
    debug_mode: bool,
    style: StyleMap,
    class_name: Option<String>,
    animation_style: StyleMap,
    render_kind: RenderKind,
    renderer_options: Map<String, Value>,
    triggers: LayoutTriggers,
}

/// Start configuring a section with the given logical height.
pub fn scroll_section(height: f32) -> ScrollSection {
    ScrollSection::new(height)
}

impl ScrollSection {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            frames: None,
            animation: None,
            animation_position: HorizontalAlignment::default(),
            start_margin: 0.0,
            debug_mode: false,
            style: StyleMap::new(),
            class_name: None,
            animation_style: StyleMap::new(),
            render_kind: RenderKind::default(),
            renderer_options: Map::new(),
            triggers: LayoutTriggers::default(),
        }
    }

    /// Frame range the scroll maps onto. Required.
    pub fn frames(mut self, frames: impl Into<FrameRange>) -> Self {
        self.frames = Some(frames.into());
        self
    }

    /// Inline animation data or a path. Required.
    pub fn animation(mut self, animation: impl Into<AnimationSource>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    pub fn animation_position(mut self, position: HorizontalAlignment) -> Self {
        self.animation_position = position;
        self
    }

    /// Pixels before the section's top at which scrubbing starts.
    pub fn start_margin(mut self, start_margin: f32) -> Self {
        self.start_margin = start_margin;
        self
    }

    /// Outline the section and the renderer container.
    pub fn debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn animation_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.animation_style.insert(property.into(), value.into());
        self
    }

    pub fn render_kind(mut self, kind: RenderKind) -> Self {
        self.render_kind = kind;
        self
    }

    /// Forward an option verbatim to the renderer's load configuration.
    pub fn renderer_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.renderer_options.insert(key.into(), value.into());
        self
    }

    /// Which layout changes re-measure the section.
    pub fn triggers(mut self, triggers: LayoutTriggers) -> Self {
        self.triggers = triggers;
        self
    }

    /// Check the configuration against the current viewport.
    ///
    /// The frame range is checked first, before anything is measured.
    pub fn validate(&self, viewport: &Viewport) -> Result<FrameRange> {
        let frames = self.frames.ok_or(Error::MissingFrames)?;
        if !frames.start.is_finite() || !frames.end.is_finite() || frames.start > frames.end {
            return Err(Error::InvalidFrames {
                start: frames.start,
                end: frames.end,
            });
        }

        let viewport_height = viewport.inner_height().get_untracked();
        if !self.height.is_finite() || self.height < viewport_height {
            return Err(Error::HeightBelowViewport {
                height: self.height,
                viewport_height,
            });
        }

        if !self.start_margin.is_finite() {
            return Err(Error::InvalidStartMargin(self.start_margin));
        }

        if self.animation.is_none() {
            return Err(Error::MissingAnimation);
        }

        Ok(frames)
    }

    /// Validate, then mount under `parent` and bind a renderer instance.
    ///
    /// On failure nothing stays behind: nodes are removed and reactive
    /// state released before the error is returned.
    pub fn mount(
        self,
        document: &Document,
        parent: NodeId,
        renderer: &mut dyn AnimationRenderer,
    ) -> Result<MountedSection> {
        let frames = self.validate(document.viewport())?;

        let (parts, owner) = with_owner(|| self.setup(document, parent, renderer, frames));
        match parts {
            Ok(parts) => Ok(MountedSection {
                owner,
                parts,
                config: self,
            }),
            Err(err) => {
                log::debug!("mount failed, releasing section: {}", err);
                dispose_owner(owner);
                Err(err)
            }
        }
    }

    fn setup(
        &self,
        document: &Document,
        parent: NodeId,
        renderer: &mut dyn AnimationRenderer,
        frames: FrameRange,
    ) -> Result<MountParts> {
        let viewport = document.viewport().clone();
        let logical_height = self.height;

        let (section, container) = document.mutate_layout(|tree| {
            let section = tree.create_node(logical_height);
            let container = tree.create_node(viewport.inner_height().get_untracked());
            tree.append_child(section, container);
            tree.append_child(parent, section);
            (section, container)
        });
        let doc = document.clone();
        on_cleanup(move || doc.mutate_layout(|tree| tree.remove(section)));

        let reactor = Rc::new(LayoutReactor::start(
            document,
            MeasureTarget {
                section,
                logical_height,
                start_margin: self.start_margin,
            },
            self.triggers,
        ));
        let stop = reactor.clone();
        on_cleanup(move || stop.stop());

        // Keep the sticky container one viewport tall.
        let doc = document.clone();
        let height = viewport.inner_height();
        let sizing = create_effect(move || {
            let height = height.get();
            if doc.layout().height(container) != Some(height) {
                doc.mutate_layout(|tree| tree.set_height(container, height));
            }
        });

        let bounds = reactor.bounds();
        let scroll_y = viewport.scroll_y();
        let frame = create_memo(move || {
            bounds
                .get()
                .map(|b| ProgressMapper::new(b, frames).frame_at(scroll_y.get()))
        });

        let binding = Rc::new(RefCell::new(RendererBinding::new()));
        let teardown = binding.clone();
        on_cleanup(move || teardown.borrow_mut().teardown());

        let config = LoadConfig {
            container,
            render_kind: self.render_kind,
            source: self.animation.clone().ok_or(Error::MissingAnimation)?,
            initial_segment: frames.initial_segment(),
            loop_playback: false,
            autoplay: false,
            options: self.renderer_options.clone(),
        };
        binding.borrow_mut().bind(renderer, config, frame.clone())?;

        Ok(MountParts {
            section,
            container,
            reactor,
            _sizing: sizing,
            binding,
            frame,
        })
    }
}

struct MountParts {
    section: NodeId,
    container: NodeId,
    reactor: Rc<LayoutReactor>,
    _sizing: Effect,
    binding: Rc<RefCell<RendererBinding>>,
    frame: Memo<Option<f32>>,
}

/// A section mounted in a document. Dropping it unmounts.
pub struct MountedSection {
    owner: OwnerId,
    parts: MountParts,
    config: ScrollSection,
}

impl MountedSection {
    pub fn section_node(&self) -> NodeId {
        self.parts.section
    }

    pub fn container_node(&self) -> NodeId {
        self.parts.container
    }

    pub fn is_mounted(&self) -> bool {
        is_owner_alive(self.owner)
    }

    pub fn is_bound(&self) -> bool {
        self.parts.binding.borrow().is_bound()
    }

    /// Current scroll bounds; `None` while the section is detached.
    pub fn bounds(&self) -> Option<ScrollBounds> {
        self.parts.reactor.bounds().get_untracked()
    }

    /// Frame the mapping currently targets.
    pub fn target_frame(&self) -> Option<f32> {
        self.parts.frame.get_untracked()
    }

    /// Last frame applied to the renderer.
    pub fn current_frame(&self) -> Option<f32> {
        self.parts.binding.borrow().current_frame()
    }

    /// Re-measure now, regardless of the configured triggers.
    pub fn remeasure(&self) {
        if self.is_mounted() {
            self.parts.reactor.remeasure();
        }
    }

    pub fn section_style(&self) -> StyleMap {
        section_style(
            &self.config.style,
            self.config.height,
            self.config.animation_position,
            self.config.debug_mode,
        )
    }

    pub fn container_style(&self) -> StyleMap {
        container_style(&self.config.animation_style, self.config.debug_mode)
    }

    pub fn class_name(&self) -> Option<&str> {
        self.config.class_name.as_deref()
    }

    /// Tear down: stop seeking, destroy the renderer, stop measuring, and
    /// remove the section's nodes. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.is_mounted() {
            log::debug!("unmounting section {:?}", self.parts.section);
            dispose_owner(self.owner);
        }
    }
}

impl Drop for MountedSection {
    fn drop(&mut self) {
        self.unmount();
    }
}
