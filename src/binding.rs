//! Renderer binding: owns the one renderer instance of a mounted section.
//!
//! ```text
//! Unbound ──bind()──▶ Bound ──teardown()──▶ Unbound
//! ```
//!
//! `bind` on a bound binding is a no-op and `teardown` on an unbound one is
//! a no-op, so neither re-renders nor repeated cleanup can churn instances.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::document::Subscription;
use crate::error::Result;
use crate::reactive::{Memo, create_effect};
use crate::renderer::{AnimationInstance, AnimationRenderer, LoadConfig};

type SharedInstance = Rc<RefCell<Box<dyn AnimationInstance>>>;

struct Bound {
    instance: SharedInstance,
    /// Seek subscription, released together with the instance.
    subscription: Subscription,
    current_frame: Rc<Cell<Option<f32>>>,
}

#[derive(Default)]
enum BindingState {
    #[default]
    Unbound,
    Bound(Bound),
}

/// Lifecycle owner of a renderer instance.
#[derive(Default)]
pub struct RendererBinding {
    state: BindingState,
}

impl RendererBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindingState::Bound(_))
    }

    /// Last frame applied to the renderer, if any.
    pub fn current_frame(&self) -> Option<f32> {
        match &self.state {
            BindingState::Bound(bound) => bound.current_frame.get(),
            BindingState::Unbound => None,
        }
    }

    /// Create the renderer instance and start seeking it to `frame`.
    ///
    /// Each value of `frame` is applied with an immediate
    /// `go_to_and_stop`; `None` (no valid geometry yet) leaves the renderer
    /// where it is. Does nothing if an instance already exists.
    pub fn bind(
        &mut self,
        renderer: &mut dyn AnimationRenderer,
        config: LoadConfig,
        frame: Memo<Option<f32>>,
    ) -> Result<()> {
        if self.is_bound() {
            log::debug!("renderer binding already bound, keeping existing instance");
            return Ok(());
        }

        log::debug!(
            "loading animation into container {:?} with segment {:?}",
            config.container,
            config.initial_segment
        );
        let instance: SharedInstance = Rc::new(RefCell::new(renderer.load_animation(config)?));
        let current_frame = Rc::new(Cell::new(None));

        let seek_instance = instance.clone();
        let seek_frame = current_frame.clone();
        let subscription = Subscription::new(create_effect(move || {
            let Some(target) = frame.get() else {
                return;
            };
            log::trace!("seek to frame {}", target);
            seek_instance.borrow_mut().go_to_and_stop(target);
            seek_frame.set(Some(target));
        }));

        self.state = BindingState::Bound(Bound {
            instance,
            subscription,
            current_frame,
        });
        Ok(())
    }

    /// Detach the seek subscription, then destroy the instance.
    pub fn teardown(&mut self) {
        let BindingState::Bound(bound) = std::mem::take(&mut self.state) else {
            return;
        };

        bound.subscription.unsubscribe();
        bound.instance.borrow_mut().destroy();
        log::debug!("renderer instance destroyed");
    }
}

impl Drop for RendererBinding {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::reactive::{Signal, create_memo, create_signal};
    use crate::renderer::RenderKind;
    use crate::renderer::mock::MockRenderer;
    use crate::tree::LayoutTree;

    fn config() -> LoadConfig {
        LoadConfig {
            container: LayoutTree::new().root(),
            render_kind: RenderKind::Svg,
            source: "intro.json".into(),
            initial_segment: [0.0, 100.0],
            loop_playback: false,
            autoplay: false,
            options: Map::new(),
        }
    }

    fn frame_memo() -> (Signal<Option<f32>>, Memo<Option<f32>>) {
        let target = create_signal(None);
        let t = target.clone();
        (target, create_memo(move || t.get()))
    }

    #[test]
    fn test_bind_creates_one_instance() {
        let mut renderer = MockRenderer::default();
        let (_target, frame) = frame_memo();
        let mut binding = RendererBinding::new();

        binding.bind(&mut renderer, config(), frame.clone()).unwrap();
        binding.bind(&mut renderer, config(), frame).unwrap();

        assert!(binding.is_bound());
        assert_eq!(renderer.log.borrow().loads.len(), 1);
    }

    #[test]
    fn test_seeks_follow_frame_updates() {
        let mut renderer = MockRenderer::default();
        let (target, frame) = frame_memo();
        let mut binding = RendererBinding::new();
        binding.bind(&mut renderer, config(), frame).unwrap();

        // Undefined frame: no seek.
        assert!(renderer.log.borrow().seeks.is_empty());
        assert_eq!(binding.current_frame(), None);

        target.set(Some(10.0));
        target.set(Some(42.5));
        assert_eq!(renderer.log.borrow().seeks, vec![10.0, 42.5]);
        assert_eq!(binding.current_frame(), Some(42.5));
    }

    #[test]
    fn test_teardown_stops_seeks_and_is_idempotent() {
        let mut renderer = MockRenderer::default();
        let (target, frame) = frame_memo();
        let mut binding = RendererBinding::new();
        binding.bind(&mut renderer, config(), frame).unwrap();
        target.set(Some(1.0));

        binding.teardown();
        binding.teardown();
        target.set(Some(2.0));

        let log = renderer.log.borrow();
        assert_eq!(log.seeks, vec![1.0]);
        assert_eq!(log.destroyed, 1);
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_teardown_without_instance_is_noop() {
        let mut binding = RendererBinding::new();
        binding.teardown();
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_load_failure_leaves_binding_unbound() {
        let mut renderer = MockRenderer {
            fail_with: Some("corrupt".into()),
            ..Default::default()
        };
        let (_target, frame) = frame_memo();
        let mut binding = RendererBinding::new();

        assert!(binding.bind(&mut renderer, config(), frame).is_err());
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_rebind_after_teardown_creates_new_instance() {
        let mut renderer = MockRenderer::default();
        let (_target, frame) = frame_memo();
        let mut binding = RendererBinding::new();

        binding.bind(&mut renderer, config(), frame.clone()).unwrap();
        binding.teardown();
        binding.bind(&mut renderer, config(), frame).unwrap();

        let log = renderer.log.borrow();
        assert_eq!(log.loads.len(), 2);
        assert_eq!(log.destroyed, 1);
    }
}
