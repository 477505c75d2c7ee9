//! The animation renderer seam.
//!
//! Decoding and drawing are done by an external engine. This crate only
//! needs to create one instance per mounted section, jump it to a frame, and
//! destroy it again.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::tree::NodeId;

/// Where the animation comes from. Immutable once mounted.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSource {
    /// Inline animation document.
    Data(Arc<Value>),
    /// Path or URL the renderer loads itself.
    Path(String),
}

impl AnimationSource {
    /// Parse inline animation data from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::Data(Arc::new(value)))
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path.as_str()),
            Self::Data(_) => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Data(data) => Some(&**data),
            Self::Path(_) => None,
        }
    }
}

impl From<Value> for AnimationSource {
    fn from(value: Value) -> Self {
        Self::Data(Arc::new(value))
    }
}

impl From<&str> for AnimationSource {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for AnimationSource {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

/// Rendering backend requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    #[default]
    Svg,
    Canvas,
    Html,
}

/// One-shot configuration handed to [`AnimationRenderer::load_animation`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    /// Layout node the instance draws into.
    pub container: NodeId,
    pub render_kind: RenderKind,
    pub source: AnimationSource,
    /// Frames the engine should prepare: `[0, frames.end]`.
    pub initial_segment: [f32; 2],
    /// Always false: playback is driven by scroll only.
    pub loop_playback: bool,
    /// Always false: playback is driven by scroll only.
    pub autoplay: bool,
    /// Caller options forwarded verbatim.
    pub options: Map<String, Value>,
}

impl LoadConfig {
    /// Render as a `loadAnimation`-style JSON object.
    ///
    /// Keys are applied in order: renderer, initial segment, source,
    /// pass-through options, then `loop`/`autoplay`. Options may therefore
    /// override everything except the two playback flags.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("renderer".into(), json!(self.render_kind));
        object.insert("initialSegment".into(), json!(self.initial_segment));
        match &self.source {
            AnimationSource::Data(data) => {
                object.insert("animationData".into(), Value::clone(data));
            }
            AnimationSource::Path(path) => {
                object.insert("path".into(), Value::String(path.clone()));
            }
        }
        for (key, value) in &self.options {
            object.insert(key.clone(), value.clone());
        }
        object.insert("loop".into(), Value::Bool(self.loop_playback));
        object.insert("autoplay".into(), Value::Bool(self.autoplay));
        Value::Object(object)
    }
}

/// A live animation owned by one mounted section.
pub trait AnimationInstance {
    /// Jump to `frame` and stay there. Must not animate the transition.
    fn go_to_and_stop(&mut self, frame: f32);

    /// Release engine resources. Called exactly once.
    fn destroy(&mut self);
}

/// Factory for animation instances.
pub trait AnimationRenderer {
    fn load_animation(
        &mut self,
        config: LoadConfig,
    ) -> std::result::Result<Box<dyn AnimationInstance>, RendererError>;
}

/// Failure reported by the rendering engine.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("animation could not be loaded: {0}")]
    Load(String),
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// What a [`MockRenderer`] has been asked to do.
    #[derive(Debug, Default)]
    pub(crate) struct MockLog {
        pub(crate) loads: Vec<LoadConfig>,
        pub(crate) seeks: Vec<f32>,
        pub(crate) destroyed: usize,
    }

    #[derive(Default, Clone)]
    pub(crate) struct MockRenderer {
        pub(crate) log: Rc<RefCell<MockLog>>,
        pub(crate) fail_with: Option<String>,
    }

    struct MockInstance {
        log: Rc<RefCell<MockLog>>,
    }

    impl AnimationInstance for MockInstance {
        fn go_to_and_stop(&mut self, frame: f32) {
            self.log.borrow_mut().seeks.push(frame);
        }

        fn destroy(&mut self) {
            self.log.borrow_mut().destroyed += 1;
        }
    }

    impl AnimationRenderer for MockRenderer {
        fn load_animation(
            &mut self,
            config: LoadConfig,
        ) -> std::result::Result<Box<dyn AnimationInstance>, RendererError> {
            if let Some(message) = &self.fail_with {
                return Err(RendererError::Load(message.clone()));
            }
            self.log.borrow_mut().loads.push(config);
            Ok(Box::new(MockInstance {
                log: self.log.clone(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LayoutTree;

    fn config(source: AnimationSource) -> LoadConfig {
        LoadConfig {
            container: LayoutTree::new().root(),
            render_kind: RenderKind::default(),
            source,
            initial_segment: [0.0, 100.0],
            loop_playback: false,
            autoplay: false,
            options: Map::new(),
        }
    }

    #[test]
    fn test_source_shape_selects_loading_mode() {
        let path: AnimationSource = "anim/intro.json".into();
        assert_eq!(path.path(), Some("anim/intro.json"));
        assert!(path.data().is_none());

        let data: AnimationSource = json!({ "fr": 30, "op": 120 }).into();
        assert!(data.path().is_none());
        assert_eq!(data.data().and_then(|d| d["op"].as_u64()), Some(120));
    }

    #[test]
    fn test_from_json_str_rejects_malformed_data() {
        assert!(AnimationSource::from_json_str("{\"layers\": []}").is_ok());
        assert!(AnimationSource::from_json_str("{\"layers\": [").is_err());
    }

    #[test]
    fn test_to_json_with_path() {
        let value = config("intro.json".into()).to_json();
        assert_eq!(value["renderer"], "svg");
        assert_eq!(value["path"], "intro.json");
        assert!(value.get("animationData").is_none());
        assert_eq!(value["initialSegment"], json!([0.0, 100.0]));
        assert_eq!(value["loop"], false);
        assert_eq!(value["autoplay"], false);
    }

    #[test]
    fn test_to_json_options_cannot_enable_playback() {
        let mut cfg = config(json!({ "v": "5.7.4" }).into());
        cfg.options.insert("renderer".into(), json!("canvas"));
        cfg.options.insert("name".into(), json!("hero"));
        cfg.options.insert("loop".into(), json!(true));
        cfg.options.insert("autoplay".into(), json!(true));

        let value = cfg.to_json();
        assert_eq!(value["animationData"]["v"], "5.7.4");
        assert_eq!(value["renderer"], "canvas");
        assert_eq!(value["name"], "hero");
        assert_eq!(value["loop"], false);
        assert_eq!(value["autoplay"], false);
    }
}
