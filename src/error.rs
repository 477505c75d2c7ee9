use thiserror::Error;

use crate::renderer::RendererError;

/// Errors raised while configuring or mounting a scroll section.
///
/// Configuration errors are caller mistakes and are reported before any
/// layout is measured or renderer instance is created.
#[derive(Error, Debug)]
pub enum Error {
    #[error("scroll section needs a frame range")]
    MissingFrames,
    #[error("scroll section frame range [{start}, {end}] must be finite and ascending")]
    InvalidFrames { start: f32, end: f32 },
    #[error(
        "scroll section height ({height}px) must be at least the screen height ({viewport_height}px)"
    )]
    HeightBelowViewport { height: f32, viewport_height: f32 },
    #[error("scroll section start margin must be finite, got {0}")]
    InvalidStartMargin(f32),
    #[error("scroll section needs an animation source")]
    MissingAnimation,
    #[error("invalid animation data: {0}")]
    AnimationData(#[from] serde_json::Error),
    #[error("renderer error: {0}")]
    Renderer(#[from] RendererError),
}

pub type Result<T> = std::result::Result<T, Error>;
